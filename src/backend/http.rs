// src/backend/http.rs

use std::sync::Arc;
use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::common::error::AppError;
use crate::services::auth_service::SesionStore;

// Cliente compartido hacia el backend. Adjunta el bearer de la sesión en
// cada petición y traduce estados HTTP a nuestro propio vocabulario de
// errores, para que los handlers nunca vean `reqwest` directamente.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    sesion: Arc<SesionStore>,
    // Política ante 401/403 del backend: por defecto NO se invalida la
    // sesión local (comportamiento de referencia); con `true` se limpia
    // para que la cáscara vuelva al login.
    cerrar_sesion_en_401: bool,
}

impl ApiClient {
    pub fn new(
        base_url: String,
        sesion: Arc<SesionStore>,
        cerrar_sesion_en_401: bool,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            sesion,
            cerrar_sesion_en_401,
        })
    }

    fn url(&self, ruta: &str) -> String {
        format!("{}{}", self.base_url, ruta)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, ruta: &str) -> Result<T, AppError> {
        let resp = self.enviar(self.http.get(self.url(ruta))).await?;
        Ok(resp.json::<T>().await?)
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        ruta: &str,
        cuerpo: &B,
    ) -> Result<T, AppError> {
        let resp = self
            .enviar(self.http.post(self.url(ruta)).json(cuerpo))
            .await?;
        Ok(resp.json::<T>().await?)
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        ruta: &str,
        cuerpo: &B,
    ) -> Result<T, AppError> {
        let resp = self
            .enviar(self.http.put(self.url(ruta)).json(cuerpo))
            .await?;
        Ok(resp.json::<T>().await?)
    }

    pub async fn delete(&self, ruta: &str) -> Result<(), AppError> {
        self.enviar(self.http.delete(self.url(ruta))).await?;
        Ok(())
    }

    pub async fn get_bytes(&self, ruta: &str) -> Result<Vec<u8>, AppError> {
        let resp = self.enviar(self.http.get(self.url(ruta))).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    // Punto único de envío: bearer + mapeo de estados.
    async fn enviar(&self, req: RequestBuilder) -> Result<Response, AppError> {
        let req = match self.sesion.token().await {
            Some(token) => req.bearer_auth(token),
            None => req,
        };

        let resp = req.send().await?;
        let status = resp.status();

        if status.is_success() {
            return Ok(resp);
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                if self.cerrar_sesion_en_401 {
                    tracing::warn!("Backend respondió {}; cerrando sesión local", status);
                    self.sesion.limpiar().await;
                }
                Err(AppError::NoAutenticado)
            }
            StatusCode::NOT_FOUND => Err(AppError::NoEncontrado(
                Self::mensaje_de(resp, "Recurso no encontrado.").await,
            )),
            // 409 y los 400 de negocio del backend (duplicados, maestro en
            // uso) se presentan igual: un conflicto con mensaje.
            s if s.is_client_error() => Err(AppError::Conflicto(
                Self::mensaje_de(resp, "El servidor rechazó la operación.").await,
            )),
            _ => Err(AppError::Interno(anyhow::anyhow!(
                "El backend respondió {}",
                status
            ))),
        }
    }

    // Intenta extraer el mensaje del cuerpo JSON ({"error": ...} o
    // {"message": ...}); si no hay, usa el texto por defecto.
    async fn mensaje_de(resp: Response, por_defecto: &str) -> String {
        let Ok(cuerpo) = resp.json::<serde_json::Value>().await else {
            return por_defecto.to_string();
        };
        cuerpo
            .get("error")
            .or_else(|| cuerpo.get("message"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| por_defecto.to_string())
    }
}
