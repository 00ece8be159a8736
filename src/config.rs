// src/config.rs

use std::env;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::backend::{ApiClient, HttpAutenticacionApi, HttpMaestrosApi, HttpProductosApi};
use crate::services::auth_service::{AuthService, SesionStore};
use crate::services::etiquetas_service::ColaEtiquetas;
use crate::services::impresion_service::{ImpresionService, SpoolArchivos};
use crate::services::maestros_service::MaestrosService;
use crate::services::producto_service::ProductoService;

// El estado compartido que será accesible en toda la aplicación
#[derive(Clone)]
pub struct AppState {
    pub sesion: Arc<SesionStore>,
    pub auth_service: AuthService,
    pub maestros_service: MaestrosService,
    pub producto_service: ProductoService,
    pub impresion_service: ImpresionService,
    // La cola de etiquetas vive en memoria durante la sesión de impresión
    pub cola_etiquetas: Arc<Mutex<ColaEtiquetas>>,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        // URL base del backend de almacén (incluye el prefijo /api)
        let backend_url =
            env::var("BACKEND_URL").unwrap_or_else(|_| "http://localhost:8080/api".to_string());
        let ruta_sesion = env::var("SESSION_FILE").unwrap_or_else(|_| "sesion.json".to_string());
        let directorio_fuentes = env::var("FONTS_DIR").unwrap_or_else(|_| "./fonts".to_string());
        let directorio_spool = env::var("SPOOL_DIR").unwrap_or_else(|_| "./spool".to_string());

        // Política ante 401/403 del backend: apagada por defecto
        let cerrar_sesion_en_401 = env::var("AUTH_LOGOUT_401")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        // Período de gracia para las imágenes de código de barras
        let gracia_ms: u64 = env::var("BARCODE_GRACE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2000);

        let sesion = Arc::new(SesionStore::cargar(ruta_sesion.into()));

        let client = ApiClient::new(backend_url.clone(), sesion.clone(), cerrar_sesion_en_401)?;
        tracing::info!("✅ Cliente hacia el backend configurado en {}", backend_url);

        // --- Arma el gráfico de dependencias ---
        let auth_api = Arc::new(HttpAutenticacionApi::new(client.clone()));
        let maestros_api = Arc::new(HttpMaestrosApi::new(client.clone()));
        let productos_api = Arc::new(HttpProductosApi::new(client));

        let auth_service = AuthService::new(auth_api, sesion.clone());
        let maestros_service = MaestrosService::new(maestros_api);
        let producto_service = ProductoService::new(productos_api.clone());
        let impresion_service = ImpresionService::new(
            productos_api,
            Arc::new(SpoolArchivos::new(directorio_spool)),
            directorio_fuentes,
            Duration::from_millis(gracia_ms),
        );

        Ok(Self {
            sesion,
            auth_service,
            maestros_service,
            producto_service,
            impresion_service,
            cola_etiquetas: Arc::new(Mutex::new(ColaEtiquetas::new())),
        })
    }
}
