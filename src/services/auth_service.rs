// src/services/auth_service.rs
//
// Sesión del operador. El backend autentica y emite el JWT; aquí solo se
// guarda (token + usuario) en almacenamiento local durable y se leen los
// claims para mostrar roles. La presencia del token es el único chequeo
// local: la validez real la decide el backend en cada llamada.

use std::path::PathBuf;
use std::sync::Arc;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tokio::sync::RwLock;

use crate::{
    backend::AutenticacionApi,
    common::error::AppError,
    models::auth::{Claims, Sesion, SesionVista},
};

// Almacenamiento local de la sesión: un archivo JSON que sobrevive
// reinicios de la aplicación.
pub struct SesionStore {
    ruta: PathBuf,
    actual: RwLock<Option<Sesion>>,
}

impl SesionStore {
    pub fn cargar(ruta: PathBuf) -> Self {
        let actual: Option<Sesion> = std::fs::read_to_string(&ruta)
            .ok()
            .and_then(|contenido| serde_json::from_str(&contenido).ok());

        if let Some(sesion) = &actual {
            tracing::info!("Sesión previa restaurada para {}", sesion.username);
        }

        Self {
            ruta,
            actual: RwLock::new(actual),
        }
    }

    pub async fn sesion(&self) -> Option<Sesion> {
        self.actual.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.actual.read().await.as_ref().map(|s| s.token.clone())
    }

    pub async fn guardar(&self, sesion: Sesion) -> Result<(), AppError> {
        let contenido = serde_json::to_string_pretty(&sesion)
            .map_err(|e| AppError::Interno(anyhow::Error::new(e)))?;
        tokio::fs::write(&self.ruta, contenido)
            .await
            .map_err(|e| AppError::Interno(anyhow::anyhow!("no se pudo persistir la sesión: {}", e)))?;

        *self.actual.write().await = Some(sesion);
        Ok(())
    }

    pub async fn limpiar(&self) {
        *self.actual.write().await = None;
        // El archivo puede no existir: no es un error.
        let _ = tokio::fs::remove_file(&self.ruta).await;
    }
}

#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn AutenticacionApi>,
    sesion: Arc<SesionStore>,
}

impl AuthService {
    pub fn new(api: Arc<dyn AutenticacionApi>, sesion: Arc<SesionStore>) -> Self {
        Self { api, sesion }
    }

    pub async fn login(&self, usuario: &str, clave: &str) -> Result<SesionVista, AppError> {
        let respuesta = self.api.signin(usuario, clave).await?;

        if !respuesta.status || respuesta.jwt.is_empty() {
            tracing::warn!("Login rechazado para {}: {}", usuario, respuesta.message);
            return Err(AppError::CredencialesInvalidas);
        }

        let sesion = Sesion {
            token: respuesta.jwt,
            username: respuesta.username,
        };
        self.sesion.guardar(sesion.clone()).await?;
        tracing::info!("✅ Sesión iniciada para {}", sesion.username);

        Ok(Self::vista_de(&sesion))
    }

    pub async fn logout(&self) {
        self.sesion.limpiar().await;
        tracing::info!("Sesión cerrada");
    }

    pub async fn sesion_actual(&self) -> Result<SesionVista, AppError> {
        let sesion = self.sesion.sesion().await.ok_or(AppError::NoAutenticado)?;
        Ok(Self::vista_de(&sesion))
    }

    fn vista_de(sesion: &Sesion) -> SesionVista {
        let roles = Self::roles_de_token(&sesion.token);
        let es_admin = Self::es_admin(&roles);
        SesionVista {
            username: sesion.username.clone(),
            roles,
            es_admin,
        }
    }

    // Lee los roles de los claims sin verificar la firma: la verificación
    // es del backend, que valida el token en cada petición.
    pub fn roles_de_token(token: &str) -> Vec<String> {
        let mut validacion = Validation::new(Algorithm::HS256);
        validacion.insecure_disable_signature_validation();
        validacion.validate_exp = false;
        validacion.required_spec_claims.clear();

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validacion)
            .map(|datos| datos.claims.roles.unwrap_or_default())
            .unwrap_or_default()
    }

    pub fn es_admin(roles: &[String]) -> bool {
        roles.iter().any(|r| r == "ADMIN" || r == "ROLE_ADMIN")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_con_roles(roles: Vec<String>) -> String {
        let claims = Claims {
            sub: "almacenero1".to_string(),
            roles: Some(roles),
            exp: 4_102_444_800, // muy lejos en el futuro
            iat: 0,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secreto-del-backend"),
        )
        .expect("token de prueba")
    }

    #[test]
    fn los_roles_se_leen_sin_conocer_el_secreto() {
        let token = token_con_roles(vec!["ROLE_ADMIN".to_string(), "ALMACENERO".to_string()]);
        let roles = AuthService::roles_de_token(&token);
        assert_eq!(roles, vec!["ROLE_ADMIN", "ALMACENERO"]);
        assert!(AuthService::es_admin(&roles));
    }

    #[test]
    fn un_token_ilegible_devuelve_roles_vacios() {
        let roles = AuthService::roles_de_token("no-es-un-jwt");
        assert!(roles.is_empty());
        assert!(!AuthService::es_admin(&roles));
    }

    #[test]
    fn es_admin_reconoce_ambas_formas_del_rol() {
        assert!(AuthService::es_admin(&["ADMIN".to_string()]));
        assert!(AuthService::es_admin(&["ROLE_ADMIN".to_string()]));
        assert!(!AuthService::es_admin(&["ALMACENERO".to_string()]));
    }

    #[tokio::test]
    async fn la_sesion_persiste_y_se_limpia() {
        let ruta = std::env::temp_dir().join("almacen-front-sesion-test.json");
        let _ = std::fs::remove_file(&ruta);

        let store = SesionStore::cargar(ruta.clone());
        assert!(store.sesion().await.is_none());

        store
            .guardar(Sesion {
                token: "abc".to_string(),
                username: "maria".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(store.token().await.as_deref(), Some("abc"));

        // Un store nuevo sobre el mismo archivo restaura la sesión
        let restaurado = SesionStore::cargar(ruta.clone());
        assert_eq!(
            restaurado.sesion().await.map(|s| s.username),
            Some("maria".to_string())
        );

        restaurado.limpiar().await;
        assert!(restaurado.sesion().await.is_none());
        assert!(!ruta.exists());
    }
}
