// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Datos para iniciar sesión contra el backend
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct SignInPayload {
    #[validate(length(min = 1, message = "El usuario es obligatorio."))]
    pub usuario: String,
    #[validate(length(min = 1, message = "La clave es obligatoria."))]
    pub clave: String,
}

// Respuesta del backend al iniciar sesión
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RespuestaAutenticacion {
    pub username: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub jwt: String,
    pub status: bool,
}

// Sesión persistida en almacenamiento local: sobrevive reinicios.
// La sola presencia del token es el chequeo local de autenticación;
// la validez real la decide el backend en cada llamada.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sesion {
    pub token: String,
    pub username: String,
}

// Claims que nos interesan del JWT emitido por el backend.
// Solo lectura: la firma la verifica el backend, no nosotros.
#[derive(Debug, Deserialize, Serialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SesionVista {
    pub username: String,
    pub roles: Vec<String>,
    pub es_admin: bool,
}
