use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nuestro tipo de error, con `thiserror` para mejor ergonomía.
// Las operaciones de los motores en memoria (matriz, precios, cola) señalan
// sus casos esperados por forma de retorno; aquí solo viven las fallas que
// llegan a una respuesta HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de validación")]
    Validacion(#[from] validator::ValidationErrors),

    // Reglas de formulario evaluadas en los servicios (escala de precios,
    // selección vacía de la matriz, cantidades de variantes).
    #[error("Reglas de formulario incumplidas")]
    ReglaFormulario(Vec<String>),

    #[error("Credenciales inválidas")]
    CredencialesInvalidas,

    #[error("Sesión inexistente o token ausente")]
    NoAutenticado,

    // Rechazo del backend: SKU/nombre duplicado, maestro en uso, etc.
    #[error("Conflicto: {0}")]
    Conflicto(String),

    #[error("No encontrado: {0}")]
    NoEncontrado(String),

    // Falla de conectividad con el backend de almacén.
    #[error("No se pudo contactar al servidor")]
    Transporte,

    // La superficie de impresión no estuvo disponible; la cola se conserva.
    #[error("Error de impresión: {0}")]
    ErrorImpresion(String),

    #[error("Fuente no encontrada: {0}")]
    FuenteNoEncontrada(String),

    // Variante genérica para cualquier otro error inesperado
    #[error("Error interno")]
    Interno(#[from] anyhow::Error),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        // Sin conexión o timeout => el usuario puede reintentar la acción.
        if err.is_connect() || err.is_timeout() {
            return AppError::Transporte;
        }
        AppError::Interno(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Devolvemos todos los detalles de la validación, campo por campo.
            AppError::Validacion(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Uno o más campos son inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // Cada regla incumplida viaja como un mensaje propio, en orden.
            AppError::ReglaFormulario(mensajes) => {
                let body = Json(json!({
                    "error": "Revisa los datos del formulario.",
                    "details": mensajes,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::CredencialesInvalidas => {
                (StatusCode::UNAUTHORIZED, "Usuario o clave inválidos.".to_string())
            }
            AppError::NoAutenticado => (
                StatusCode::UNAUTHORIZED,
                "Inicia sesión para continuar.".to_string(),
            ),
            AppError::Conflicto(msg) => (StatusCode::CONFLICT, msg),
            AppError::NoEncontrado(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Transporte => (
                StatusCode::BAD_GATEWAY,
                "No se pudo contactar al servidor del almacén. Inténtalo de nuevo.".to_string(),
            ),
            AppError::ErrorImpresion(msg) => {
                // La cola de etiquetas queda intacta: el operador reintenta.
                tracing::warn!("Despacho de impresión fallido: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, format!("No se pudo imprimir: {}", msg))
            }

            // Todos los demás errores terminan en 500.
            // El `tracing` registra el mensaje detallado que `thiserror` nos da.
            ref e => {
                tracing::error!("Error interno: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocurrió un error inesperado.".to_string(),
                )
            }
        };

        // Respuesta estándar para errores simples que solo tienen un mensaje.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
