// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{common::error::AppError, config::AppState, models::auth::SesionVista,
    services::auth_service::AuthService};

// Guardia de sesión: el chequeo local es la presencia del token guardado.
// El backend revalida el token en cada llamada que salga hacia él.
pub async fn sesion_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(sesion) = app_state.sesion.sesion().await else {
        return Err(AppError::NoAutenticado);
    };

    let roles = AuthService::roles_de_token(&sesion.token);
    let operador = SesionVista {
        username: sesion.username,
        es_admin: AuthService::es_admin(&roles),
        roles,
    };

    // Deja al operador en las extensions de la petición
    request.extensions_mut().insert(operador);
    Ok(next.run(request).await)
}

// Extractor para obtener al operador autenticado directamente en handlers
pub struct Operador(pub SesionVista);

impl<S> FromRequestParts<S> for Operador
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SesionVista>()
            .cloned()
            .map(Operador)
            .ok_or(AppError::NoAutenticado)
    }
}
