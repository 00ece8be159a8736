// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::Operador,
    models::auth::{SesionVista, SignInPayload},
};

#[utoipa::path(
    post,
    path = "/api/autenticacion/login",
    tag = "Autenticación",
    request_body = SignInPayload,
    responses(
        (status = 200, description = "Sesión iniciada y persistida localmente", body = SesionVista),
        (status = 401, description = "Credenciales inválidas"),
        (status = 502, description = "Backend inalcanzable")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<SignInPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let vista = app_state
        .auth_service
        .login(&payload.usuario, &payload.clave)
        .await?;

    Ok((StatusCode::OK, Json(vista)))
}

#[utoipa::path(
    post,
    path = "/api/autenticacion/logout",
    tag = "Autenticación",
    responses(
        (status = 204, description = "Sesión local eliminada")
    ),
    security(("api_jwt" = []))
)]
pub async fn logout(State(app_state): State<AppState>) -> impl IntoResponse {
    app_state.auth_service.logout().await;
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    get,
    path = "/api/autenticacion/sesion",
    tag = "Autenticación",
    responses(
        (status = 200, description = "Operador con sesión activa", body = SesionVista),
        (status = 401, description = "Sin sesión")
    ),
    security(("api_jwt" = []))
)]
pub async fn sesion(Operador(operador): Operador) -> impl IntoResponse {
    Json(operador)
}
