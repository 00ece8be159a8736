// src/backend/auth_api.rs

use async_trait::async_trait;

use crate::backend::{ApiClient, AutenticacionApi};
use crate::common::error::AppError;
use crate::models::auth::{RespuestaAutenticacion, SignInPayload};

#[derive(Clone)]
pub struct HttpAutenticacionApi {
    client: ApiClient,
}

impl HttpAutenticacionApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AutenticacionApi for HttpAutenticacionApi {
    async fn signin(
        &self,
        usuario: &str,
        clave: &str,
    ) -> Result<RespuestaAutenticacion, AppError> {
        let payload = SignInPayload {
            usuario: usuario.to_string(),
            clave: clave.to_string(),
        };
        self.client
            .post_json("/autenticacion/signin", &payload)
            .await
    }
}
