// src/backend/productos_api.rs

use async_trait::async_trait;

use crate::backend::{ApiClient, ProductosApi};
use crate::common::error::AppError;
use crate::models::producto::Producto;

#[derive(Clone)]
pub struct HttpProductosApi {
    client: ApiClient,
}

impl HttpProductosApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProductosApi for HttpProductosApi {
    async fn listar(&self) -> Result<Vec<Producto>, AppError> {
        self.client.get_json("/almacenero/productos").await
    }

    async fn crear(&self, producto: &Producto) -> Result<Producto, AppError> {
        self.client.post_json("/almacenero/productos", producto).await
    }

    async fn actualizar(&self, id: i64, producto: &Producto) -> Result<Producto, AppError> {
        self.client
            .put_json(&format!("/almacenero/productos/{}", id), producto)
            .await
    }

    async fn eliminar(&self, id: i64) -> Result<(), AppError> {
        self.client
            .delete(&format!("/almacenero/productos/{}", id))
            .await
    }

    async fn imagen_codigo_barras(&self, id_producto: i64) -> Result<Vec<u8>, AppError> {
        self.client
            .get_bytes(&format!("/almacenero/productos/{}/codigo-barras", id_producto))
            .await
    }

    async fn imagen_codigo_barras_variante(&self, id_variante: i64) -> Result<Vec<u8>, AppError> {
        self.client
            .get_bytes(&format!(
                "/almacenero/productos/variantes/{}/codigo-barras",
                id_variante
            ))
            .await
    }
}
