// src/backend/maestros_api.rs

use async_trait::async_trait;
use serde_json::json;

use crate::backend::{ApiClient, MaestrosApi};
use crate::common::error::AppError;
use crate::models::maestros::{Categoria, CategoriaArbol, Color, Proveedor, Talla};

#[derive(Clone)]
pub struct HttpMaestrosApi {
    client: ApiClient,
}

impl HttpMaestrosApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MaestrosApi for HttpMaestrosApi {
    // --- TALLAS ---
    async fn listar_tallas(&self) -> Result<Vec<Talla>, AppError> {
        self.client.get_json("/almacenero/tallas").await
    }

    async fn crear_talla(&self, nombre: &str) -> Result<Talla, AppError> {
        self.client
            .post_json("/almacenero/tallas", &json!({ "nombreTalla": nombre }))
            .await
    }

    async fn eliminar_talla(&self, id: i64) -> Result<(), AppError> {
        self.client
            .delete(&format!("/almacenero/tallas/{}", id))
            .await
    }

    // --- COLORES ---
    async fn listar_colores(&self) -> Result<Vec<Color>, AppError> {
        self.client.get_json("/almacenero/colores").await
    }

    async fn crear_color(&self, nombre: &str, codigo_hex: Option<&str>) -> Result<Color, AppError> {
        self.client
            .post_json(
                "/almacenero/colores",
                &json!({ "nombre": nombre, "codigoHex": codigo_hex }),
            )
            .await
    }

    async fn eliminar_color(&self, id: i64) -> Result<(), AppError> {
        self.client
            .delete(&format!("/almacenero/colores/{}", id))
            .await
    }

    // --- PROVEEDORES ---
    async fn listar_proveedores(&self) -> Result<Vec<Proveedor>, AppError> {
        self.client.get_json("/almacenero/proveedores").await
    }

    async fn crear_proveedor(&self, nombre: &str, ruc: &str) -> Result<Proveedor, AppError> {
        self.client
            .post_json(
                "/almacenero/proveedores",
                &json!({ "nombre": nombre, "ruc": ruc }),
            )
            .await
    }

    async fn eliminar_proveedor(&self, id: i64) -> Result<(), AppError> {
        self.client
            .delete(&format!("/almacenero/proveedores/{}", id))
            .await
    }

    async fn buscar_por_ruc(&self, ruc: &str) -> Result<Proveedor, AppError> {
        self.client
            .get_json(&format!("/almacenero/proveedores/buscar/{}", ruc))
            .await
    }

    // --- CATEGORÍAS ---
    async fn listar_categorias_principales(&self) -> Result<Vec<Categoria>, AppError> {
        self.client
            .get_json("/almacenero/categorias/principales")
            .await
    }

    async fn listar_subcategorias(&self, id_padre: i64) -> Result<Vec<Categoria>, AppError> {
        self.client
            .get_json(&format!("/almacenero/categorias/{}/subcategorias", id_padre))
            .await
    }

    async fn arbol_categorias(&self) -> Result<Vec<CategoriaArbol>, AppError> {
        self.client.get_json("/almacenero/categorias-tree").await
    }

    async fn crear_categoria(
        &self,
        nombre: &str,
        id_padre: Option<i64>,
    ) -> Result<Categoria, AppError> {
        match id_padre {
            Some(padre) => {
                self.client
                    .post_json(
                        &format!("/almacenero/categorias/{}/subcategorias", padre),
                        &json!({ "nombre": nombre }),
                    )
                    .await
            }
            None => {
                self.client
                    .post_json("/almacenero/categorias", &json!({ "nombre": nombre }))
                    .await
            }
        }
    }

    async fn eliminar_categoria(&self, id: i64) -> Result<(), AppError> {
        self.client
            .delete(&format!("/almacenero/categorias/{}", id))
            .await
    }
}
