// Acceso al backend de almacén. Cada agregado tiene su puerto (trait) y su
// implementación HTTP; los servicios dependen del trait para poder probarse
// con dobles en memoria.

pub mod auth_api;
pub mod http;
pub mod maestros_api;
pub mod productos_api;

use async_trait::async_trait;

use crate::common::error::AppError;
use crate::models::auth::RespuestaAutenticacion;
use crate::models::maestros::{Categoria, CategoriaArbol, Color, Proveedor, Talla};
use crate::models::producto::Producto;

pub use auth_api::HttpAutenticacionApi;
pub use http::ApiClient;
pub use maestros_api::HttpMaestrosApi;
pub use productos_api::HttpProductosApi;

#[async_trait]
pub trait MaestrosApi: Send + Sync {
    async fn listar_tallas(&self) -> Result<Vec<Talla>, AppError>;
    async fn crear_talla(&self, nombre: &str) -> Result<Talla, AppError>;
    async fn eliminar_talla(&self, id: i64) -> Result<(), AppError>;

    async fn listar_colores(&self) -> Result<Vec<Color>, AppError>;
    async fn crear_color(&self, nombre: &str, codigo_hex: Option<&str>) -> Result<Color, AppError>;
    async fn eliminar_color(&self, id: i64) -> Result<(), AppError>;

    async fn listar_proveedores(&self) -> Result<Vec<Proveedor>, AppError>;
    async fn crear_proveedor(&self, nombre: &str, ruc: &str) -> Result<Proveedor, AppError>;
    async fn eliminar_proveedor(&self, id: i64) -> Result<(), AppError>;
    // Consulta en SUNAT por RUC de 11 dígitos; el "no existe" llega como
    // AppError::NoEncontrado, distinto de una caída de conectividad.
    async fn buscar_por_ruc(&self, ruc: &str) -> Result<Proveedor, AppError>;

    async fn listar_categorias_principales(&self) -> Result<Vec<Categoria>, AppError>;
    async fn listar_subcategorias(&self, id_padre: i64) -> Result<Vec<Categoria>, AppError>;
    async fn arbol_categorias(&self) -> Result<Vec<CategoriaArbol>, AppError>;
    async fn crear_categoria(
        &self,
        nombre: &str,
        id_padre: Option<i64>,
    ) -> Result<Categoria, AppError>;
    async fn eliminar_categoria(&self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait ProductosApi: Send + Sync {
    async fn listar(&self) -> Result<Vec<Producto>, AppError>;
    async fn crear(&self, producto: &Producto) -> Result<Producto, AppError>;
    async fn actualizar(&self, id: i64, producto: &Producto) -> Result<Producto, AppError>;
    async fn eliminar(&self, id: i64) -> Result<(), AppError>;

    // Imágenes de código de barras renderizadas por el backend
    async fn imagen_codigo_barras(&self, id_producto: i64) -> Result<Vec<u8>, AppError>;
    async fn imagen_codigo_barras_variante(&self, id_variante: i64) -> Result<Vec<u8>, AppError>;
}

#[async_trait]
pub trait AutenticacionApi: Send + Sync {
    async fn signin(&self, usuario: &str, clave: &str)
        -> Result<RespuestaAutenticacion, AppError>;
}
