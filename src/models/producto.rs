// src/models/producto.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::maestros::{Categoria, Color, Proveedor, Talla};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sexo {
    Hombre,
    Mujer,
    Unisex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoPublico {
    Adulto,
    #[serde(rename = "NIÑO")]
    Nino,
}

// --- Variante talla x color ---
// Invariante del agregado: como máximo una variante por par (idTalla, idColor)
// dentro de un mismo producto. La unicidad solo puede romperse al agregar,
// nunca al quitar; el motor de matriz es el único punto de alta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductoVariante {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_producto_variante: Option<i64>,
    pub talla: Talla,
    pub color: Color,
    pub cantidad: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codigo_barras_variante: Option<String>,
}

// --- Producto ---
// Si `variantes` viene con filas, `cantidad` es la suma de sus cantidades;
// sin variantes, `cantidad` es el stock simple autoritativo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Producto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_producto: Option<i64>,
    // SKU o código interno
    pub codigo_identificacion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codigo_barras: Option<String>,
    pub nombre: String,
    #[serde(default)]
    pub marca: String,
    pub sexo: Sexo,
    pub tipo_publico: TipoPublico,

    // Escala de precios: total a pagar por 1, 3, 6 y 12 unidades.
    pub precio_unitario: Decimal,
    pub precio_cuarto: Decimal,
    pub precio_media_docena: Decimal,
    pub precio_docena: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria: Option<Categoria>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria_padre: Option<Categoria>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proveedor: Option<Proveedor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cantidad: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variantes: Option<Vec<ProductoVariante>>,

    // Marcas de tiempo del backend; nunca se envían en altas/ediciones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Producto {
    pub fn tiene_variantes(&self) -> bool {
        self.variantes.as_ref().is_some_and(|v| !v.is_empty())
    }

    pub fn stock_total(&self) -> u32 {
        self.cantidad.unwrap_or(0)
    }

    // Código que alimenta la simbología de la etiqueta.
    pub fn codigo_para_etiqueta(&self) -> &str {
        match self.codigo_barras.as_deref() {
            Some(codigo) if !codigo.is_empty() => codigo,
            _ => &self.codigo_identificacion,
        }
    }
}

// ---
// Payload: formulario de producto (crear / editar)
// ---
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductoFormulario {
    #[validate(length(min = 1, message = "El SKU es obligatorio."))]
    pub codigo_identificacion: String,
    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub nombre: String,
    #[serde(default)]
    pub codigo_barras: Option<String>,
    #[serde(default)]
    pub marca: String,
    pub sexo: Sexo,
    pub tipo_publico: TipoPublico,

    pub precio_unitario: Decimal,
    #[serde(default)]
    pub precio_cuarto: Decimal,
    #[serde(default)]
    pub precio_media_docena: Decimal,
    #[serde(default)]
    pub precio_docena: Decimal,

    #[serde(default)]
    pub categoria: Option<Categoria>,
    #[serde(default)]
    pub categoria_padre: Option<Categoria>,
    #[serde(default)]
    pub proveedor: Option<Proveedor>,

    // Stock simple: solo cuenta cuando no hay variantes.
    #[serde(default)]
    pub cantidad: Option<u32>,
    #[serde(default)]
    pub variantes: Vec<ProductoVariante>,
}

// ---
// Filtros del listado de inventario
// ---
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FiltroProductos {
    // Texto sobre nombre o SKU
    pub buscar: Option<String>,
    // Id de la categoría principal
    pub categoria: Option<i64>,
    pub proveedor: Option<i64>,
    // Solo productos con stock total <= 5
    #[serde(default)]
    pub stock_bajo: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListadoProductos {
    pub productos: Vec<Producto>,
    // "Mostrando N de M"
    pub mostrados: usize,
    pub total: usize,
}

// ---
// Eliminación por lote: el veredicto es por producto, nunca todo-o-nada.
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EliminarLotePayload {
    #[validate(length(min = 1, message = "Selecciona al menos un producto."))]
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoEliminacion {
    pub id: i64,
    pub eliminado: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReporteEliminacion {
    pub resultados: Vec<ResultadoEliminacion>,
    pub eliminados: usize,
    pub fallidos: usize,
}

// ---
// Generación de matriz talla x color
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerarMatrizPayload {
    #[serde(default)]
    pub tallas: Vec<i64>,
    #[serde(default)]
    pub colores: Vec<i64>,
    #[serde(default)]
    pub existentes: Vec<ProductoVariante>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatrizGenerada {
    pub variantes: Vec<ProductoVariante>,
    pub nuevas: usize,
    pub cantidad_total: u32,
    pub mensaje: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SugerirSkuPayload {
    #[serde(default)]
    pub nombre: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkuSugerido {
    pub sku: String,
}
