// src/models/maestros.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// --- 1. Tallas ---
// El catálogo mezcla tallas numéricas ("38", "42.5") y de letra ("M", "XL");
// el orden de presentación lo resuelve el motor de matriz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Talla {
    pub id_talla: i64,
    pub nombre_talla: String,
}

// --- 2. Colores ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub id_color: i64,
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codigo_hex: Option<String>,
}

// --- 3. Proveedores ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Proveedor {
    pub id_proveedor: i64,
    pub nombre: String,
    pub ruc: String,
}

// --- 4. Categorías ---
// El formulario usa dos niveles (principal -> subcategoría); el padre viaja
// anidado cuando el backend lo incluye.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Categoria {
    pub id_categoria: i64,
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria_padre: Option<Box<Categoria>>,
}

// Árbol de profundidad arbitraria para la vista de gestión.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoriaArbol {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub subcategorias: Vec<CategoriaArbol>,
}

// Fila del árbol ya aplanada para pintar: el estado de expansión vive en un
// mapa id -> bool fuera de la estructura, nunca dentro de los nodos.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodoArbolVisible {
    pub id: i64,
    pub nombre: String,
    pub nivel: usize,
    pub tiene_hijos: bool,
    pub expandido: bool,
}

// ---
// Payloads de creación
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearTallaPayload {
    #[validate(length(min = 1, message = "El nombre de la talla es obligatorio."))]
    pub nombre_talla: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearColorPayload {
    #[validate(length(min = 1, message = "El nombre del color es obligatorio."))]
    pub nombre: String,
    pub codigo_hex: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearProveedorPayload {
    #[validate(length(min = 1, message = "La razón social es obligatoria."))]
    pub nombre: String,
    #[validate(length(equal = 11, message = "El RUC debe tener exactamente 11 dígitos."))]
    pub ruc: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearCategoriaPayload {
    #[validate(length(min = 1, message = "El nombre de la categoría es obligatorio."))]
    pub nombre: String,
    // Ausente => categoría principal; presente => subcategoría de ese padre.
    pub id_padre: Option<i64>,
}
