// src/models/etiquetas.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::producto::{Producto, ProductoVariante};

// Identidad compuesta de una entrada de la cola: producto + variante opcional.
// Clave con igualdad por valor, no concatenación de cadenas, para que dos
// combinaciones distintas jamás colisionen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaveEtiqueta {
    Simple { id_producto: i64 },
    Variante { id_producto: i64, id_talla: i64, id_color: i64 },
}

impl ClaveEtiqueta {
    pub fn de(producto: &Producto, variante: Option<&ProductoVariante>) -> Self {
        let id_producto = producto.id_producto.unwrap_or_default();
        match variante {
            Some(v) => ClaveEtiqueta::Variante {
                id_producto,
                id_talla: v.talla.id_talla,
                id_color: v.color.id_color,
            },
            None => ClaveEtiqueta::Simple { id_producto },
        }
    }
}

// Entrada viva de la cola. Solo existe durante la sesión de impresión.
#[derive(Debug, Clone)]
pub struct EntradaCola {
    pub clave: ClaveEtiqueta,
    pub producto: Producto,
    pub variante: Option<ProductoVariante>,
    pub cantidad: u32,
}

// Los tres formatos físicos soportados. Cambian el contenedor y el tamaño
// de etiqueta; el contenido del fragmento es el mismo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum FormatoImpresion {
    // Etiquetas individuales (Zebra, Xprinter, etc.)
    #[serde(rename = "THERMAL_ROLL_1")]
    RolloTermico,
    // Filas de 3 columnas en papel continuo u hoja
    #[serde(rename = "ROW_3_COLS")]
    FilaTres,
    // Cuadrícula automática para hoja carta/A4
    #[serde(rename = "A4_SHEET")]
    HojaA4,
}

impl Default for FormatoImpresion {
    fn default() -> Self {
        FormatoImpresion::RolloTermico
    }
}

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CantidadVariante {
    pub id_talla: i64,
    pub id_color: i64,
    pub cantidad: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgregarEtiquetasPayload {
    pub id_producto: i64,
    // Obligatorio cuando el producto tiene variantes: una cantidad por fila
    // del modal (las que queden en cero simplemente no se agregan).
    #[serde(default)]
    pub variantes: Option<Vec<CantidadVariante>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarCantidadPayload {
    // Llega como texto desde el campo de la tabla; valores no numéricos o
    // menores que 1 dejan la entrada como estaba.
    pub cantidad: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FormatoQuery {
    #[serde(default)]
    pub formato: FormatoImpresion,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImprimirPayload {
    #[serde(default)]
    pub formato: FormatoImpresion,
}

// ---
// Vistas de respuesta
// ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntradaColaVista {
    pub nombre: String,
    pub codigo_identificacion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub talla: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub cantidad: u32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VistaCola {
    pub entradas: Vec<EntradaColaVista>,
    // Suma de cantidades: etiquetas físicas a imprimir, no filas de la cola.
    pub total_etiquetas: u32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoImpresion {
    pub trabajo: String,
    pub total_etiquetas: u32,
    pub archivo: String,
}

// Datos ya resueltos de un fragmento de etiqueta; los comparten el render
// HTML y el documento PDF despachable.
#[derive(Debug, Clone)]
pub struct DatosEtiqueta {
    pub nombre: String,
    pub talla: Option<String>,
    pub color: Option<String>,
    pub codigo: String,
    pub precio_unitario: Decimal,
    pub id_producto: Option<i64>,
    pub id_variante: Option<i64>,
}
