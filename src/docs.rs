// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Autenticación ---
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::sesion,

        // --- Maestros ---
        handlers::maestros::listar_tallas,
        handlers::maestros::crear_talla,
        handlers::maestros::eliminar_talla,
        handlers::maestros::listar_colores,
        handlers::maestros::crear_color,
        handlers::maestros::eliminar_color,
        handlers::maestros::listar_proveedores,
        handlers::maestros::crear_proveedor,
        handlers::maestros::eliminar_proveedor,
        handlers::maestros::buscar_ruc,
        handlers::maestros::listar_categorias_principales,
        handlers::maestros::listar_subcategorias,
        handlers::maestros::arbol_categorias,
        handlers::maestros::arbol_visible,
        handlers::maestros::crear_categoria,
        handlers::maestros::eliminar_categoria,

        // --- Inventario ---
        handlers::inventario::listar_productos,
        handlers::inventario::crear_producto,
        handlers::inventario::actualizar_producto,
        handlers::inventario::eliminar_producto,
        handlers::inventario::eliminar_lote,
        handlers::inventario::duplicar_producto,
        handlers::inventario::generar_sku,
        handlers::inventario::generar_matriz,
        handlers::inventario::imagen_codigo_barras,
        handlers::inventario::imagen_codigo_barras_variante,

        // --- Etiquetas ---
        handlers::etiquetas::ver_cola,
        handlers::etiquetas::agregar,
        handlers::etiquetas::actualizar_cantidad,
        handlers::etiquetas::quitar,
        handlers::etiquetas::limpiar,
        handlers::etiquetas::render,
        handlers::etiquetas::imprimir,
    ),
    components(
        schemas(
            // --- Autenticación ---
            models::auth::SignInPayload,
            models::auth::SesionVista,

            // --- Maestros ---
            models::maestros::Talla,
            models::maestros::Color,
            models::maestros::Proveedor,
            models::maestros::Categoria,
            models::maestros::CategoriaArbol,
            models::maestros::NodoArbolVisible,
            models::maestros::CrearTallaPayload,
            models::maestros::CrearColorPayload,
            models::maestros::CrearProveedorPayload,
            models::maestros::CrearCategoriaPayload,

            // --- Inventario ---
            models::producto::Sexo,
            models::producto::TipoPublico,
            models::producto::ProductoVariante,
            models::producto::Producto,
            models::producto::ProductoFormulario,
            models::producto::ListadoProductos,
            models::producto::EliminarLotePayload,
            models::producto::ResultadoEliminacion,
            models::producto::ReporteEliminacion,
            models::producto::GenerarMatrizPayload,
            models::producto::MatrizGenerada,
            models::producto::SugerirSkuPayload,
            models::producto::SkuSugerido,

            // --- Etiquetas ---
            models::etiquetas::FormatoImpresion,
            models::etiquetas::CantidadVariante,
            models::etiquetas::AgregarEtiquetasPayload,
            models::etiquetas::ActualizarCantidadPayload,
            models::etiquetas::ImprimirPayload,
            models::etiquetas::EntradaColaVista,
            models::etiquetas::VistaCola,
            models::etiquetas::ResultadoImpresion,
        )
    ),
    tags(
        (name = "Autenticación", description = "Sesión del operador contra el backend"),
        (name = "Maestros", description = "Tallas, Colores, Proveedores y Categorías"),
        (name = "Inventario", description = "Productos, variantes y matriz talla x color"),
        (name = "Etiquetas", description = "Cola de impresión y despacho de etiquetas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
