// src/handlers/inventario.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::producto::{
        EliminarLotePayload, GenerarMatrizPayload, MatrizGenerada, FiltroProductos,
        ProductoFormulario, SkuSugerido, SugerirSkuPayload,
    },
    services::{
        matriz_service::{self, ResultadoMatriz},
        producto_service::ProductoService,
    },
};

// ---
// Listado con filtros combinables
// ---
#[utoipa::path(
    get,
    path = "/api/inventario/productos",
    tag = "Inventario",
    params(FiltroProductos),
    responses(
        (status = 200, description = "Productos filtrados, con el conteo mostrados/total")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_productos(
    State(app_state): State<AppState>,
    Query(filtro): Query<FiltroProductos>,
) -> Result<impl IntoResponse, AppError> {
    let listado = app_state.producto_service.listar(&filtro).await?;
    Ok(Json(listado))
}

// ---
// Alta y edición
// ---
#[utoipa::path(
    post,
    path = "/api/inventario/productos",
    tag = "Inventario",
    request_body = ProductoFormulario,
    responses(
        (status = 201, description = "Producto creado; con variantes, el stock es su suma"),
        (status = 400, description = "Campos obligatorios o escala de precios inconsistente"),
        (status = 409, description = "SKU o nombre duplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear_producto(
    State(app_state): State<AppState>,
    Json(payload): Json<ProductoFormulario>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let creado = app_state.producto_service.guardar(None, &payload).await?;
    Ok((StatusCode::CREATED, Json(creado)))
}

#[utoipa::path(
    put,
    path = "/api/inventario/productos/{id}",
    tag = "Inventario",
    request_body = ProductoFormulario,
    responses(
        (status = 200, description = "Producto actualizado"),
        (status = 400, description = "Escala de precios inconsistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar_producto(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductoFormulario>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let actualizado = app_state
        .producto_service
        .guardar(Some(id), &payload)
        .await?;
    Ok((StatusCode::OK, Json(actualizado)))
}

#[utoipa::path(
    delete,
    path = "/api/inventario/productos/{id}",
    tag = "Inventario",
    responses((status = 204, description = "Producto eliminado")),
    security(("api_jwt" = []))
)]
pub async fn eliminar_producto(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.producto_service.eliminar(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Lote: el resultado se informa producto por producto, no todo-o-nada.
#[utoipa::path(
    post,
    path = "/api/inventario/productos/eliminar-lote",
    tag = "Inventario",
    request_body = EliminarLotePayload,
    responses(
        (status = 200, description = "Reporte con el veredicto de cada producto")
    ),
    security(("api_jwt" = []))
)]
pub async fn eliminar_lote(
    State(app_state): State<AppState>,
    Json(payload): Json<EliminarLotePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let reporte = app_state.producto_service.eliminar_lote(&payload.ids).await;
    Ok(Json(reporte))
}

// ---
// Duplicación: devuelve el borrador precargado, sin persistir nada
// ---
#[utoipa::path(
    post,
    path = "/api/inventario/productos/{id}/duplicar",
    tag = "Inventario",
    responses(
        (status = 200, description = "Copia sin identidad, con stock en cero y SKU/nombre sufijados"),
        (status = 404, description = "Producto inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn duplicar_producto(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let original = app_state.producto_service.buscar(id).await?;
    let borrador = ProductoService::duplicar(&original);
    Ok(Json(borrador))
}

#[utoipa::path(
    post,
    path = "/api/inventario/productos/generar-sku",
    tag = "Inventario",
    request_body = SugerirSkuPayload,
    responses((status = 200, description = "SKU sugerido", body = SkuSugerido)),
    security(("api_jwt" = []))
)]
pub async fn generar_sku(Json(payload): Json<SugerirSkuPayload>) -> impl IntoResponse {
    Json(SkuSugerido {
        sku: ProductoService::sugerir_sku(&payload.nombre),
    })
}

// ---
// Matriz talla x color
// ---
#[utoipa::path(
    post,
    path = "/api/inventario/productos/matriz",
    tag = "Inventario",
    request_body = GenerarMatrizPayload,
    responses(
        (status = 200, description = "Variantes existentes más las combinaciones nuevas en cero", body = MatrizGenerada),
        (status = 400, description = "Selección vacía en tallas o colores")
    ),
    security(("api_jwt" = []))
)]
pub async fn generar_matriz(
    State(app_state): State<AppState>,
    Json(payload): Json<GenerarMatrizPayload>,
) -> Result<impl IntoResponse, AppError> {
    // Resuelve los catálogos desde el registro (caché mediante)
    let tallas = app_state.maestros_service.tallas().await?;
    let colores = app_state.maestros_service.colores().await?;

    let resultado = matriz_service::generar_matriz(
        &payload.tallas,
        &payload.colores,
        &payload.existentes,
        &tallas,
        &colores,
    );

    match resultado {
        ResultadoMatriz::SeleccionVacia => Err(AppError::ReglaFormulario(vec![
            "Selecciona al menos una talla y un color.".to_string(),
        ])),
        ResultadoMatriz::Generadas { variantes, nuevas } => {
            // El solape total no es un error, pero el mensaje lo distingue
            let mensaje = if nuevas > 0 {
                format!("Variantes generadas: {}. Ingresa las cantidades en la tabla.", nuevas)
            } else {
                "Las combinaciones seleccionadas ya existían: no se agregaron filas.".to_string()
            };

            Ok(Json(MatrizGenerada {
                cantidad_total: matriz_service::cantidad_total(&variantes),
                nuevas,
                variantes,
                mensaje,
            }))
        }
    }
}

// ---
// Imágenes de código de barras (passthrough del backend)
// ---
#[utoipa::path(
    get,
    path = "/api/inventario/productos/{id}/codigo-barras",
    tag = "Inventario",
    responses(
        (status = 200, description = "Imagen PNG de la simbología del producto"),
        (status = 404, description = "Producto sin código generado")
    ),
    security(("api_jwt" = []))
)]
pub async fn imagen_codigo_barras(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = app_state.producto_service.imagen_codigo_barras(id).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

#[utoipa::path(
    get,
    path = "/api/inventario/variantes/{id}/codigo-barras",
    tag = "Inventario",
    responses(
        (status = 200, description = "Imagen PNG de la simbología de la variante")
    ),
    security(("api_jwt" = []))
)]
pub async fn imagen_codigo_barras_variante(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = app_state
        .producto_service
        .imagen_codigo_barras_variante(id)
        .await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}
