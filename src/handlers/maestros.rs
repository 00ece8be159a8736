// src/handlers/maestros.rs

use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::maestros::{
        CrearCategoriaPayload, CrearColorPayload, CrearProveedorPayload, CrearTallaPayload,
    },
    services::{maestros_service, matriz_service},
};

// ---
// Query: filtro de texto para los selectores de la matriz
// ---
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct FiltroTexto {
    pub filtro: Option<String>,
}

// ---
// TALLAS
// ---

#[utoipa::path(
    get,
    path = "/api/maestros/tallas",
    tag = "Maestros",
    params(FiltroTexto),
    responses(
        (status = 200, description = "Tallas filtradas y en orden natural (números primero)")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_tallas(
    State(app_state): State<AppState>,
    Query(query): Query<FiltroTexto>,
) -> Result<impl IntoResponse, AppError> {
    let tallas = app_state.maestros_service.tallas().await?;
    let filtradas = matriz_service::filtrar_tallas(&tallas, query.filtro.as_deref().unwrap_or(""));
    Ok(Json(filtradas))
}

#[utoipa::path(
    post,
    path = "/api/maestros/tallas",
    tag = "Maestros",
    request_body = CrearTallaPayload,
    responses(
        (status = 201, description = "Talla creada; la caché queda invalidada")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear_talla(
    State(app_state): State<AppState>,
    Json(payload): Json<CrearTallaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let talla = app_state
        .maestros_service
        .crear_talla(&payload.nombre_talla)
        .await?;
    Ok((StatusCode::CREATED, Json(talla)))
}

#[utoipa::path(
    delete,
    path = "/api/maestros/tallas/{id}",
    tag = "Maestros",
    responses(
        (status = 204, description = "Talla eliminada"),
        (status = 409, description = "En uso por algún producto")
    ),
    security(("api_jwt" = []))
)]
pub async fn eliminar_talla(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.maestros_service.eliminar_talla(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// COLORES
// ---

#[utoipa::path(
    get,
    path = "/api/maestros/colores",
    tag = "Maestros",
    params(FiltroTexto),
    responses((status = 200, description = "Colores filtrados por nombre")),
    security(("api_jwt" = []))
)]
pub async fn listar_colores(
    State(app_state): State<AppState>,
    Query(query): Query<FiltroTexto>,
) -> Result<impl IntoResponse, AppError> {
    let colores = app_state.maestros_service.colores().await?;
    let filtrados =
        matriz_service::filtrar_colores(&colores, query.filtro.as_deref().unwrap_or(""));
    Ok(Json(filtrados))
}

#[utoipa::path(
    post,
    path = "/api/maestros/colores",
    tag = "Maestros",
    request_body = CrearColorPayload,
    responses((status = 201, description = "Color creado")),
    security(("api_jwt" = []))
)]
pub async fn crear_color(
    State(app_state): State<AppState>,
    Json(payload): Json<CrearColorPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let color = app_state
        .maestros_service
        .crear_color(&payload.nombre, payload.codigo_hex.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(color)))
}

#[utoipa::path(
    delete,
    path = "/api/maestros/colores/{id}",
    tag = "Maestros",
    responses(
        (status = 204, description = "Color eliminado"),
        (status = 409, description = "En uso por algún producto")
    ),
    security(("api_jwt" = []))
)]
pub async fn eliminar_color(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.maestros_service.eliminar_color(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// PROVEEDORES
// ---

#[utoipa::path(
    get,
    path = "/api/maestros/proveedores",
    tag = "Maestros",
    responses((status = 200, description = "Listado de proveedores")),
    security(("api_jwt" = []))
)]
pub async fn listar_proveedores(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let proveedores = app_state.maestros_service.proveedores().await?;
    Ok(Json(proveedores))
}

#[utoipa::path(
    post,
    path = "/api/maestros/proveedores",
    tag = "Maestros",
    request_body = CrearProveedorPayload,
    responses((status = 201, description = "Proveedor registrado")),
    security(("api_jwt" = []))
)]
pub async fn crear_proveedor(
    State(app_state): State<AppState>,
    Json(payload): Json<CrearProveedorPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let proveedor = app_state
        .maestros_service
        .crear_proveedor(&payload.nombre, &payload.ruc)
        .await?;
    Ok((StatusCode::CREATED, Json(proveedor)))
}

#[utoipa::path(
    delete,
    path = "/api/maestros/proveedores/{id}",
    tag = "Maestros",
    responses((status = 204, description = "Proveedor eliminado")),
    security(("api_jwt" = []))
)]
pub async fn eliminar_proveedor(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.maestros_service.eliminar_proveedor(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/maestros/proveedores/buscar/{ruc}",
    tag = "Maestros",
    responses(
        (status = 200, description = "Razón social encontrada en SUNAT"),
        (status = 400, description = "RUC con formato inválido"),
        (status = 404, description = "RUC inexistente"),
        (status = 502, description = "Sin conexión con el servicio")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar_ruc(
    State(app_state): State<AppState>,
    Path(ruc): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let proveedor = app_state.maestros_service.buscar_por_ruc(&ruc).await?;
    Ok(Json(proveedor))
}

// ---
// CATEGORÍAS
// ---

#[utoipa::path(
    get,
    path = "/api/maestros/categorias/principales",
    tag = "Maestros",
    responses((status = 200, description = "Categorías de primer nivel")),
    security(("api_jwt" = []))
)]
pub async fn listar_categorias_principales(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let categorias = app_state.maestros_service.categorias_principales().await?;
    Ok(Json(categorias))
}

#[utoipa::path(
    get,
    path = "/api/maestros/categorias/{id}/subcategorias",
    tag = "Maestros",
    responses((status = 200, description = "Subcategorías del padre indicado")),
    security(("api_jwt" = []))
)]
pub async fn listar_subcategorias(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let subcategorias = app_state.maestros_service.subcategorias(id).await?;
    Ok(Json(subcategorias))
}

#[utoipa::path(
    get,
    path = "/api/maestros/categorias/arbol",
    tag = "Maestros",
    responses((status = 200, description = "Árbol completo de categorías")),
    security(("api_jwt" = []))
)]
pub async fn arbol_categorias(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let arbol = app_state.maestros_service.arbol_categorias().await?;
    Ok(Json(arbol))
}

// Ids expandidos separados por coma, p. ej. ?expandidos=1,4,9
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct ExpandidosQuery {
    pub expandidos: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/maestros/categorias/arbol/visible",
    tag = "Maestros",
    params(ExpandidosQuery),
    responses(
        (status = 200, description = "Filas visibles del árbol según el estado de expansión")
    ),
    security(("api_jwt" = []))
)]
pub async fn arbol_visible(
    State(app_state): State<AppState>,
    Query(query): Query<ExpandidosQuery>,
) -> Result<impl IntoResponse, AppError> {
    let expandidos: HashSet<i64> = query
        .expandidos
        .as_deref()
        .unwrap_or("")
        .split(',')
        .filter_map(|parte| parte.trim().parse().ok())
        .collect();

    let arbol = app_state.maestros_service.arbol_categorias().await?;
    let filas = maestros_service::aplanar_arbol(&arbol, &expandidos);
    Ok(Json(filas))
}

#[utoipa::path(
    post,
    path = "/api/maestros/categorias",
    tag = "Maestros",
    request_body = CrearCategoriaPayload,
    responses(
        (status = 201, description = "Categoría creada (raíz o subcategoría según idPadre)"),
        (status = 409, description = "Ya existe una categoría con ese nombre")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear_categoria(
    State(app_state): State<AppState>,
    Json(payload): Json<CrearCategoriaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let categoria = app_state
        .maestros_service
        .crear_categoria(&payload.nombre, payload.id_padre)
        .await?;
    Ok((StatusCode::CREATED, Json(categoria)))
}

#[utoipa::path(
    delete,
    path = "/api/maestros/categorias/{id}",
    tag = "Maestros",
    responses(
        (status = 204, description = "Categoría eliminada"),
        (status = 409, description = "Tiene productos asociados")
    ),
    security(("api_jwt" = []))
)]
pub async fn eliminar_categoria(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.maestros_service.eliminar_categoria(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
