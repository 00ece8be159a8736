// src/handlers/etiquetas.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::etiquetas::{
        ActualizarCantidadPayload, AgregarEtiquetasPayload, FormatoQuery, ImprimirPayload,
        VistaCola,
    },
    services::etiquetas_service,
};

#[utoipa::path(
    get,
    path = "/api/etiquetas/cola",
    tag = "Etiquetas",
    responses(
        (status = 200, description = "Entradas de la cola y total de etiquetas físicas", body = VistaCola)
    ),
    security(("api_jwt" = []))
)]
pub async fn ver_cola(State(app_state): State<AppState>) -> impl IntoResponse {
    let cola = app_state.cola_etiquetas.lock().await;
    Json(cola.vista())
}

#[utoipa::path(
    post,
    path = "/api/etiquetas/cola",
    tag = "Etiquetas",
    request_body = AgregarEtiquetasPayload,
    responses(
        (status = 200, description = "Cola actualizada; identidades repetidas se fusionan", body = VistaCola),
        (status = 400, description = "Producto con variantes sin ninguna cantidad positiva"),
        (status = 404, description = "Producto inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn agregar(
    State(app_state): State<AppState>,
    Json(payload): Json<AgregarEtiquetasPayload>,
) -> Result<impl IntoResponse, AppError> {
    // El producto sale del catálogo vivo del backend
    let producto = app_state
        .producto_service
        .buscar(payload.id_producto)
        .await?;

    let mut cola = app_state.cola_etiquetas.lock().await;
    let agregadas = cola.agregar_producto(&producto, payload.variantes.as_deref())?;
    tracing::info!("Añadidas {} etiquetas de {}", agregadas, producto.nombre);

    Ok(Json(cola.vista()))
}

#[utoipa::path(
    patch,
    path = "/api/etiquetas/cola/{indice}",
    tag = "Etiquetas",
    request_body = ActualizarCantidadPayload,
    responses(
        (status = 200, description = "Valores no numéricos o < 1 dejan la fila como estaba", body = VistaCola)
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar_cantidad(
    State(app_state): State<AppState>,
    Path(indice): Path<usize>,
    Json(payload): Json<ActualizarCantidadPayload>,
) -> impl IntoResponse {
    let mut cola = app_state.cola_etiquetas.lock().await;
    cola.actualizar_cantidad(indice, &payload.cantidad);
    Json(cola.vista())
}

#[utoipa::path(
    delete,
    path = "/api/etiquetas/cola/{indice}",
    tag = "Etiquetas",
    responses(
        (status = 200, description = "Entrada quitada sin refusionar el resto", body = VistaCola),
        (status = 404, description = "Índice fuera de rango")
    ),
    security(("api_jwt" = []))
)]
pub async fn quitar(
    State(app_state): State<AppState>,
    Path(indice): Path<usize>,
) -> Result<impl IntoResponse, AppError> {
    let mut cola = app_state.cola_etiquetas.lock().await;
    if !cola.quitar(indice) {
        return Err(AppError::NoEncontrado(
            "No existe esa entrada en la cola.".to_string(),
        ));
    }
    Ok(Json(cola.vista()))
}

// Vaciar la cola es una decisión del operador: imprimir nunca la limpia.
#[utoipa::path(
    delete,
    path = "/api/etiquetas/cola",
    tag = "Etiquetas",
    responses((status = 204, description = "Cola vaciada")),
    security(("api_jwt" = []))
)]
pub async fn limpiar(State(app_state): State<AppState>) -> impl IntoResponse {
    let mut cola = app_state.cola_etiquetas.lock().await;
    cola.limpiar();
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    get,
    path = "/api/etiquetas/cola/render",
    tag = "Etiquetas",
    params(FormatoQuery),
    responses(
        (status = 200, description = "Documento HTML de etiquetas en el formato pedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn render(
    State(app_state): State<AppState>,
    Query(query): Query<FormatoQuery>,
) -> impl IntoResponse {
    let cola = app_state.cola_etiquetas.lock().await;
    Html(etiquetas_service::render_html(cola.entradas(), query.formato))
}

#[utoipa::path(
    post,
    path = "/api/etiquetas/imprimir",
    tag = "Etiquetas",
    request_body = ImprimirPayload,
    responses(
        (status = 200, description = "Trabajo despachado; la cola se conserva para reimpresiones"),
        (status = 400, description = "Cola vacía"),
        (status = 503, description = "Superficie de impresión no disponible; la cola queda intacta")
    ),
    security(("api_jwt" = []))
)]
pub async fn imprimir(
    State(app_state): State<AppState>,
    Json(payload): Json<ImprimirPayload>,
) -> Result<impl IntoResponse, AppError> {
    // Copia instantánea de la cola: el candado no se sostiene durante las
    // descargas de simbología ni la composición del documento.
    let entradas = {
        let cola = app_state.cola_etiquetas.lock().await;
        cola.entradas().to_vec()
    };

    let resultado = app_state
        .impresion_service
        .imprimir(&entradas, payload.formato)
        .await?;

    // La cola NO se vacía tras imprimir: limpiar es un DELETE explícito.
    Ok(Json(resultado))
}
