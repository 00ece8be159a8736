//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod backend;
mod common;
mod config;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::sesion_guard;

#[tokio::main]
async fn main() {
    // Inicializa el logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() está bien aquí: si la configuración falla, la aplicación
    // no debe arrancar.
    let app_state = AppState::new()
        .await
        .expect("Falla al inicializar el estado de la aplicación.");

    // Rutas públicas de autenticación
    let rutas_login = Router::new().route("/login", post(handlers::auth::login));

    // Rutas de sesión (protegidas por el guardia)
    let rutas_sesion = Router::new()
        .route("/sesion", get(handlers::auth::sesion))
        .route("/logout", post(handlers::auth::logout))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            sesion_guard,
        ));

    let rutas_maestros = Router::new()
        .route(
            "/tallas",
            get(handlers::maestros::listar_tallas).post(handlers::maestros::crear_talla),
        )
        .route("/tallas/{id}", delete(handlers::maestros::eliminar_talla))
        .route(
            "/colores",
            get(handlers::maestros::listar_colores).post(handlers::maestros::crear_color),
        )
        .route("/colores/{id}", delete(handlers::maestros::eliminar_color))
        .route(
            "/proveedores",
            get(handlers::maestros::listar_proveedores)
                .post(handlers::maestros::crear_proveedor),
        )
        .route(
            "/proveedores/{id}",
            delete(handlers::maestros::eliminar_proveedor),
        )
        .route(
            "/proveedores/buscar/{ruc}",
            get(handlers::maestros::buscar_ruc),
        )
        .route("/categorias", post(handlers::maestros::crear_categoria))
        .route(
            "/categorias/principales",
            get(handlers::maestros::listar_categorias_principales),
        )
        .route(
            "/categorias/arbol",
            get(handlers::maestros::arbol_categorias),
        )
        .route(
            "/categorias/arbol/visible",
            get(handlers::maestros::arbol_visible),
        )
        .route(
            "/categorias/{id}/subcategorias",
            get(handlers::maestros::listar_subcategorias),
        )
        .route(
            "/categorias/{id}",
            delete(handlers::maestros::eliminar_categoria),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            sesion_guard,
        ));

    let rutas_inventario = Router::new()
        .route(
            "/productos",
            get(handlers::inventario::listar_productos)
                .post(handlers::inventario::crear_producto),
        )
        .route(
            "/productos/matriz",
            post(handlers::inventario::generar_matriz),
        )
        .route(
            "/productos/generar-sku",
            post(handlers::inventario::generar_sku),
        )
        .route(
            "/productos/eliminar-lote",
            post(handlers::inventario::eliminar_lote),
        )
        .route(
            "/productos/{id}",
            put(handlers::inventario::actualizar_producto)
                .delete(handlers::inventario::eliminar_producto),
        )
        .route(
            "/productos/{id}/duplicar",
            post(handlers::inventario::duplicar_producto),
        )
        .route(
            "/productos/{id}/codigo-barras",
            get(handlers::inventario::imagen_codigo_barras),
        )
        .route(
            "/variantes/{id}/codigo-barras",
            get(handlers::inventario::imagen_codigo_barras_variante),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            sesion_guard,
        ));

    let rutas_etiquetas = Router::new()
        .route(
            "/cola",
            get(handlers::etiquetas::ver_cola)
                .post(handlers::etiquetas::agregar)
                .delete(handlers::etiquetas::limpiar),
        )
        .route("/cola/render", get(handlers::etiquetas::render))
        .route(
            "/cola/{indice}",
            patch(handlers::etiquetas::actualizar_cantidad)
                .delete(handlers::etiquetas::quitar),
        )
        .route("/imprimir", post(handlers::etiquetas::imprimir))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            sesion_guard,
        ));

    // Combina todo en el router principal
    let app = Router::new()
        .route("/api/salud", get(|| async { "OK" }))
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .nest("/api/autenticacion", rutas_login)
        .nest("/api/autenticacion", rutas_sesion)
        .nest("/api/maestros", rutas_maestros)
        .nest("/api/inventario", rutas_inventario)
        .nest("/api/etiquetas", rutas_etiquetas)
        .with_state(app_state);

    // Inicia el servidor local
    let addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:4600".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falla al iniciar el listener TCP");
    tracing::info!(
        "🚀 Frontend de almacén escuchando en {}",
        listener.local_addr().expect("dirección local")
    );
    axum::serve(listener, app).await.expect("Error en el servidor Axum");
}
