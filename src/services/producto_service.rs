// src/services/producto_service.rs

use std::sync::Arc;

use rand::Rng;

use crate::{
    backend::ProductosApi,
    common::error::AppError,
    models::producto::{
        FiltroProductos, ListadoProductos, Producto, ProductoFormulario, ReporteEliminacion,
        ResultadoEliminacion,
    },
    services::{matriz_service, precios_service},
};

// Stock total <= 5 cuenta como "stock bajo" en el filtro del inventario.
const UMBRAL_STOCK_BAJO: u32 = 5;

#[derive(Clone)]
pub struct ProductoService {
    api: Arc<dyn ProductosApi>,
}

impl ProductoService {
    pub fn new(api: Arc<dyn ProductosApi>) -> Self {
        Self { api }
    }

    // --- ARMADO DEL AGREGADO ---
    // Proyección pura del estado del formulario al producto persistible.
    // Con variantes presentes, la suma de sus cantidades manda sobre el
    // stock simple tipeado; sin variantes, el campo queda fuera del envío.
    pub fn armar_envio(form: &ProductoFormulario) -> Producto {
        let con_variantes = !form.variantes.is_empty();
        let cantidad_total = if con_variantes {
            matriz_service::cantidad_total(&form.variantes)
        } else {
            form.cantidad.unwrap_or(0)
        };

        Producto {
            id_producto: None,
            codigo_identificacion: form.codigo_identificacion.clone(),
            codigo_barras: form.codigo_barras.clone().filter(|c| !c.is_empty()),
            nombre: form.nombre.clone(),
            marca: form.marca.clone(),
            sexo: form.sexo,
            tipo_publico: form.tipo_publico,
            precio_unitario: form.precio_unitario,
            precio_cuarto: form.precio_cuarto,
            precio_media_docena: form.precio_media_docena,
            precio_docena: form.precio_docena,
            categoria: form.categoria.clone(),
            categoria_padre: form.categoria_padre.clone(),
            proveedor: form.proveedor.clone(),
            cantidad: Some(cantidad_total),
            variantes: con_variantes.then(|| form.variantes.clone()),
            created_at: None,
            updated_at: None,
        }
    }

    // --- DUPLICACIÓN ---
    // Borrador de copia: sin identidad, stock en cero, sin variantes, y con
    // el SKU y el nombre sufijados para que el operador los revise.
    pub fn duplicar(producto: &Producto) -> Producto {
        Producto {
            id_producto: None,
            codigo_identificacion: format!("{}-CP", producto.codigo_identificacion),
            nombre: format!("{} (Copia)", producto.nombre),
            cantidad: Some(0),
            variantes: None,
            created_at: None,
            updated_at: None,
            ..producto.clone()
        }
    }

    // --- SUGERENCIA DE SKU ---
    // Tres letras del nombre (o "PRO") + número aleatorio de 3 dígitos.
    // Ejemplo de resultado: PAN-482
    pub fn sugerir_sku(nombre: &str) -> String {
        let prefijo: String = nombre.chars().take(3).collect();
        let prefijo = if prefijo.is_empty() {
            "PRO".to_string()
        } else {
            prefijo.to_uppercase()
        };
        let aleatorio = rand::thread_rng().gen_range(0..1000);
        format!("{}-{:03}", prefijo, aleatorio)
    }

    // --- FILTRADO DEL LISTADO ---
    pub fn filtrar(productos: Vec<Producto>, filtro: &FiltroProductos) -> Vec<Producto> {
        let buscar = filtro
            .buscar
            .as_deref()
            .unwrap_or("")
            .trim()
            .to_lowercase();

        productos
            .into_iter()
            .filter(|p| {
                // A. Texto sobre nombre o SKU
                let coincide_texto = buscar.is_empty()
                    || p.nombre.to_lowercase().contains(&buscar)
                    || p.codigo_identificacion.to_lowercase().contains(&buscar);

                // B. Categoría principal
                let coincide_categoria = match filtro.categoria {
                    None => true,
                    Some(id) => p
                        .categoria_padre
                        .as_ref()
                        .is_some_and(|c| c.id_categoria == id),
                };

                // C. Proveedor
                let coincide_proveedor = match filtro.proveedor {
                    None => true,
                    Some(id) => p.proveedor.as_ref().is_some_and(|pr| pr.id_proveedor == id),
                };

                // D. Stock bajo (con variantes, el total ya viene sumado)
                let coincide_stock = !filtro.stock_bajo || p.stock_total() <= UMBRAL_STOCK_BAJO;

                coincide_texto && coincide_categoria && coincide_proveedor && coincide_stock
            })
            .collect()
    }

    // --- OPERACIONES CONTRA EL BACKEND ---

    pub async fn listar(&self, filtro: &FiltroProductos) -> Result<ListadoProductos, AppError> {
        let todos = self.api.listar().await?;
        let total = todos.len();
        let productos = Self::filtrar(todos, filtro);
        Ok(ListadoProductos {
            mostrados: productos.len(),
            total,
            productos,
        })
    }

    pub async fn buscar(&self, id: i64) -> Result<Producto, AppError> {
        self.api
            .listar()
            .await?
            .into_iter()
            .find(|p| p.id_producto == Some(id))
            .ok_or_else(|| AppError::NoEncontrado("Producto no encontrado.".to_string()))
    }

    // Crear o actualizar según haya identidad previa. La escala de precios
    // bloquea aquí, antes de tocar la red, con un mensaje por regla rota.
    pub async fn guardar(
        &self,
        id: Option<i64>,
        form: &ProductoFormulario,
    ) -> Result<Producto, AppError> {
        let errores = precios_service::validar_escala(&precios_service::EscalaPrecios::del_formulario(form));
        if !errores.es_valida() {
            return Err(AppError::ReglaFormulario(errores.mensajes));
        }

        let envio = Self::armar_envio(form);
        match id {
            Some(id) => self.api.actualizar(id, &envio).await,
            None => self.api.crear(&envio).await,
        }
    }

    pub async fn eliminar(&self, id: i64) -> Result<(), AppError> {
        self.api.eliminar(id).await
    }

    // Eliminación por lote: veredicto por producto. Nunca devuelve error;
    // el reporte distingue qué se aplicó y qué no.
    pub async fn eliminar_lote(&self, ids: &[i64]) -> ReporteEliminacion {
        let mut resultados = Vec::with_capacity(ids.len());
        for &id in ids {
            match self.api.eliminar(id).await {
                Ok(()) => resultados.push(ResultadoEliminacion {
                    id,
                    eliminado: true,
                    mensaje: None,
                }),
                Err(e) => {
                    tracing::warn!("No se pudo eliminar el producto {}: {}", id, e);
                    resultados.push(ResultadoEliminacion {
                        id,
                        eliminado: false,
                        mensaje: Some(mensaje_usuario(&e)),
                    });
                }
            }
        }

        let eliminados = resultados.iter().filter(|r| r.eliminado).count();
        ReporteEliminacion {
            fallidos: resultados.len() - eliminados,
            eliminados,
            resultados,
        }
    }

    pub async fn imagen_codigo_barras(&self, id_producto: i64) -> Result<Vec<u8>, AppError> {
        self.api.imagen_codigo_barras(id_producto).await
    }

    pub async fn imagen_codigo_barras_variante(&self, id_variante: i64) -> Result<Vec<u8>, AppError> {
        self.api.imagen_codigo_barras_variante(id_variante).await
    }
}

fn mensaje_usuario(error: &AppError) -> String {
    match error {
        AppError::Conflicto(msg) | AppError::NoEncontrado(msg) => msg.clone(),
        AppError::Transporte => "No se pudo contactar al servidor.".to_string(),
        otro => otro.to_string(),
    }
}
