// src/services/impresion_service.rs
//
// Despacho de la cola a una superficie de impresión. El documento se
// compone con genpdf según el formato elegido, incrustando las imágenes de
// código de barras que renderiza el backend. La espera por esas imágenes
// tiene un período de gracia: si una no llega a tiempo, la etiqueta sale
// con el área de simbología en blanco y el despacho continúa igual.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use genpdf::{elements, style, Alignment, Element};
use uuid::Uuid;

use crate::{
    backend::ProductosApi,
    common::error::AppError,
    models::etiquetas::{DatosEtiqueta, EntradaCola, FormatoImpresion, ResultadoImpresion},
    services::etiquetas_service,
};

// Geometría en milímetros
const ANCHO_ETIQUETA_ROLLO: f64 = 50.0;
const ALTO_ETIQUETA_ROLLO: f64 = 25.0;
const ANCHO_A4: f64 = 210.0;
const MARGEN_HOJA: f64 = 10.0;
const ANCHO_MINIMO_ETIQUETA: f64 = 50.0;
const ESPACIO_ENTRE_ETIQUETAS: f64 = 5.0;

// La superficie recibe el documento ya compuesto. La implementación por
// defecto lo deja en un directorio de spool que recoge el sistema de
// impresión; fallar aquí no es fatal y la cola queda lista para reintentar.
#[async_trait]
pub trait SuperficieImpresion: Send + Sync {
    async fn despachar(&self, nombre_archivo: &str, documento: &[u8]) -> Result<PathBuf, AppError>;
}

pub struct SpoolArchivos {
    directorio: PathBuf,
}

impl SpoolArchivos {
    pub fn new(directorio: impl Into<PathBuf>) -> Self {
        Self {
            directorio: directorio.into(),
        }
    }
}

#[async_trait]
impl SuperficieImpresion for SpoolArchivos {
    async fn despachar(&self, nombre_archivo: &str, documento: &[u8]) -> Result<PathBuf, AppError> {
        tokio::fs::create_dir_all(&self.directorio)
            .await
            .map_err(|e| {
                AppError::ErrorImpresion(format!("no se pudo preparar el spool: {}", e))
            })?;

        let ruta = self.directorio.join(nombre_archivo);
        tokio::fs::write(&ruta, documento)
            .await
            .map_err(|e| AppError::ErrorImpresion(format!("no se pudo escribir el documento: {}", e)))?;
        Ok(ruta)
    }
}

#[derive(Clone)]
pub struct ImpresionService {
    productos_api: Arc<dyn ProductosApi>,
    superficie: Arc<dyn SuperficieImpresion>,
    directorio_fuentes: PathBuf,
    // Período de gracia para que el backend entregue las simbologías
    gracia: Duration,
}

impl ImpresionService {
    pub fn new(
        productos_api: Arc<dyn ProductosApi>,
        superficie: Arc<dyn SuperficieImpresion>,
        directorio_fuentes: impl Into<PathBuf>,
        gracia: Duration,
    ) -> Self {
        Self {
            productos_api,
            superficie,
            directorio_fuentes: directorio_fuentes.into(),
            gracia,
        }
    }

    pub async fn imprimir(
        &self,
        entradas: &[EntradaCola],
        formato: FormatoImpresion,
    ) -> Result<ResultadoImpresion, AppError> {
        if entradas.is_empty() {
            return Err(AppError::ReglaFormulario(vec![
                "La cola de etiquetas está vacía.".to_string(),
            ]));
        }

        let datos: Vec<DatosEtiqueta> = entradas
            .iter()
            .map(etiquetas_service::datos_etiqueta)
            .collect();
        let total_etiquetas: u32 = entradas.iter().map(|e| e.cantidad).sum();

        tracing::info!("Preparando {} etiquetas...", total_etiquetas);

        // 1. Imágenes de simbología, una por entrada (las copias la reúsan)
        let imagenes = self.buscar_imagenes(&datos).await;

        // 2. Composición del documento
        let documento = self.componer_pdf(entradas, &datos, &imagenes, formato)?;

        // 3. Despacho a la superficie
        let trabajo = Uuid::new_v4();
        let nombre_archivo = format!("etiquetas-{}.pdf", trabajo);
        let ruta = self.superficie.despachar(&nombre_archivo, &documento).await?;

        tracing::info!("✅ Trabajo {} despachado en {}", trabajo, ruta.display());
        Ok(ResultadoImpresion {
            trabajo: trabajo.to_string(),
            total_etiquetas,
            archivo: ruta.display().to_string(),
        })
    }

    // Descarga las imágenes en paralelo, cada una acotada por el período de
    // gracia. Una descarga tardía o fallida vale None: etiqueta en blanco.
    async fn buscar_imagenes(&self, datos: &[DatosEtiqueta]) -> Vec<Option<image::DynamicImage>> {
        let mut tareas = Vec::with_capacity(datos.len());
        for dato in datos {
            let api = self.productos_api.clone();
            let gracia = self.gracia;
            let id_variante = dato.id_variante;
            let id_producto = dato.id_producto;

            tareas.push(tokio::spawn(async move {
                let descarga = async {
                    match (id_variante, id_producto) {
                        (Some(id), _) => api.imagen_codigo_barras_variante(id).await.ok(),
                        (None, Some(id)) => api.imagen_codigo_barras(id).await.ok(),
                        (None, None) => None,
                    }
                };
                match tokio::time::timeout(gracia, descarga).await {
                    Ok(Some(bytes)) => image::load_from_memory(&bytes).ok(),
                    _ => None,
                }
            }));
        }

        let mut imagenes = Vec::with_capacity(tareas.len());
        for tarea in tareas {
            imagenes.push(tarea.await.unwrap_or(None));
        }
        imagenes
    }

    fn componer_pdf(
        &self,
        entradas: &[EntradaCola],
        datos: &[DatosEtiqueta],
        imagenes: &[Option<image::DynamicImage>],
        formato: FormatoImpresion,
    ) -> Result<Vec<u8>, AppError> {
        // Carga la fuente de la carpeta de fuentes
        let fuentes = genpdf::fonts::from_files(&self.directorio_fuentes, "Roboto", None)
            .map_err(|_| {
                AppError::FuenteNoEncontrada(format!(
                    "fuente Roboto ausente en {}",
                    self.directorio_fuentes.display()
                ))
            })?;

        let mut doc = genpdf::Document::new(fuentes);
        doc.set_title("Impresión de Etiquetas");

        match formato {
            // Una etiqueta por página del rollo
            FormatoImpresion::RolloTermico => {
                doc.set_paper_size(genpdf::Size::new(
                    ANCHO_ETIQUETA_ROLLO,
                    ALTO_ETIQUETA_ROLLO,
                ));
                let mut decorador = genpdf::SimplePageDecorator::new();
                decorador.set_margins(1);
                doc.set_page_decorator(decorador);

                let mut primera = true;
                for (indice, entrada) in entradas.iter().enumerate() {
                    for _ in 0..entrada.cantidad {
                        if !primera {
                            doc.push(elements::PageBreak::new());
                        }
                        primera = false;
                        doc.push(bloque_etiqueta(&datos[indice], imagenes[indice].clone())?);
                    }
                }
            }

            // Rejillas sobre hoja A4: fija de 3 o automática según el ancho
            FormatoImpresion::FilaTres | FormatoImpresion::HojaA4 => {
                let mut decorador = genpdf::SimplePageDecorator::new();
                decorador.set_margins(10);
                doc.set_page_decorator(decorador);

                let columnas = match formato {
                    FormatoImpresion::FilaTres => 3,
                    _ => columnas_automaticas(ANCHO_A4, MARGEN_HOJA),
                };

                let mut tabla = elements::TableLayout::new(vec![1; columnas]);
                tabla.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

                // Expande las copias y las reparte en filas de `columnas`
                let mut celdas: Vec<usize> = Vec::new();
                for (indice, entrada) in entradas.iter().enumerate() {
                    for _ in 0..entrada.cantidad {
                        celdas.push(indice);
                    }
                }

                for grupo in celdas.chunks(columnas) {
                    let mut fila = tabla.row();
                    for indice in grupo {
                        fila = fila.element(bloque_etiqueta(
                            &datos[*indice],
                            imagenes[*indice].clone(),
                        )?);
                    }
                    // Completa la última fila con celdas vacías
                    for _ in grupo.len()..columnas {
                        fila = fila.element(elements::Paragraph::new(""));
                    }
                    fila.push()
                        .map_err(|e| AppError::ErrorImpresion(e.to_string()))?;
                }

                doc.push(tabla);
            }
        }

        // Render a memoria
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::ErrorImpresion(e.to_string()))?;
        Ok(buffer)
    }
}

// Cuántas etiquetas de ancho mínimo caben en el ancho útil de la hoja.
fn columnas_automaticas(ancho_hoja: f64, margen: f64) -> usize {
    let util = ancho_hoja - 2.0 * margen + ESPACIO_ENTRE_ETIQUETAS;
    let columnas = (util / (ANCHO_MINIMO_ETIQUETA + ESPACIO_ENTRE_ETIQUETAS)).floor();
    columnas.max(1.0) as usize
}

// El mismo contenido que el fragmento HTML: nombre, talla, simbología,
// código literal, color y precio unitario a 2 decimales.
fn bloque_etiqueta(
    datos: &DatosEtiqueta,
    imagen: Option<image::DynamicImage>,
) -> Result<elements::LinearLayout, AppError> {
    let mut bloque = elements::LinearLayout::vertical();

    bloque.push(
        elements::Paragraph::new(datos.nombre.clone())
            .aligned(Alignment::Center)
            .styled(style::Style::new().bold().with_font_size(8)),
    );

    if let Some(talla) = &datos.talla {
        bloque.push(
            elements::Paragraph::new(talla.clone())
                .aligned(Alignment::Center)
                .styled(style::Style::new().bold().with_font_size(12)),
        );
    }

    if let Some(img) = imagen {
        let simbologia = elements::Image::from_dynamic_image(img)
            .map_err(|e| AppError::ErrorImpresion(e.to_string()))?
            .with_alignment(Alignment::Center);
        bloque.push(simbologia);
    }

    bloque.push(
        elements::Paragraph::new(datos.codigo.clone())
            .aligned(Alignment::Center)
            .styled(style::Style::new().with_font_size(6)),
    );

    let pie = match &datos.color {
        Some(color) => format!("{}  S/. {:.2}", color.to_uppercase(), datos.precio_unitario),
        None => format!("S/. {:.2}", datos.precio_unitario),
    };
    bloque.push(
        elements::Paragraph::new(pie)
            .aligned(Alignment::Center)
            .styled(style::Style::new().bold().with_font_size(9)),
    );

    Ok(bloque)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::AppError;

    struct ApiInerte;

    #[async_trait]
    impl ProductosApi for ApiInerte {
        async fn listar(&self) -> Result<Vec<crate::models::producto::Producto>, AppError> {
            Ok(Vec::new())
        }
        async fn crear(
            &self,
            _p: &crate::models::producto::Producto,
        ) -> Result<crate::models::producto::Producto, AppError> {
            Err(AppError::Transporte)
        }
        async fn actualizar(
            &self,
            _id: i64,
            _p: &crate::models::producto::Producto,
        ) -> Result<crate::models::producto::Producto, AppError> {
            Err(AppError::Transporte)
        }
        async fn eliminar(&self, _id: i64) -> Result<(), AppError> {
            Err(AppError::Transporte)
        }
        async fn imagen_codigo_barras(&self, _id: i64) -> Result<Vec<u8>, AppError> {
            Err(AppError::Transporte)
        }
        async fn imagen_codigo_barras_variante(&self, _id: i64) -> Result<Vec<u8>, AppError> {
            Err(AppError::Transporte)
        }
    }

    #[tokio::test]
    async fn imprimir_cola_vacia_se_rechaza_antes_de_componer() {
        let servicio = ImpresionService::new(
            Arc::new(ApiInerte),
            Arc::new(SpoolArchivos::new(std::env::temp_dir())),
            "./fonts",
            Duration::from_millis(10),
        );

        let resultado = servicio.imprimir(&[], FormatoImpresion::RolloTermico).await;
        assert!(matches!(resultado, Err(AppError::ReglaFormulario(_))));
    }

    #[tokio::test]
    async fn el_spool_escribe_el_documento_y_devuelve_la_ruta() {
        let directorio = std::env::temp_dir().join("almacen-front-spool-test");
        let spool = SpoolArchivos::new(directorio.clone());

        let ruta = spool
            .despachar("trabajo-prueba.pdf", b"contenido")
            .await
            .expect("el spool debe aceptar el documento");

        assert!(ruta.starts_with(&directorio));
        let contenido = tokio::fs::read(&ruta).await.unwrap();
        assert_eq!(contenido, b"contenido");

        let _ = tokio::fs::remove_file(&ruta).await;
    }

    #[test]
    fn en_a4_caben_tres_columnas_de_ancho_minimo() {
        assert_eq!(columnas_automaticas(ANCHO_A4, MARGEN_HOJA), 3);
        // Una hoja angosta nunca baja de una columna
        assert_eq!(columnas_automaticas(40.0, 5.0), 1);
    }
}
