// src/services/etiquetas_service.rs
//
// Cola de impresión de etiquetas. Acumula pedidos (producto, variante
// opcional, cantidad) fusionando por identidad compuesta, y rinde el
// documento HTML de etiquetas en uno de los tres formatos físicos. La cola
// vive solo en memoria durante la sesión; imprimir NO la vacía (vaciarla
// es una acción deliberada del operador).

use crate::common::error::AppError;
use crate::models::etiquetas::{
    CantidadVariante, ClaveEtiqueta, DatosEtiqueta, EntradaCola, EntradaColaVista,
    FormatoImpresion, VistaCola,
};
use crate::models::producto::{Producto, ProductoVariante};

#[derive(Default)]
pub struct ColaEtiquetas {
    entradas: Vec<EntradaCola>,
}

impl ColaEtiquetas {
    pub fn new() -> Self {
        Self::default()
    }

    // Alta directa. Cantidades no positivas se descartan sin ruido.
    // Misma identidad => se incrementa la entrada existente en su posición;
    // identidad nueva => se agrega al final.
    pub fn agregar(
        &mut self,
        producto: Producto,
        variante: Option<ProductoVariante>,
        cantidad: i64,
    ) -> bool {
        if cantidad <= 0 {
            return false;
        }
        let cantidad = cantidad as u32;

        let clave = ClaveEtiqueta::de(&producto, variante.as_ref());
        if let Some(entrada) = self.entradas.iter_mut().find(|e| e.clave == clave) {
            entrada.cantidad += cantidad;
            return true;
        }

        self.entradas.push(EntradaCola {
            clave,
            producto,
            variante,
            cantidad,
        });
        true
    }

    // Alta desde el catálogo: un producto con variantes exige la hoja de
    // cantidades del modal (al menos una positiva); sin variantes se
    // agrega una etiqueta simple.
    pub fn agregar_producto(
        &mut self,
        producto: &Producto,
        cantidades: Option<&[CantidadVariante]>,
    ) -> Result<u32, AppError> {
        let variantes = producto.variantes.clone().unwrap_or_default();

        if variantes.is_empty() {
            self.agregar(producto.clone(), None, 1);
            return Ok(1);
        }

        let cantidades = cantidades.ok_or_else(|| {
            AppError::ReglaFormulario(vec![
                "El producto tiene variantes: indica cuántas etiquetas por talla.".to_string(),
            ])
        })?;

        let mut agregadas = 0u32;
        for pedido in cantidades {
            if pedido.cantidad <= 0 {
                continue;
            }
            let variante = variantes
                .iter()
                .find(|v| {
                    v.talla.id_talla == pedido.id_talla && v.color.id_color == pedido.id_color
                })
                .ok_or_else(|| {
                    AppError::ReglaFormulario(vec![
                        "El producto no tiene esa combinación de talla y color.".to_string(),
                    ])
                })?;

            self.agregar(producto.clone(), Some(variante.clone()), pedido.cantidad);
            agregadas += pedido.cantidad as u32;
        }

        if agregadas == 0 {
            return Err(AppError::ReglaFormulario(vec![
                "Ingresa al menos una cantidad.".to_string(),
            ]));
        }
        Ok(agregadas)
    }

    // Sobrescribe la cantidad de una fila. Texto no numérico o menor que 1
    // deja todo como estaba.
    pub fn actualizar_cantidad(&mut self, indice: usize, valor: &str) -> bool {
        let Ok(cantidad) = valor.trim().parse::<u32>() else {
            return false;
        };
        if cantidad < 1 {
            return false;
        }
        let Some(entrada) = self.entradas.get_mut(indice) else {
            return false;
        };
        entrada.cantidad = cantidad;
        true
    }

    pub fn quitar(&mut self, indice: usize) -> bool {
        if indice >= self.entradas.len() {
            return false;
        }
        self.entradas.remove(indice);
        true
    }

    pub fn limpiar(&mut self) {
        self.entradas.clear();
    }

    pub fn esta_vacia(&self) -> bool {
        self.entradas.is_empty()
    }

    pub fn entradas(&self) -> &[EntradaCola] {
        &self.entradas
    }

    // Etiquetas físicas a imprimir: suma de cantidades, no filas.
    pub fn total_etiquetas(&self) -> u32 {
        self.entradas.iter().map(|e| e.cantidad).sum()
    }

    pub fn vista(&self) -> VistaCola {
        VistaCola {
            entradas: self
                .entradas
                .iter()
                .map(|e| EntradaColaVista {
                    nombre: e.producto.nombre.clone(),
                    codigo_identificacion: e.producto.codigo_identificacion.clone(),
                    talla: e.variante.as_ref().map(|v| v.talla.nombre_talla.clone()),
                    color: e.variante.as_ref().map(|v| v.color.nombre.clone()),
                    cantidad: e.cantidad,
                })
                .collect(),
            total_etiquetas: self.total_etiquetas(),
        }
    }
}

// ---
// Render de etiquetas
// ---

// Datos ya resueltos del fragmento; los consumen el HTML y el PDF.
pub fn datos_etiqueta(entrada: &EntradaCola) -> DatosEtiqueta {
    let codigo = entrada.producto.codigo_para_etiqueta();
    DatosEtiqueta {
        nombre: entrada.producto.nombre.clone(),
        talla: entrada
            .variante
            .as_ref()
            .map(|v| v.talla.nombre_talla.clone()),
        color: entrada.variante.as_ref().map(|v| v.color.nombre.clone()),
        codigo: if codigo.is_empty() {
            "0000".to_string()
        } else {
            codigo.to_string()
        },
        precio_unitario: entrada.producto.precio_unitario,
        id_producto: entrada.producto.id_producto,
        id_variante: entrada.variante.as_ref().and_then(|v| v.id_producto_variante),
    }
}

// Estilos base compartidos por los tres formatos: solo cambia el contenedor.
const CSS_BASE: &str = "* { box-sizing: border-box; }\
body { font-family: Arial, sans-serif; }\
.label-content { width: 100%; text-align: center; }\
.name { font-size: 10px; font-weight: bold; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; max-width: 100%; }\
.size-badge { font-size: 14px; font-weight: 900; border: 1px solid #000; border-radius: 4px; padding: 1px 6px; display: inline-block; margin: 2px 0; }\
.meta-row { display: flex; justify-content: center; gap: 5px; align-items: baseline; }\
.price { font-size: 14px; font-weight: bold; }\
.color { font-size: 9px; text-transform: uppercase; }\
.code { font-size: 8px; font-family: monospace; letter-spacing: 1px; }\
.barcode { width: 90%; height: 35px; margin: 0 auto; display: block; }";

// Rollo térmico: una etiqueta por corte de página, tamaño fijo pequeño.
const CSS_ROLLO: &str = "body { margin: 0; padding: 0; }\
.grid { display: flex; flex-direction: column; align-items: center; }\
.label { width: 50mm; height: 25mm; page-break-after: always; display: flex; flex-direction: column; align-items: center; justify-content: center; overflow: hidden; }";

// Fila de 3: rejilla fija de 3 columnas con borde punteado.
const CSS_FILA_TRES: &str = "body { margin: 0; padding: 5mm; }\
.grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 3mm; }\
.label { border: 1px dashed #ccc; height: 30mm; padding: 2px; display: flex; flex-direction: column; align-items: center; justify-content: center; page-break-inside: avoid; }";

// Hoja A4: rejilla automática con ancho mínimo de etiqueta.
const CSS_HOJA_A4: &str = "body { margin: 10mm; }\
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(50mm, 1fr)); gap: 5mm; }\
.label { border: 1px dashed #ccc; height: 30mm; display: flex; flex-direction: column; align-items: center; justify-content: center; page-break-inside: avoid; }";

fn css_de(formato: FormatoImpresion) -> &'static str {
    match formato {
        FormatoImpresion::RolloTermico => CSS_ROLLO,
        FormatoImpresion::FilaTres => CSS_FILA_TRES,
        FormatoImpresion::HojaA4 => CSS_HOJA_A4,
    }
}

fn escapar_html(texto: &str) -> String {
    texto
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// Un fragmento de etiqueta. La simbología la resuelve el renderizador
// externo: dejamos el marcador con el código y la URL de la imagen que
// sirve el backend (sin id persistido queda el área en blanco).
fn fragmento_etiqueta(datos: &DatosEtiqueta) -> String {
    let insignia_talla = match &datos.talla {
        Some(talla) => format!(
            "<div class=\"size-badge\">{}</div>",
            escapar_html(talla)
        ),
        None => String::new(),
    };
    let span_color = match &datos.color {
        Some(color) => format!("<span class=\"color\">{}</span>", escapar_html(color)),
        None => String::new(),
    };

    let src = match (datos.id_variante, datos.id_producto) {
        (Some(id), _) => format!(
            " src=\"/api/inventario/variantes/{}/codigo-barras\"",
            id
        ),
        (None, Some(id)) => format!(
            " src=\"/api/inventario/productos/{}/codigo-barras\"",
            id
        ),
        (None, None) => String::new(),
    };

    format!(
        concat!(
            "<div class=\"label\">",
            "<div class=\"name\">{nombre}</div>",
            "{talla}",
            "<img class=\"barcode\" data-codigo=\"{codigo}\"{src} alt=\"\">",
            "<div class=\"code\">{codigo}</div>",
            "<div class=\"meta-row\">{color}<span class=\"price\">S/. {precio:.2}</span></div>",
            "</div>"
        ),
        nombre = escapar_html(&datos.nombre),
        talla = insignia_talla,
        codigo = escapar_html(&datos.codigo),
        src = src,
        color = span_color,
        precio = datos.precio_unitario,
    )
}

// Documento completo: cada entrada emite `cantidad` copias de su fragmento.
pub fn render_html(entradas: &[EntradaCola], formato: FormatoImpresion) -> String {
    let mut etiquetas = String::new();
    for entrada in entradas {
        let fragmento = fragmento_etiqueta(&datos_etiqueta(entrada));
        for _ in 0..entrada.cantidad {
            etiquetas.push_str(&fragmento);
        }
    }

    format!(
        concat!(
            "<!DOCTYPE html><html><head><title>Impresión de Etiquetas</title>",
            "<style>{base}{formato}@media print {{ @page {{ margin: 0; }} }}</style>",
            "</head><body><div class=\"grid\">{etiquetas}</div></body></html>"
        ),
        base = CSS_BASE,
        formato = css_de(formato),
        etiquetas = etiquetas,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::models::maestros::{Color, Talla};
    use crate::models::producto::{Sexo, TipoPublico};

    fn variante(id_talla: i64, talla: &str, id_color: i64, color: &str) -> ProductoVariante {
        ProductoVariante {
            id_producto_variante: Some(id_talla * 100 + id_color),
            talla: Talla {
                id_talla,
                nombre_talla: talla.to_string(),
            },
            color: Color {
                id_color,
                nombre: color.to_string(),
                codigo_hex: None,
            },
            cantidad: 10,
            codigo_barras_variante: None,
        }
    }

    fn producto(id: i64, nombre: &str, variantes: Vec<ProductoVariante>) -> Producto {
        Producto {
            id_producto: Some(id),
            codigo_identificacion: format!("SKU-{:03}", id),
            codigo_barras: None,
            nombre: nombre.to_string(),
            marca: String::new(),
            sexo: Sexo::Unisex,
            tipo_publico: TipoPublico::Adulto,
            precio_unitario: Decimal::new(2550, 2), // 25.50
            precio_cuarto: Decimal::ZERO,
            precio_media_docena: Decimal::ZERO,
            precio_docena: Decimal::ZERO,
            categoria: None,
            categoria_padre: None,
            proveedor: None,
            cantidad: Some(10),
            variantes: if variantes.is_empty() {
                None
            } else {
                Some(variantes)
            },
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn misma_identidad_se_fusiona_en_una_entrada() {
        let mut cola = ColaEtiquetas::new();
        let v = variante(1, "38", 10, "Negro");
        let p = producto(1, "Pantalón", vec![v.clone()]);

        assert!(cola.agregar(p.clone(), Some(v.clone()), 2));
        assert!(cola.agregar(p, Some(v), 3));

        assert_eq!(cola.entradas().len(), 1);
        assert_eq!(cola.entradas()[0].cantidad, 5);
    }

    #[test]
    fn variantes_distintas_son_entradas_distintas() {
        let mut cola = ColaEtiquetas::new();
        let a = variante(1, "38", 10, "Negro");
        let b = variante(1, "38", 11, "Azul");
        let p = producto(1, "Pantalón", vec![a.clone(), b.clone()]);

        cola.agregar(p.clone(), Some(a), 1);
        cola.agregar(p, Some(b), 1);

        assert_eq!(cola.entradas().len(), 2);
    }

    #[test]
    fn simple_y_variante_del_mismo_producto_no_colisionan() {
        let mut cola = ColaEtiquetas::new();
        let v = variante(1, "38", 10, "Negro");
        let p = producto(1, "Pantalón", vec![v.clone()]);

        cola.agregar(p.clone(), None, 1);
        cola.agregar(p, Some(v), 1);

        assert_eq!(cola.entradas().len(), 2);
    }

    #[test]
    fn cantidades_no_positivas_se_descartan() {
        let mut cola = ColaEtiquetas::new();
        let p = producto(1, "Polo", Vec::new());

        assert!(!cola.agregar(p.clone(), None, 0));
        assert!(!cola.agregar(p, None, -4));
        assert!(cola.esta_vacia());
    }

    #[test]
    fn la_fusion_conserva_la_posicion_de_la_primera_entrada() {
        let mut cola = ColaEtiquetas::new();
        let a = producto(1, "Pantalón", Vec::new());
        let b = producto(2, "Polo", Vec::new());

        cola.agregar(a.clone(), None, 1);
        cola.agregar(b, None, 1);
        cola.agregar(a, None, 4);

        assert_eq!(cola.entradas().len(), 2);
        assert_eq!(cola.entradas()[0].producto.nombre, "Pantalón");
        assert_eq!(cola.entradas()[0].cantidad, 5);
    }

    #[test]
    fn actualizar_cantidad_rechaza_valores_invalidos() {
        let mut cola = ColaEtiquetas::new();
        cola.agregar(producto(1, "Polo", Vec::new()), None, 3);

        assert!(!cola.actualizar_cantidad(0, "-1"));
        assert!(!cola.actualizar_cantidad(0, "abc"));
        assert!(!cola.actualizar_cantidad(0, "0"));
        assert_eq!(cola.entradas()[0].cantidad, 3);

        assert!(cola.actualizar_cantidad(0, "7"));
        assert_eq!(cola.entradas()[0].cantidad, 7);

        // Índice fuera de rango: no-op
        assert!(!cola.actualizar_cantidad(9, "2"));
    }

    #[test]
    fn total_de_etiquetas_suma_cantidades_no_filas() {
        let mut cola = ColaEtiquetas::new();
        cola.agregar(producto(1, "A", Vec::new()), None, 2);
        cola.agregar(producto(2, "B", Vec::new()), None, 5);
        cola.agregar(producto(3, "C", Vec::new()), None, 1);

        assert_eq!(cola.entradas().len(), 3);
        assert_eq!(cola.total_etiquetas(), 8);
        assert_eq!(cola.vista().total_etiquetas, 8);
    }

    #[test]
    fn quitar_la_ultima_entrada_vacia_la_cola() {
        let mut cola = ColaEtiquetas::new();
        cola.agregar(producto(1, "A", Vec::new()), None, 2);
        assert!(!cola.esta_vacia());
        assert!(cola.quitar(0));
        assert!(cola.esta_vacia());
        assert!(!cola.quitar(0));
    }

    #[test]
    fn producto_sin_variantes_entra_directo_con_una_etiqueta() {
        let mut cola = ColaEtiquetas::new();
        let p = producto(1, "Polo", Vec::new());

        let agregadas = cola.agregar_producto(&p, None).unwrap();
        assert_eq!(agregadas, 1);
        assert_eq!(cola.entradas().len(), 1);
    }

    #[test]
    fn producto_con_variantes_exige_alguna_cantidad_positiva() {
        let mut cola = ColaEtiquetas::new();
        let p = producto(
            1,
            "Pantalón",
            vec![variante(1, "38", 10, "Negro"), variante(2, "40", 10, "Negro")],
        );

        // Hoja del modal toda en cero: nada se compromete
        let pedido = vec![
            CantidadVariante { id_talla: 1, id_color: 10, cantidad: 0 },
            CantidadVariante { id_talla: 2, id_color: 10, cantidad: 0 },
        ];
        let resultado = cola.agregar_producto(&p, Some(&pedido));
        assert!(matches!(resultado, Err(AppError::ReglaFormulario(_))));
        assert!(cola.esta_vacia());

        // Una positiva alcanza; las demás quedan fuera
        let pedido = vec![
            CantidadVariante { id_talla: 1, id_color: 10, cantidad: 4 },
            CantidadVariante { id_talla: 2, id_color: 10, cantidad: 0 },
        ];
        let agregadas = cola.agregar_producto(&p, Some(&pedido)).unwrap();
        assert_eq!(agregadas, 4);
        assert_eq!(cola.entradas().len(), 1);
    }

    #[test]
    fn render_emite_una_copia_por_etiqueta() {
        let mut cola = ColaEtiquetas::new();
        let v = variante(1, "38", 10, "Negro");
        cola.agregar(producto(1, "Pantalón", vec![v.clone()]), Some(v), 3);
        cola.agregar(producto(2, "Polo", Vec::new()), None, 2);

        let html = render_html(cola.entradas(), FormatoImpresion::RolloTermico);
        assert_eq!(html.matches("<div class=\"label\">").count(), 5);
        assert_eq!(html.matches("class=\"size-badge\"").count(), 3);
        assert!(html.contains("S/. 25.50"));
        assert!(html.contains("SKU-001"));
    }

    #[test]
    fn cada_formato_usa_su_contenedor() {
        let mut cola = ColaEtiquetas::new();
        cola.agregar(producto(1, "Polo", Vec::new()), None, 1);

        let rollo = render_html(cola.entradas(), FormatoImpresion::RolloTermico);
        assert!(rollo.contains("page-break-after: always"));

        let filas = render_html(cola.entradas(), FormatoImpresion::FilaTres);
        assert!(filas.contains("repeat(3, 1fr)"));
        assert!(filas.contains("page-break-inside: avoid"));

        let hoja = render_html(cola.entradas(), FormatoImpresion::HojaA4);
        assert!(hoja.contains("auto-fill"));
        assert!(hoja.contains("minmax(50mm, 1fr)"));
    }

    #[test]
    fn el_codigo_de_barras_prefiere_el_codigo_sobre_el_sku() {
        let mut con_codigo = producto(1, "Polo", Vec::new());
        con_codigo.codigo_barras = Some("7751234567890".to_string());

        let mut cola = ColaEtiquetas::new();
        cola.agregar(con_codigo, None, 1);
        cola.agregar(producto(2, "Pantalón", Vec::new()), None, 1);

        let html = render_html(cola.entradas(), FormatoImpresion::HojaA4);
        assert!(html.contains("data-codigo=\"7751234567890\""));
        assert!(html.contains("data-codigo=\"SKU-002\""));
    }

    #[test]
    fn los_nombres_se_escapan_en_el_html() {
        let mut cola = ColaEtiquetas::new();
        cola.agregar(producto(1, "Polo <niño> & más", Vec::new()), None, 1);

        let html = render_html(cola.entradas(), FormatoImpresion::RolloTermico);
        assert!(html.contains("Polo &lt;niño&gt; &amp; más"));
        assert!(!html.contains("<niño>"));
    }
}
