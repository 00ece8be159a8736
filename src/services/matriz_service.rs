// src/services/matriz_service.rs
//
// Motor de la matriz talla x color: a partir de una multiselección genera
// las filas de variantes sin duplicar pares ya presentes. Todo es cómputo
// puro en memoria; los casos límite se expresan en el tipo de retorno.

use std::cmp::Ordering;

use crate::models::maestros::{Color, Talla};
use crate::models::producto::ProductoVariante;

#[derive(Debug, PartialEq)]
pub enum ResultadoMatriz {
    // Alguno de los dos ejes llegó vacío: no se toca nada y el llamador
    // muestra la advertencia ("Selecciona al menos una talla y un color").
    SeleccionVacia,
    // `nuevas == 0` es un resultado válido y distinto: toda la selección
    // ya existía como variante.
    Generadas {
        variantes: Vec<ProductoVariante>,
        nuevas: usize,
    },
}

// Cruza tallas x colores (talla externa, color interno, en el orden de la
// selección) y agrega las combinaciones que aún no existan, con cantidad 0.
pub fn generar_matriz(
    tallas_seleccionadas: &[i64],
    colores_seleccionados: &[i64],
    existentes: &[ProductoVariante],
    tallas: &[Talla],
    colores: &[Color],
) -> ResultadoMatriz {
    if tallas_seleccionadas.is_empty() || colores_seleccionados.is_empty() {
        return ResultadoMatriz::SeleccionVacia;
    }

    let mut variantes = existentes.to_vec();
    let mut nuevas = 0;

    for id_talla in tallas_seleccionadas {
        let Some(talla) = tallas.iter().find(|t| t.id_talla == *id_talla) else {
            continue;
        };
        for id_color in colores_seleccionados {
            let Some(color) = colores.iter().find(|c| c.id_color == *id_color) else {
                continue;
            };

            // El chequeo corre contra la lista que va creciendo: también
            // cubre ids repetidos dentro de la propia selección.
            let existe = variantes
                .iter()
                .any(|v| v.talla.id_talla == *id_talla && v.color.id_color == *id_color);
            if existe {
                continue;
            }

            variantes.push(ProductoVariante {
                id_producto_variante: None,
                talla: talla.clone(),
                color: color.clone(),
                cantidad: 0,
                codigo_barras_variante: None,
            });
            nuevas += 1;
        }
    }

    ResultadoMatriz::Generadas { variantes, nuevas }
}

// Quita la fila en `indice`. La unicidad solo puede romperse al agregar,
// así que aquí no hay nada que revalidar.
pub fn quitar_variante(variantes: &mut Vec<ProductoVariante>, indice: usize) -> bool {
    if indice >= variantes.len() {
        return false;
    }
    variantes.remove(indice);
    true
}

// Stock total del producto cuando maneja variantes: la suma manda sobre
// cualquier stock simple tipeado a mano.
pub fn cantidad_total(variantes: &[ProductoVariante]) -> u32 {
    variantes.iter().map(|v| v.cantidad).sum()
}

// ---
// Presentación del catálogo de tallas
// ---

// Orden natural del selector: primero las tallas numéricas de menor a
// mayor ("38", "40", "42"), después las de letra en orden alfabético
// sin distinguir mayúsculas ("m", "XL").
pub fn comparar_tallas(a: &str, b: &str) -> Ordering {
    let num_a = a.trim().parse::<f64>().ok().filter(|n| n.is_finite());
    let num_b = b.trim().parse::<f64>().ok().filter(|n| n.is_finite());

    match (num_a, num_b) {
        (Some(na), Some(nb)) => na.partial_cmp(&nb).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

pub fn filtrar_tallas(tallas: &[Talla], filtro: &str) -> Vec<Talla> {
    let filtro = filtro.to_lowercase();
    let mut lista: Vec<Talla> = tallas
        .iter()
        .filter(|t| t.nombre_talla.to_lowercase().contains(&filtro))
        .cloned()
        .collect();
    lista.sort_by(|a, b| comparar_tallas(&a.nombre_talla, &b.nombre_talla));
    lista
}

pub fn filtrar_colores(colores: &[Color], filtro: &str) -> Vec<Color> {
    let filtro = filtro.to_lowercase();
    colores
        .iter()
        .filter(|c| c.nombre.to_lowercase().contains(&filtro))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn talla(id: i64, nombre: &str) -> Talla {
        Talla {
            id_talla: id,
            nombre_talla: nombre.to_string(),
        }
    }

    fn color(id: i64, nombre: &str) -> Color {
        Color {
            id_color: id,
            nombre: nombre.to_string(),
            codigo_hex: None,
        }
    }

    fn catalogo() -> (Vec<Talla>, Vec<Color>) {
        (
            vec![talla(1, "38"), talla(2, "40"), talla(3, "M")],
            vec![color(10, "Negro"), color(11, "Azul")],
        )
    }

    #[test]
    fn cruza_tallas_por_colores_con_cantidad_cero() {
        let (tallas, colores) = catalogo();
        let resultado = generar_matriz(&[1, 2], &[10, 11], &[], &tallas, &colores);

        let ResultadoMatriz::Generadas { variantes, nuevas } = resultado else {
            panic!("la selección no estaba vacía");
        };
        assert_eq!(nuevas, 4);
        assert_eq!(variantes.len(), 4);
        assert_eq!(cantidad_total(&variantes), 0);
        // Orden: talla externa, color interno
        assert_eq!(variantes[0].talla.id_talla, 1);
        assert_eq!(variantes[0].color.id_color, 10);
        assert_eq!(variantes[1].talla.id_talla, 1);
        assert_eq!(variantes[1].color.id_color, 11);
        assert_eq!(variantes[2].talla.id_talla, 2);
    }

    #[test]
    fn nunca_duplica_pares_existentes() {
        let (tallas, colores) = catalogo();
        let previa = ProductoVariante {
            id_producto_variante: Some(99),
            talla: talla(1, "38"),
            color: color(10, "Negro"),
            cantidad: 7,
            codigo_barras_variante: None,
        };

        let resultado = generar_matriz(&[1, 2], &[10], &[previa], &tallas, &colores);
        let ResultadoMatriz::Generadas { variantes, nuevas } = resultado else {
            panic!();
        };

        assert_eq!(nuevas, 1);
        assert_eq!(variantes.len(), 2);
        // La fila previa conserva su posición y su cantidad
        assert_eq!(variantes[0].cantidad, 7);

        // Ningún par (talla, color) repetido
        for (i, a) in variantes.iter().enumerate() {
            for b in &variantes[i + 1..] {
                assert!(
                    a.talla.id_talla != b.talla.id_talla || a.color.id_color != b.color.id_color
                );
            }
        }
    }

    #[test]
    fn seleccion_repetida_no_genera_duplicados() {
        let (tallas, colores) = catalogo();
        let resultado = generar_matriz(&[1, 1], &[10, 10], &[], &tallas, &colores);
        let ResultadoMatriz::Generadas { variantes, nuevas } = resultado else {
            panic!();
        };
        assert_eq!(nuevas, 1);
        assert_eq!(variantes.len(), 1);
    }

    #[test]
    fn solape_total_genera_cero_filas_pero_no_falla() {
        let (tallas, colores) = catalogo();
        let previa = ProductoVariante {
            id_producto_variante: None,
            talla: talla(1, "38"),
            color: color(10, "Negro"),
            cantidad: 3,
            codigo_barras_variante: None,
        };

        let resultado = generar_matriz(&[1], &[10], &[previa], &tallas, &colores);
        let ResultadoMatriz::Generadas { variantes, nuevas } = resultado else {
            panic!();
        };
        assert_eq!(nuevas, 0);
        assert_eq!(variantes.len(), 1);
    }

    #[test]
    fn seleccion_vacia_en_cualquier_eje() {
        let (tallas, colores) = catalogo();
        assert_eq!(
            generar_matriz(&[], &[10], &[], &tallas, &colores),
            ResultadoMatriz::SeleccionVacia
        );
        assert_eq!(
            generar_matriz(&[1], &[], &[], &tallas, &colores),
            ResultadoMatriz::SeleccionVacia
        );
    }

    #[test]
    fn ids_desconocidos_se_ignoran() {
        let (tallas, colores) = catalogo();
        let resultado = generar_matriz(&[1, 777], &[10], &[], &tallas, &colores);
        let ResultadoMatriz::Generadas { nuevas, .. } = resultado else {
            panic!();
        };
        assert_eq!(nuevas, 1);
    }

    #[test]
    fn quitar_variante_respeta_el_indice() {
        let (tallas, colores) = catalogo();
        let ResultadoMatriz::Generadas { mut variantes, .. } =
            generar_matriz(&[1, 2], &[10], &[], &tallas, &colores)
        else {
            panic!();
        };

        assert!(quitar_variante(&mut variantes, 0));
        assert_eq!(variantes.len(), 1);
        assert_eq!(variantes[0].talla.id_talla, 2);
        assert!(!quitar_variante(&mut variantes, 5));
    }

    #[test]
    fn cantidad_total_suma_las_filas() {
        let mut variantes = vec![
            ProductoVariante {
                id_producto_variante: None,
                talla: talla(1, "38"),
                color: color(10, "Negro"),
                cantidad: 5,
                codigo_barras_variante: None,
            },
            ProductoVariante {
                id_producto_variante: None,
                talla: talla(2, "40"),
                color: color(10, "Negro"),
                cantidad: 6,
                codigo_barras_variante: None,
            },
        ];
        assert_eq!(cantidad_total(&variantes), 11);
        variantes[0].cantidad = 0;
        assert_eq!(cantidad_total(&variantes), 6);
    }

    #[test]
    fn tallas_numericas_primero_y_ascendentes() {
        let tallas = vec![
            talla(1, "40"),
            talla(2, "M"),
            talla(3, "38"),
            talla(4, "XL"),
            talla(5, "42"),
        ];
        let ordenadas = filtrar_tallas(&tallas, "");
        let nombres: Vec<&str> = ordenadas.iter().map(|t| t.nombre_talla.as_str()).collect();
        assert_eq!(nombres, vec!["38", "40", "42", "M", "XL"]);
    }

    #[test]
    fn filtro_de_tallas_sin_distinguir_mayusculas() {
        let tallas = vec![talla(1, "XL"), talla(2, "xxl"), talla(3, "38")];
        let filtradas = filtrar_tallas(&tallas, "xl");
        let nombres: Vec<&str> = filtradas.iter().map(|t| t.nombre_talla.as_str()).collect();
        assert_eq!(nombres, vec!["XL", "xxl"]);
    }

    #[test]
    fn filtro_de_colores_por_nombre() {
        let colores = vec![color(1, "Azul Noche"), color(2, "Rojo"), color(3, "azul")];
        let filtrados = filtrar_colores(&colores, "azul");
        assert_eq!(filtrados.len(), 2);
    }
}
