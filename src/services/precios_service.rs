// src/services/precios_service.rs
//
// Validador de la escala de precios. Cada tramo guarda el TOTAL a pagar
// (1, 3, 6 y 12 unidades); la regla es que el precio por unidad baje, o al
// menos no suba, a medida que crece el paquete. Un tramo en 0 todavía no
// fue definido: no dispara error ni sirve de base de comparación.

use rust_decimal::Decimal;

use crate::models::producto::ProductoFormulario;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EscalaPrecios {
    pub unitario: Decimal,
    pub cuarto: Decimal,
    pub media_docena: Decimal,
    pub docena: Decimal,
}

impl EscalaPrecios {
    pub fn del_formulario(form: &ProductoFormulario) -> Self {
        Self {
            unitario: form.precio_unitario,
            cuarto: form.precio_cuarto,
            media_docena: form.precio_media_docena,
            docena: form.precio_docena,
        }
    }
}

// Cada regla se evalúa por separado: un campo puede estar en error con
// independencia de los demás.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErroresEscala {
    pub cuarto: bool,
    pub media_docena: bool,
    pub docena: bool,
    // Un mensaje por regla violada, en orden cuarto -> media docena -> docena.
    pub mensajes: Vec<String>,
}

impl ErroresEscala {
    pub fn es_valida(&self) -> bool {
        self.mensajes.is_empty()
    }
}

pub fn validar_escala(escala: &EscalaPrecios) -> ErroresEscala {
    let tres = Decimal::from(3);
    let seis = Decimal::from(6);
    let doce = Decimal::from(12);
    let cero = Decimal::ZERO;

    let unidad_cuarto = escala.cuarto / tres;
    let unidad_media = escala.media_docena / seis;
    let unidad_docena = escala.docena / doce;

    let mut errores = ErroresEscala::default();

    if escala.cuarto > cero && unidad_cuarto > escala.unitario {
        errores.cuarto = true;
        errores.mensajes.push(
            "El precio por unidad del paquete x3 supera al precio unitario.".to_string(),
        );
    }

    // Sin paquete x3 definido no hay base contra la cual comparar el x6.
    if escala.media_docena > cero && escala.cuarto > cero && unidad_media > unidad_cuarto {
        errores.media_docena = true;
        errores.mensajes.push(
            "El precio por unidad del paquete x6 supera al del paquete x3.".to_string(),
        );
    }

    if escala.docena > cero && escala.media_docena > cero && unidad_docena > unidad_media {
        errores.docena = true;
        errores.mensajes.push(
            "El precio por unidad de la docena supera al del paquete x6.".to_string(),
        );
    }

    errores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escala(unitario: i64, cuarto: i64, media: i64, docena: i64) -> EscalaPrecios {
        EscalaPrecios {
            unitario: Decimal::from(unitario),
            cuarto: Decimal::from(cuarto),
            media_docena: Decimal::from(media),
            docena: Decimal::from(docena),
        }
    }

    #[test]
    fn paquete_x3_mas_caro_por_unidad_marca_error() {
        // 33 / 3 = 11 > 10
        let errores = validar_escala(&escala(10, 33, 0, 0));
        assert!(errores.cuarto);
        assert!(!errores.media_docena);
        assert!(!errores.docena);
        assert_eq!(errores.mensajes.len(), 1);
    }

    #[test]
    fn paquete_x3_con_descuento_es_valido() {
        // 27 / 3 = 9 <= 10
        let errores = validar_escala(&escala(10, 27, 0, 0));
        assert!(!errores.cuarto);
        assert!(errores.es_valida());
    }

    #[test]
    fn tramo_en_cero_no_sirve_de_base() {
        // Sin x3, el x6 no tiene contra qué compararse aunque su precio por
        // unidad (50/6 = 8.33) sea menor que el unitario.
        let errores = validar_escala(&escala(10, 0, 50, 0));
        assert!(!errores.media_docena);
        assert!(errores.es_valida());
    }

    #[test]
    fn docena_solo_se_compara_contra_media_docena_definida() {
        // x12 caro, pero sin x6 no hay regla que evaluar.
        let errores = validar_escala(&escala(10, 27, 0, 200));
        assert!(!errores.docena);
        assert!(errores.es_valida());
    }

    #[test]
    fn errores_independientes_y_en_orden() {
        // x3: 36/3 = 12 > 10 (error)
        // x6: 78/6 = 13 > 12 (error)
        // x12: 120/12 = 10 <= 13 (bien)
        let errores = validar_escala(&escala(10, 36, 78, 120));
        assert!(errores.cuarto);
        assert!(errores.media_docena);
        assert!(!errores.docena);
        assert_eq!(errores.mensajes.len(), 2);
        assert!(errores.mensajes[0].contains("x3"));
        assert!(errores.mensajes[1].contains("x6"));
    }

    #[test]
    fn escala_completa_decreciente_es_valida() {
        // 10, 9, 8.5 y 8 por unidad
        let escala = EscalaPrecios {
            unitario: Decimal::from(10),
            cuarto: Decimal::from(27),
            media_docena: Decimal::from(51),
            docena: Decimal::from(96),
        };
        assert!(validar_escala(&escala).es_valida());
    }

    #[test]
    fn todo_en_cero_no_reclama_nada() {
        assert!(validar_escala(&escala(0, 0, 0, 0)).es_valida());
    }
}
