// src/services/maestros_service.rs
//
// Registro de datos maestros: tallas, colores, proveedores y categorías.
// Las lecturas pasan por una caché en memoria con marcas de invalidación
// explícitas por tipo de entidad: toda mutación ensucia su tipo y la
// siguiente lectura vuelve al backend. Una lectura obsoleta después de una
// mutación es un bug, no una carrera tolerada.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    backend::MaestrosApi,
    common::error::AppError,
    models::maestros::{Categoria, CategoriaArbol, Color, NodoArbolVisible, Proveedor, Talla},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TipoMaestro {
    Tallas,
    Colores,
    Proveedores,
    CategoriasPrincipales,
    Subcategorias,
    ArbolCategorias,
}

#[derive(Default)]
struct CacheMaestros {
    tallas: Option<Vec<Talla>>,
    colores: Option<Vec<Color>>,
    proveedores: Option<Vec<Proveedor>>,
    categorias_principales: Option<Vec<Categoria>>,
    subcategorias: HashMap<i64, Vec<Categoria>>,
    arbol: Option<Vec<CategoriaArbol>>,
    sucios: HashSet<TipoMaestro>,
}

#[derive(Clone)]
pub struct MaestrosService {
    api: Arc<dyn MaestrosApi>,
    cache: Arc<RwLock<CacheMaestros>>,
}

impl MaestrosService {
    pub fn new(api: Arc<dyn MaestrosApi>) -> Self {
        Self {
            api,
            cache: Arc::new(RwLock::new(CacheMaestros::default())),
        }
    }

    async fn invalidar(&self, tipos: &[TipoMaestro]) {
        let mut cache = self.cache.write().await;
        for tipo in tipos {
            cache.sucios.insert(*tipo);
            if *tipo == TipoMaestro::Subcategorias {
                // Caché por padre: al ensuciarse se descarta entera.
                cache.subcategorias.clear();
            }
        }
    }

    // --- TALLAS ---

    pub async fn tallas(&self) -> Result<Vec<Talla>, AppError> {
        {
            let cache = self.cache.read().await;
            if !cache.sucios.contains(&TipoMaestro::Tallas) {
                if let Some(lista) = &cache.tallas {
                    return Ok(lista.clone());
                }
            }
        }

        let lista = self.api.listar_tallas().await?;
        let mut cache = self.cache.write().await;
        cache.tallas = Some(lista.clone());
        cache.sucios.remove(&TipoMaestro::Tallas);
        Ok(lista)
    }

    pub async fn crear_talla(&self, nombre: &str) -> Result<Talla, AppError> {
        let talla = self.api.crear_talla(nombre).await?;
        self.invalidar(&[TipoMaestro::Tallas]).await;
        Ok(talla)
    }

    pub async fn eliminar_talla(&self, id: i64) -> Result<(), AppError> {
        self.api.eliminar_talla(id).await?;
        self.invalidar(&[TipoMaestro::Tallas]).await;
        Ok(())
    }

    // --- COLORES ---

    pub async fn colores(&self) -> Result<Vec<Color>, AppError> {
        {
            let cache = self.cache.read().await;
            if !cache.sucios.contains(&TipoMaestro::Colores) {
                if let Some(lista) = &cache.colores {
                    return Ok(lista.clone());
                }
            }
        }

        let lista = self.api.listar_colores().await?;
        let mut cache = self.cache.write().await;
        cache.colores = Some(lista.clone());
        cache.sucios.remove(&TipoMaestro::Colores);
        Ok(lista)
    }

    pub async fn crear_color(
        &self,
        nombre: &str,
        codigo_hex: Option<&str>,
    ) -> Result<Color, AppError> {
        let color = self.api.crear_color(nombre, codigo_hex).await?;
        self.invalidar(&[TipoMaestro::Colores]).await;
        Ok(color)
    }

    pub async fn eliminar_color(&self, id: i64) -> Result<(), AppError> {
        self.api.eliminar_color(id).await?;
        self.invalidar(&[TipoMaestro::Colores]).await;
        Ok(())
    }

    // --- PROVEEDORES ---

    pub async fn proveedores(&self) -> Result<Vec<Proveedor>, AppError> {
        {
            let cache = self.cache.read().await;
            if !cache.sucios.contains(&TipoMaestro::Proveedores) {
                if let Some(lista) = &cache.proveedores {
                    return Ok(lista.clone());
                }
            }
        }

        let lista = self.api.listar_proveedores().await?;
        let mut cache = self.cache.write().await;
        cache.proveedores = Some(lista.clone());
        cache.sucios.remove(&TipoMaestro::Proveedores);
        Ok(lista)
    }

    pub async fn crear_proveedor(&self, nombre: &str, ruc: &str) -> Result<Proveedor, AppError> {
        validar_ruc(ruc)?;
        let proveedor = self.api.crear_proveedor(nombre, ruc).await?;
        self.invalidar(&[TipoMaestro::Proveedores]).await;
        Ok(proveedor)
    }

    pub async fn eliminar_proveedor(&self, id: i64) -> Result<(), AppError> {
        self.api.eliminar_proveedor(id).await?;
        self.invalidar(&[TipoMaestro::Proveedores]).await;
        Ok(())
    }

    // Consulta en SUNAT. El formato se valida antes de salir a la red.
    pub async fn buscar_por_ruc(&self, ruc: &str) -> Result<Proveedor, AppError> {
        validar_ruc(ruc)?;
        self.api.buscar_por_ruc(ruc).await
    }

    // --- CATEGORÍAS ---

    pub async fn categorias_principales(&self) -> Result<Vec<Categoria>, AppError> {
        {
            let cache = self.cache.read().await;
            if !cache.sucios.contains(&TipoMaestro::CategoriasPrincipales) {
                if let Some(lista) = &cache.categorias_principales {
                    return Ok(lista.clone());
                }
            }
        }

        let lista = self.api.listar_categorias_principales().await?;
        let mut cache = self.cache.write().await;
        cache.categorias_principales = Some(lista.clone());
        cache.sucios.remove(&TipoMaestro::CategoriasPrincipales);
        Ok(lista)
    }

    pub async fn subcategorias(&self, id_padre: i64) -> Result<Vec<Categoria>, AppError> {
        {
            let cache = self.cache.read().await;
            if !cache.sucios.contains(&TipoMaestro::Subcategorias) {
                if let Some(lista) = cache.subcategorias.get(&id_padre) {
                    return Ok(lista.clone());
                }
            }
        }

        let lista = self.api.listar_subcategorias(id_padre).await?;
        let mut cache = self.cache.write().await;
        cache.subcategorias.insert(id_padre, lista.clone());
        cache.sucios.remove(&TipoMaestro::Subcategorias);
        Ok(lista)
    }

    pub async fn arbol_categorias(&self) -> Result<Vec<CategoriaArbol>, AppError> {
        {
            let cache = self.cache.read().await;
            if !cache.sucios.contains(&TipoMaestro::ArbolCategorias) {
                if let Some(arbol) = &cache.arbol {
                    return Ok(arbol.clone());
                }
            }
        }

        let arbol = self.api.arbol_categorias().await?;
        let mut cache = self.cache.write().await;
        cache.arbol = Some(arbol.clone());
        cache.sucios.remove(&TipoMaestro::ArbolCategorias);
        Ok(arbol)
    }

    pub async fn crear_categoria(
        &self,
        nombre: &str,
        id_padre: Option<i64>,
    ) -> Result<Categoria, AppError> {
        let categoria = self.api.crear_categoria(nombre, id_padre).await?;
        self.invalidar_categorias().await;
        Ok(categoria)
    }

    pub async fn eliminar_categoria(&self, id: i64) -> Result<(), AppError> {
        // El backend rechaza la eliminación si la categoría está en uso;
        // ese rechazo llega como Conflicto con su mensaje.
        self.api.eliminar_categoria(id).await?;
        self.invalidar_categorias().await;
        Ok(())
    }

    // Una mutación de categorías ensucia las tres vistas derivadas.
    async fn invalidar_categorias(&self) {
        self.invalidar(&[
            TipoMaestro::CategoriasPrincipales,
            TipoMaestro::Subcategorias,
            TipoMaestro::ArbolCategorias,
        ])
        .await;
    }
}

fn validar_ruc(ruc: &str) -> Result<(), AppError> {
    if ruc.len() != 11 || !ruc.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::ReglaFormulario(vec![
            "El RUC debe tener exactamente 11 dígitos.".to_string(),
        ]));
    }
    Ok(())
}

// Aplana el árbol para pintarlo: el estado de expansión viaja como un mapa
// id -> expandido, nunca dentro de los nodos. Los hijos solo aparecen si su
// padre está expandido. El conjunto `visitados` corta cualquier ciclo que
// llegara en un payload malformado.
pub fn aplanar_arbol(
    nodos: &[CategoriaArbol],
    expandidos: &HashSet<i64>,
) -> Vec<NodoArbolVisible> {
    let mut salida = Vec::new();
    let mut visitados = HashSet::new();
    for nodo in nodos {
        recorrer(nodo, 0, expandidos, &mut visitados, &mut salida);
    }
    salida
}

fn recorrer(
    nodo: &CategoriaArbol,
    nivel: usize,
    expandidos: &HashSet<i64>,
    visitados: &mut HashSet<i64>,
    salida: &mut Vec<NodoArbolVisible>,
) {
    if !visitados.insert(nodo.id) {
        return;
    }

    let expandido = expandidos.contains(&nodo.id);
    salida.push(NodoArbolVisible {
        id: nodo.id,
        nombre: nodo.nombre.clone(),
        nivel,
        tiene_hijos: !nodo.subcategorias.is_empty(),
        expandido,
    });

    if expandido {
        for hijo in &nodo.subcategorias {
            recorrer(hijo, nivel + 1, expandidos, visitados, salida);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Doble que cuenta cuántas veces se consulta cada lista.
    #[derive(Default)]
    struct ApiContadora {
        lecturas_tallas: AtomicUsize,
        lecturas_colores: AtomicUsize,
        lecturas_arbol: AtomicUsize,
    }

    #[async_trait]
    impl MaestrosApi for ApiContadora {
        async fn listar_tallas(&self) -> Result<Vec<Talla>, AppError> {
            self.lecturas_tallas.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Talla {
                id_talla: 1,
                nombre_talla: "38".to_string(),
            }])
        }

        async fn crear_talla(&self, nombre: &str) -> Result<Talla, AppError> {
            Ok(Talla {
                id_talla: 2,
                nombre_talla: nombre.to_string(),
            })
        }

        async fn eliminar_talla(&self, _id: i64) -> Result<(), AppError> {
            Ok(())
        }

        async fn listar_colores(&self) -> Result<Vec<Color>, AppError> {
            self.lecturas_colores.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn crear_color(
            &self,
            nombre: &str,
            codigo_hex: Option<&str>,
        ) -> Result<Color, AppError> {
            Ok(Color {
                id_color: 1,
                nombre: nombre.to_string(),
                codigo_hex: codigo_hex.map(|s| s.to_string()),
            })
        }

        async fn eliminar_color(&self, _id: i64) -> Result<(), AppError> {
            Ok(())
        }

        async fn listar_proveedores(&self) -> Result<Vec<Proveedor>, AppError> {
            Ok(Vec::new())
        }

        async fn crear_proveedor(&self, nombre: &str, ruc: &str) -> Result<Proveedor, AppError> {
            Ok(Proveedor {
                id_proveedor: 1,
                nombre: nombre.to_string(),
                ruc: ruc.to_string(),
            })
        }

        async fn eliminar_proveedor(&self, _id: i64) -> Result<(), AppError> {
            Ok(())
        }

        async fn buscar_por_ruc(&self, _ruc: &str) -> Result<Proveedor, AppError> {
            Err(AppError::NoEncontrado(
                "No se encontró el RUC en SUNAT.".to_string(),
            ))
        }

        async fn listar_categorias_principales(&self) -> Result<Vec<Categoria>, AppError> {
            Ok(Vec::new())
        }

        async fn listar_subcategorias(&self, _id: i64) -> Result<Vec<Categoria>, AppError> {
            Ok(Vec::new())
        }

        async fn arbol_categorias(&self) -> Result<Vec<CategoriaArbol>, AppError> {
            self.lecturas_arbol.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn crear_categoria(
            &self,
            nombre: &str,
            _id_padre: Option<i64>,
        ) -> Result<Categoria, AppError> {
            Ok(Categoria {
                id_categoria: 1,
                nombre: nombre.to_string(),
                categoria_padre: None,
            })
        }

        async fn eliminar_categoria(&self, _id: i64) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn arbol_de_prueba() -> Vec<CategoriaArbol> {
        vec![CategoriaArbol {
            id: 1,
            nombre: "Ropa".to_string(),
            subcategorias: vec![
                CategoriaArbol {
                    id: 2,
                    nombre: "Pantalones".to_string(),
                    subcategorias: vec![CategoriaArbol {
                        id: 3,
                        nombre: "Jeans".to_string(),
                        subcategorias: Vec::new(),
                    }],
                },
                CategoriaArbol {
                    id: 4,
                    nombre: "Polos".to_string(),
                    subcategorias: Vec::new(),
                },
            ],
        }]
    }

    #[tokio::test]
    async fn la_cache_sirve_lecturas_repetidas() {
        let api = Arc::new(ApiContadora::default());
        let servicio = MaestrosService::new(api.clone());

        servicio.tallas().await.unwrap();
        servicio.tallas().await.unwrap();
        servicio.tallas().await.unwrap();

        assert_eq!(api.lecturas_tallas.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn crear_invalida_y_la_proxima_lectura_refresca() {
        let api = Arc::new(ApiContadora::default());
        let servicio = MaestrosService::new(api.clone());

        servicio.tallas().await.unwrap();
        servicio.crear_talla("M").await.unwrap();
        servicio.tallas().await.unwrap();
        servicio.tallas().await.unwrap();

        // Una lectura inicial + una sola relectura tras la mutación
        assert_eq!(api.lecturas_tallas.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn mutar_un_tipo_no_ensucia_los_demas() {
        let api = Arc::new(ApiContadora::default());
        let servicio = MaestrosService::new(api.clone());

        servicio.colores().await.unwrap();
        servicio.crear_talla("L").await.unwrap();
        servicio.colores().await.unwrap();

        assert_eq!(api.lecturas_colores.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn mutar_categorias_ensucia_el_arbol() {
        let api = Arc::new(ApiContadora::default());
        let servicio = MaestrosService::new(api.clone());

        servicio.arbol_categorias().await.unwrap();
        servicio.crear_categoria("Calzado", None).await.unwrap();
        servicio.arbol_categorias().await.unwrap();

        assert_eq!(api.lecturas_arbol.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn ruc_invalido_no_llega_a_la_red() {
        let servicio = MaestrosService::new(Arc::new(ApiContadora::default()));

        let corto = servicio.buscar_por_ruc("123").await;
        assert!(matches!(corto, Err(AppError::ReglaFormulario(_))));

        let con_letras = servicio.buscar_por_ruc("2012345678X").await;
        assert!(matches!(con_letras, Err(AppError::ReglaFormulario(_))));

        // Con formato válido sí consulta, y el "no existe" se distingue
        let miss = servicio.buscar_por_ruc("20123456789").await;
        assert!(matches!(miss, Err(AppError::NoEncontrado(_))));
    }

    #[test]
    fn arbol_colapsado_muestra_solo_raices() {
        let filas = aplanar_arbol(&arbol_de_prueba(), &HashSet::new());
        assert_eq!(filas.len(), 1);
        assert_eq!(filas[0].nombre, "Ropa");
        assert!(filas[0].tiene_hijos);
        assert!(!filas[0].expandido);
    }

    #[test]
    fn expandir_un_nodo_descubre_a_sus_hijos_directos() {
        let expandidos = HashSet::from([1]);
        let filas = aplanar_arbol(&arbol_de_prueba(), &expandidos);

        let nombres: Vec<&str> = filas.iter().map(|f| f.nombre.as_str()).collect();
        assert_eq!(nombres, vec!["Ropa", "Pantalones", "Polos"]);
        assert_eq!(filas[1].nivel, 1);
        // "Jeans" sigue oculto porque "Pantalones" no está expandido
        assert!(!nombres.contains(&"Jeans"));
    }

    #[test]
    fn expansion_anidada_llega_a_las_hojas() {
        let expandidos = HashSet::from([1, 2]);
        let filas = aplanar_arbol(&arbol_de_prueba(), &expandidos);
        let nombres: Vec<&str> = filas.iter().map(|f| f.nombre.as_str()).collect();
        assert_eq!(nombres, vec!["Ropa", "Pantalones", "Jeans", "Polos"]);
        assert_eq!(filas[2].nivel, 2);
    }

    #[test]
    fn un_ciclo_en_el_payload_no_cuelga_el_recorrido() {
        // Nodo que se referencia a sí mismo por id repetido
        let arbol = vec![CategoriaArbol {
            id: 1,
            nombre: "Raíz".to_string(),
            subcategorias: vec![CategoriaArbol {
                id: 1,
                nombre: "Raíz".to_string(),
                subcategorias: Vec::new(),
            }],
        }];
        let filas = aplanar_arbol(&arbol, &HashSet::from([1]));
        assert_eq!(filas.len(), 1);
    }
}
