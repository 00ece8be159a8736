pub mod auth;
pub mod etiquetas;
pub mod inventario;
pub mod maestros;
