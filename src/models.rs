pub mod auth;
pub mod etiquetas;
pub mod maestros;
pub mod producto;
