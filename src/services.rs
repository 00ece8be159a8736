pub mod auth_service;
pub mod etiquetas_service;
pub mod impresion_service;
pub mod maestros_service;
pub mod matriz_service;
pub mod precios_service;
pub mod producto_service;
