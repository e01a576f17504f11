// Catalog: categories, menu items and the public menu

pub mod handlers;
pub mod menu;
pub mod models;
pub mod repository;

pub use handlers::*;
pub use menu::*;
pub use models::*;
pub use repository::*;
