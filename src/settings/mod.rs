// Restaurant settings: branding, contact details and opening hours

pub mod handlers;
pub mod models;
pub mod repository;

pub use handlers::*;
pub use models::*;
pub use repository::*;
