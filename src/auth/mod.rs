// Authentication module
// JWT bearer authentication, the admin role guard and admin-driven user management

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{
    create_user_handler, list_users_handler, login_handler, me_handler, update_user_role_handler,
};
pub use middleware::{AdminUser, AuthenticatedUser};
pub use models::{LoginRequest, LoginResponse, Role, User, UserResponse};
pub use repository::UserRepository;
pub use service::AuthService;
pub use token::TokenService;
