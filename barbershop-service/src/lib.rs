pub mod app;
pub mod appointment_handlers;
pub mod auth_handlers;
pub mod barber_handlers;
pub mod body;
pub mod config;
pub mod metrics;
pub mod models;
pub mod router;
pub mod security;
pub mod store;
pub mod users;
pub mod validation;

pub use app::AppState;
pub use router::build_router;
