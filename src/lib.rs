//! campus-registry: REST API for universities and their students, backed by PostgreSQL.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod routes;
pub mod seed;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use routes::{app, common_routes, entity_routes};
pub use seed::seed_from_file;
pub use service::CrudService;
pub use settings::Settings;
pub use state::AppState;
pub use store::{connect, ensure_database_exists};
