pub mod config;
pub mod database;
pub mod entity;
pub mod history_repository;
pub mod models;

pub use config::Config;
pub use database::get_db_connection;
pub use history_repository::SeaOrmHistoryBackend;
pub use models::*;
