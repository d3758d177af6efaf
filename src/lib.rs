pub mod app;
pub mod auction;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod message_broker;
pub mod outbox;
pub mod repository;

pub use app::{build_router, AppState};
