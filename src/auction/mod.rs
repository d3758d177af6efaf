pub mod commands;
pub mod dto;
pub mod events;
pub mod mapping;
pub mod model;
pub mod queries;
