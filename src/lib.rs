// src/lib.rs

pub mod catalog;
pub mod config;
pub mod error;
pub mod generation;
pub mod handlers;
pub mod llm;
pub mod models;
pub mod routes;
pub mod state;

pub use routes::create_router;
