pub mod config;
pub mod db;
pub mod envelope;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod services;
