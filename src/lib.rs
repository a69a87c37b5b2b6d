pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod payments;
pub mod query;
pub mod services;
pub mod state;
pub mod validation;
