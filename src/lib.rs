#![doc = "The `taskvault` library crate."]
#![doc = ""]
#![doc = "Account registration and login with bcrypt and signed JWTs, a request"]
#![doc = "authorization gate, and task storage in which every read and write is scoped"]
#![doc = "to the authenticated owner. The binary (`main.rs`) wires these into an"]
#![doc = "actix-web server backed by Postgres."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

pub use crate::config::Config;
pub use crate::error::AppError;
