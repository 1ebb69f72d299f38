pub mod accounts;
pub mod api;
pub mod audit;
pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod notify;
pub mod reconcile;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;
