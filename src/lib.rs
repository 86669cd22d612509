//! Backend API for tariff/trade data: bearer-token authentication establishing a
//! per-request security context, plus the login and admin endpoints consuming it.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
