//! # AdminKit Gateway
//!
//! HTTP API for the admin backend. The composition root lives in
//! [`server`]: it assembles the fixed system routes, runs the module
//! loader once, and splices every loaded module router into the
//! application before binding the listener.

pub mod audit;
pub mod extract;
pub mod plugins;
pub mod routes;
pub mod server;

pub use server::{AppState, start};
