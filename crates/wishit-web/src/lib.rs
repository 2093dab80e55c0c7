//! Wishit admin dashboard web server
//!
//! Serves the dashboard pages behind the session guard, keeps the session in
//! browser cookies, and exposes the JSON endpoints the pages load from.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod cookies;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use server::build_app;
pub use state::AppState;
