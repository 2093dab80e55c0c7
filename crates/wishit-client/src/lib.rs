//! Backend client for the Wishit admin dashboard
//!
//! Wraps the Wishit REST API: sign-in and password reset, collection
//! listing and deletion, and the statistics loader.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod api_client;
pub mod auth;
pub mod error;
pub mod statistics;

pub use api_client::{ApiClient, SignInResponse};
pub use error::{ClientError, ClientResult};
pub use statistics::{CollectionFailure, StatisticsReport, load_statistics};
