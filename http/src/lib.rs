//! Scrape endpoint of the exporter: an axum router serving `/metrics`, `/healthcheck` and a landing page.

#[macro_use]
extern crate tracing;

pub mod encoder;
pub mod error;
pub mod router;
pub mod server;

pub use error::AppError;
pub use router::{
    create_router,
    AppState,
};
pub use server::{
    serve,
    shutdown_signal,
};
