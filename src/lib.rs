pub mod api;
pub mod cache;
pub mod config;
pub mod constants;
pub mod drag;
pub mod error;
pub mod events;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::BuilderError;
pub use state::{BuilderState, Viewport};

/// Set up tracing for binaries and examples. `RUST_LOG` overrides the
/// default filter.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("marquee=debug")),
        )
        .init();
}
