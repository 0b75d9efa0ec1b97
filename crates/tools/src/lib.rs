//! Front-end pieces shared by the `tools` and `fuzz` binaries: configuration loading, seed
//! selection, rendering and logging setup.

pub mod config;
pub mod render;
pub mod seed;

use std::io;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Installs a stderr fmt subscriber; `RUST_LOG` refines the default `info` level.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(io::stderr)
        .init();
}
