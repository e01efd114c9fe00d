//! Logging setup.
//!
//! Modules pull the macros in with `use crate::tracing::prelude::*;`.

use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "thermosim=info";

pub mod prelude {
    #[allow(unused_imports)]
    pub use ::tracing::{debug, error, info, trace, warn};
}

/// Install a stderr formatter filtered by `RUST_LOG`, defaulting to
/// `thermosim=info`. Does nothing if a subscriber is already installed.
pub fn init_subscriber() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::LocalTime::rfc_3339())
        .try_init();
}
