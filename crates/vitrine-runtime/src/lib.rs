//! Registry bootstrap.
//!
//! Application code normally builds one [`Registry`] at startup with
//! [`build_registry`] and passes it to whatever needs to present objects.
//! [`global()`] offers the same thing as a lazily-initialised process-wide
//! instance for code that cannot thread a registry through.
//!
//! ```no_run
//! use vitrine_runtime::{Config, build_registry, init_tracing};
//!
//! # fn main() -> vitrine_runtime::Result<()> {
//! init_tracing();
//! let registry = build_registry(&Config::load()?);
//! registry.presenter_with("blog.post", |_, acc, _, _| Ok(acc.with_field("kind", "post")));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;

pub use config::{Config, RegistrySettings};
pub use error::{Error, Result};
pub use vitrine_engine::{ClassPresenter, Registry, RegistryOptions};

use std::sync::LazyLock;

static GLOBAL: LazyLock<Registry> = LazyLock::new(|| match Config::load() {
    Ok(config) => build_registry(&config),
    Err(err) => {
        tracing::warn!(error = %err, "failed to load presenter config, using defaults");
        Registry::new()
    }
});

/// Registry configured from `config`: options plus aliases.
pub fn build_registry(config: &Config) -> Registry {
    let registry = Registry::with_options(config.options());
    config.apply_aliases(&registry);
    tracing::debug!(
        aliases = config.aliases.len(),
        propagate_to_elements = config.registry.propagate_to_elements,
        "presenter registry built"
    );
    registry
}

/// Process-wide registry, built from [`Config::load`] on first use.
///
/// A config that fails to load is logged and replaced by defaults.
pub fn global() -> &'static Registry {
    &GLOBAL
}

/// Install a stderr `tracing` subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
