//! Startup configuration embedded from `static/`.

use once_cell::sync::Lazy;
use pickpoll_core::{Catalog, SessionConfig};

/// Session knobs from `static/config.json`, falling back to defaults.
pub static SESSION_CONFIG: Lazy<SessionConfig> = Lazy::new(|| {
    SessionConfig::from_json(include_str!("../static/config.json")).unwrap_or_else(|err| {
        log::warn!("bundled config rejected, using defaults: {err}");
        SessionConfig::default()
    })
});

/// Catalog seeded on first run, from `static/catalog.json`.
pub static FIRST_RUN_CATALOG: Lazy<Catalog> = Lazy::new(|| {
    Catalog::from_json(include_str!("../static/catalog.json")).unwrap_or_else(|err| {
        log::warn!("bundled catalog rejected, using stock products: {err}");
        Catalog::default_products()
    })
});
