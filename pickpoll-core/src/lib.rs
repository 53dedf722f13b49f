//! Pickpoll Voting Engine
//!
//! Platform-agnostic core of the Pickpoll preference poll: random round
//! sampling, click attribution, session termination, and durable tallies.
//! Rendering and storage backends plug in through [`Presenter`] and [`BlobStore`].

pub mod catalog;
pub mod config;
pub mod numbers;
pub mod results;
pub mod sampler;
pub mod session;
pub mod state;
pub mod storage;
pub mod tally;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogError, Item};
pub use config::{
    ConfigError, ConfigLoadError, DEFAULT_STORAGE_KEY, MIN_CATALOG_LEN, SessionConfig,
};
pub use results::{Aggregates, ChartSeries, click_rate_pct};
pub use sampler::{Round, SampleError, sample, seeded_rng};
pub use session::{
    ClickOutcome, EngineError, NullPresenter, Presenter, SessionEngine, SessionPhase,
};
pub use state::SessionState;
pub use storage::{BlobStore, MemoryStore, StorageError};
pub use tally::{SnapshotOrigin, TallyError, TallyStore};
