//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → loader.rs (TOML file, missing file tolerated)
//!     → loader.rs (FAXME_* environment overlay)
//!     → cli.rs (command-line overlay)
//!     → validation.rs (startup safety policy)
//!     → FaxmeConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; only the account directory is refreshed
//! - All fields have defaults to allow minimal configs
//! - Empty values never override a lower-priority source

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

pub use cli::Cli;
pub use loader::{load_config, ConfigError};
pub use schema::{FaxmeConfig, LogFormat, ObservabilityConfig};
pub use validation::{validate_config, SecurityPosture, StartupError};
