//! Fax account directory subsystem.
//!
//! # Data Flow
//! ```text
//! accounts file (JSON) + operator fax/mobile pair
//!     → source.rs (read records, build snapshot)
//!     → directory.rs (immutable AccountDirectory)
//!     → SharedDirectory (arc-swap) ← request handlers read
//!
//! Every REFRESH_INTERVAL:
//!     refresher.rs rebuilds the snapshot
//!     → atomic swap on success
//!     → previous snapshot kept on failure
//! ```

pub mod directory;
pub mod refresher;
pub mod source;

pub use directory::{Account, AccountDirectory, SharedDirectory};
pub use refresher::{DirectoryRefresher, REFRESH_INTERVAL};
pub use source::{AccountSource, DirectoryError, DirectoryLoader, EmptySource, JsonFileSource};
