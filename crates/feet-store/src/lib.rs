//! Key-value storage used by the term index.
//!
//! [`KeyValueStore`] is the primitive surface (strings, sets, lists, counters and
//! watch/exec). [`Store`] is the handle the rest of the workspace holds: it owns a
//! backend and runs [`Transaction`]s with optimistic retry. Two backends ship:
//! [`MemoryStore`] for a single process and [`FileStore`], which keeps the same
//! data in a JSON file across runs.

mod error;
mod file;
mod glob;
mod kv;
mod memory;
mod transaction;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use glob::{glob_escape, glob_match};
pub use kv::{KeyValueStore, WatchToken, WriteOp};
pub use memory::MemoryStore;
pub use transaction::{Store, Transaction, TxContext};
