pub mod http;
pub mod local;
pub mod manager;
pub mod queue;
pub mod remote;

mod error;

pub use error::{Error, RemoteError, RemoteResult, Result};
pub use http::HttpNoteStore;
pub use local::{FileStore, LocalStore, MemoryStore};
pub use manager::{NoteSyncManager, RetryReport};
pub use queue::{PendingSync, PendingSyncQueue};
pub use remote::{BoxFuture, RemoteNote, RemoteNoteStore};
