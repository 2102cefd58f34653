pub mod app;
pub mod bus;
pub mod errors;
pub mod handlers;
pub mod ids;
pub mod models;
pub mod repository;
pub mod seed;
pub mod stats;
pub mod storage;
pub mod state;

pub use app::router;
pub use bus::{EventBus, EventKind, StoreEvent, SubscriptionId};
pub use errors::{CoreError, Field, PersistenceError, ValidationError};
pub use repository::{Repository, Snapshot};
pub use state::AppState;
pub use storage::{resolve_data_path, FileBackend, KeyValueBackend, MemoryBackend, Store};
