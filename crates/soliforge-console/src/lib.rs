/*
[INPUT]:  Public API exports for soliforge-console crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod alert;
pub mod board;
pub mod config;
pub mod elapsed;
pub mod execution;
pub mod matrix;
pub mod poller;
pub mod session;

// Re-export main types for convenience
pub use alert::ViewError;
pub use board::{SearchFilters, TaskBoard};
pub use config::ConsoleConfig;
pub use execution::ExecutionView;
pub use poller::{PollEvent, PollerHandle, PollerState, TaskFeed, spawn_poller};
pub use session::{SessionStore, StoredSession};
