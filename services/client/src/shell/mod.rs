pub mod handler;
pub mod protocol;
pub mod state;

// Re-export the entry points the binary needs to drive the shell.
pub use handler::{dispatch, run};
pub use protocol::{Command, HELP};
pub use state::AppState;
