// Library surface for the binary, headless integration tests and reuse.
// The terminal UI itself lives in the binary (main.rs, ui.rs).
pub mod clock;
pub mod config;
pub mod cursor;
pub mod error;
pub mod language;
pub mod logging;
pub mod reference;
pub mod render;
pub mod runtime;
pub mod session;
pub mod source;
pub mod stats;
pub mod table;

pub use error::{ConfigError, InvalidState};
pub use session::{Completion, CurrentStats, Keystroke, Session, SessionResults};
