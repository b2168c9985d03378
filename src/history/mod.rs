//! Document undo/redo.

mod history;

pub use history::{DEFAULT_MAX_UNDO, DocumentHistory};
