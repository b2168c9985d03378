//! Script-table persistence.
//!
//! This module provides:
//!
//! - [`ScriptWriter`] / [`ScriptReader`] — traits a scripting host
//!   implements over its own table stack
//! - [`save_document`] / [`load_document`] — the document layout on top
//!   of those traits, every field addressed by name
//! - [`ScriptTable`] — an in-memory implementation of both traits
//!
//! Unlike binary snapshots, the script form exists for interop with
//! embedded runtimes and is tolerant of field order; resource paths are
//! re-resolved on load instead of carrying a stored status.

mod error;
mod io;
mod table;

pub use error::ScriptError;
pub use io::{SCRIPT_VERSION, load_document, save_document};
pub use table::{ScriptTable, Table, TableValue};

/// Sink for writing a document as nested tables of named values.
///
/// `push_table` and `push_index` descend into a subtable, creating it
/// when absent; `pop_table` returns to the parent. Setters write named
/// fields of the current table.
pub trait ScriptWriter {
    fn set_string(&mut self, key: &str, value: &str);
    fn set_int(&mut self, key: &str, value: i64);
    fn set_real(&mut self, key: &str, value: f64);
    fn set_bool(&mut self, key: &str, value: bool);
    fn push_table(&mut self, key: &str);
    fn push_index(&mut self, index: usize);
    fn pop_table(&mut self);
}

/// Source for reading a document back out of nested tables.
///
/// Getters return `None` for absent fields and for fields of the wrong
/// type. `enter_table` and `enter_index` descend into an existing
/// subtable and report whether it was there; `exit_table` returns to
/// the parent. `len` is the size of the current table's array part.
pub trait ScriptReader {
    fn get_string(&self, key: &str) -> Option<String>;
    fn get_int(&self, key: &str) -> Option<i64>;
    fn get_real(&self, key: &str) -> Option<f64>;
    fn get_bool(&self, key: &str) -> Option<bool>;
    fn enter_table(&mut self, key: &str) -> bool;
    fn enter_index(&mut self, index: usize) -> bool;
    fn exit_table(&mut self);
    fn len(&self) -> usize;
}
