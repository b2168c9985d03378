//! In-memory script table.
//!
//! [`ScriptTable`] is a plain tree of named and indexed values that
//! implements both [`ScriptReader`] and [`ScriptWriter`]. Hosts that
//! embed a real scripting runtime implement the traits against their
//! own stack; this one backs tests and headless tools.

use std::collections::BTreeMap;

use super::{ScriptReader, ScriptWriter};

/// One value in a script table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableValue {
    String(String),
    Int(i64),
    Real(f64),
    Bool(bool),
    Table(Table),
}

/// A table with named fields and an indexed array part, both ordered
/// deterministically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub named: BTreeMap<String, TableValue>,
    pub indexed: Vec<TableValue>,
}

/// Which slot of the parent a cursor step descended into.
#[derive(Debug, Clone)]
enum Step {
    Named(String),
    Indexed(usize),
}

/// An owned table tree with a cursor for trait-driven traversal.
#[derive(Debug, Clone, Default)]
pub struct ScriptTable {
    root: Table,
    path: Vec<Step>,
}

impl ScriptTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &Table {
        &self.root
    }

    fn current(&self) -> Option<&Table> {
        let mut table = &self.root;
        for step in &self.path {
            let value = match step {
                Step::Named(key) => table.named.get(key)?,
                Step::Indexed(index) => table.indexed.get(*index)?,
            };
            let TableValue::Table(inner) = value else {
                return None;
            };
            table = inner;
        }
        Some(table)
    }

    fn current_mut(&mut self) -> &mut Table {
        let mut table = &mut self.root;
        for step in &self.path {
            let value = match step {
                Step::Named(key) => table
                    .named
                    .entry(key.clone())
                    .or_insert_with(|| TableValue::Table(Table::default())),
                Step::Indexed(index) => {
                    while table.indexed.len() <= *index {
                        table.indexed.push(TableValue::Table(Table::default()));
                    }
                    &mut table.indexed[*index]
                }
            };
            if !matches!(value, TableValue::Table(_)) {
                *value = TableValue::Table(Table::default());
            }
            let TableValue::Table(inner) = value else {
                unreachable!()
            };
            table = inner;
        }
        table
    }
}

impl ScriptWriter for ScriptTable {
    fn set_string(&mut self, key: &str, value: &str) {
        self.current_mut()
            .named
            .insert(key.to_string(), TableValue::String(value.to_string()));
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.current_mut()
            .named
            .insert(key.to_string(), TableValue::Int(value));
    }

    fn set_real(&mut self, key: &str, value: f64) {
        self.current_mut()
            .named
            .insert(key.to_string(), TableValue::Real(value));
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.current_mut()
            .named
            .insert(key.to_string(), TableValue::Bool(value));
    }

    fn push_table(&mut self, key: &str) {
        self.path.push(Step::Named(key.to_string()));
        self.current_mut();
    }

    fn push_index(&mut self, index: usize) {
        self.path.push(Step::Indexed(index));
        self.current_mut();
    }

    fn pop_table(&mut self) {
        self.path.pop();
    }
}

impl ScriptReader for ScriptTable {
    fn get_string(&self, key: &str) -> Option<String> {
        match self.current()?.named.get(key)? {
            TableValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        match self.current()?.named.get(key)? {
            TableValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    fn get_real(&self, key: &str) -> Option<f64> {
        match self.current()?.named.get(key)? {
            TableValue::Real(v) => Some(*v),
            TableValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        match self.current()?.named.get(key)? {
            TableValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    fn enter_table(&mut self, key: &str) -> bool {
        match self.current() {
            Some(table) if matches!(table.named.get(key), Some(TableValue::Table(_))) => {
                self.path.push(Step::Named(key.to_string()));
                true
            }
            _ => false,
        }
    }

    fn enter_index(&mut self, index: usize) -> bool {
        match self.current() {
            Some(table) if matches!(table.indexed.get(index), Some(TableValue::Table(_))) => {
                self.path.push(Step::Indexed(index));
                true
            }
            _ => false,
        }
    }

    fn exit_table(&mut self) {
        self.path.pop();
    }

    fn len(&self) -> usize {
        self.current().map_or(0, |t| t.indexed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_fields_round_trip() {
        let mut table = ScriptTable::new();
        table.set_string("name", "hero");
        table.set_int("id", 7);
        table.set_real("x", 1.5);
        table.set_bool("expanded", true);

        assert_eq!(table.get_string("name").as_deref(), Some("hero"));
        assert_eq!(table.get_int("id"), Some(7));
        assert_eq!(table.get_real("x"), Some(1.5));
        assert_eq!(table.get_bool("expanded"), Some(true));
        assert_eq!(table.get_string("id"), None);
    }

    #[test]
    fn nested_and_indexed_tables() {
        let mut table = ScriptTable::new();
        table.push_table("children");
        table.push_index(0);
        table.set_string("name", "first");
        table.pop_table();
        table.push_index(1);
        table.set_string("name", "second");
        table.pop_table();
        table.pop_table();

        assert!(table.enter_table("children"));
        assert_eq!(table.len(), 2);
        assert!(table.enter_index(1));
        assert_eq!(table.get_string("name").as_deref(), Some("second"));
        table.exit_table();
        table.exit_table();

        assert!(!table.enter_table("missing"));
    }

    #[test]
    fn ints_read_back_as_reals() {
        let mut table = ScriptTable::new();
        table.set_int("size", 12);
        assert_eq!(table.get_real("size"), Some(12.0));
    }
}
