//! Catalog data model types and CSV table I/O.
//!
//! This crate defines the row types for the three catalog tables
//! (`tracks`, `projects`, `project_tracks`) and the whole-file load/rewrite
//! layer they are persisted with. It knows nothing about the rules that tie
//! the tables together; those live in `apm-store`.

pub mod table;
pub mod types;

pub use table::{
    TableError, TableRow, WriteOptions, backup_path, init_table, read_table, write_table,
};
pub use types::*;
