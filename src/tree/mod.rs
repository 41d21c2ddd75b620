//! File tree I/O for the config-as-code pipeline
//!
//! The on-disk contract (directory names, sentinel filenames) is shared by
//! export and import through the `layout` module so the two sides can never
//! drift apart. Writes are idempotent: re-exporting an unchanged server
//! state touches no files.

pub mod layout;

mod loader;
mod writer;

pub use loader::load_checks_from_directory;
pub use writer::write_yaml;
