//! Builds a Graphviz graph of Bear notes, their tags and the links between
//! them, using [`note_scanner`] to pull tags and note links out of each
//! note's markdown body.

pub mod config;
pub mod error;
pub mod graph;
pub mod render;
pub mod store;

pub use config::{default_palettes, Config};
pub use error::GraphError;
pub use graph::{assemble, NoteGraph};
pub use render::{run_layout, write_dot, GraphStyle};
pub use store::{bear_db_path, copy_database, fetch_notes, Note};
