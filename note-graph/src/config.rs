//! Configuration loading and palette resolution.
//!
//! The defaults are embedded in the binary; a user file overrides them
//! field by field via a deep table merge, mirroring `--dump-config` output.

use crate::error::GraphError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The embedded default configuration, printed by `--dump-config`.
pub const DEFAULT_CONFIG: &str = include_str!("../resources/default_config.toml");

/// The embedded default palettes, printed by `--dump-palette`.
pub const DEFAULT_PALETTES: &str = include_str!("../resources/palettes.toml");

/// Section names a user palette may not shadow.
pub const RESERVED_SECTIONS: [&str; 5] = ["graph", "note", "tag", "note_link", "tag_link"];

pub type Palette = BTreeMap<String, String>;
pub type Palettes = BTreeMap<String, Palette>;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub graph: GraphSection,
    pub note: NodeSection,
    pub tag: NodeSection,
    pub note_link: EdgeSection,
    pub tag_link: EdgeSection,
    /// Any extra top-level table is a user-defined palette.
    #[serde(flatten)]
    pub palettes: Palettes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphSection {
    pub anonymise: bool,
    pub exclude_titles: Vec<String>,
    pub exclude_tags: Vec<String>,
    pub include_only_tags: Vec<String>,
    pub prune: bool,
    pub tmp: PathBuf,
    pub destination: String,
    pub show_tag_edges: bool,
    pub show_note_edges: bool,
    /// Layout program to invoke after emitting the `.gv` file; empty means
    /// don't run anything.
    pub run_graphviz: String,
    pub output_format: String,
    pub overlap: String,
    pub sep: String,
    pub splines: String,
    pub max_label_length: usize,
    pub bgcolor: String,
    pub free_form: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeSection {
    pub shape: String,
    pub style: String,
    pub fill_color: String,
    pub strike_color: String,
    pub free_form: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeSection {
    pub arrowhead: String,
    pub strike_color: String,
    pub free_form: String,
}

impl Config {
    /// Loads the embedded defaults, overridden by the user file if given.
    pub fn load(user_path: Option<&Path>) -> Result<Self, GraphError> {
        let mut value: toml::Value = toml::from_str(DEFAULT_CONFIG)?;
        if let Some(path) = user_path {
            let text = std::fs::read_to_string(path).map_err(|source| GraphError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
            let user: toml::Value = toml::from_str(&text)?;
            merge_value(&mut value, user);
            log::debug!("Merged user configuration from {}", path.display());
        }
        Ok(value.try_into()?)
    }
}

/// Loads the embedded palette tables.
pub fn default_palettes() -> Result<Palettes, GraphError> {
    Ok(toml::from_str(DEFAULT_PALETTES)?)
}

/// Recursive table merge: user values win, unknown user keys are inserted.
fn merge_value(base: &mut toml::Value, user: toml::Value) {
    match (base, user) {
        (toml::Value::Table(base), toml::Value::Table(user)) => {
            for (key, value) in user {
                match base.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, user) => *base = user,
    }
}

/// Resolves a `palette.color` reference; anything without a dot passes
/// through as a literal Graphviz color. User-defined palettes shadow the
/// embedded ones.
pub fn resolve_color(
    color: &str,
    user_palettes: &Palettes,
    palettes: &Palettes,
) -> Result<String, GraphError> {
    let Some((palette, name)) = color.split_once('.') else {
        return Ok(color.to_string());
    };
    if RESERVED_SECTIONS.contains(&palette) {
        return Err(GraphError::ReservedPalette(palette.to_string()));
    }
    let table = user_palettes
        .get(palette)
        .or_else(|| palettes.get(palette))
        .ok_or_else(|| GraphError::UnknownPalette(palette.to_string()))?;
    table
        .get(name)
        .cloned()
        .ok_or_else(|| GraphError::UnknownColor {
            palette: palette.to_string(),
            color: name.to_string(),
        })
}
