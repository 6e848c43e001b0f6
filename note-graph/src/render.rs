//! Graphviz emission: resolved styles, labels, the `.gv` document, and the
//! optional layout-program invocation.

use crate::config::{resolve_color, Config, Palettes};
use crate::error::GraphError;
use crate::graph::NoteGraph;
use sha2::{Digest, Sha512};
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

/// Node attributes with palette references resolved to concrete colors.
#[derive(Debug, Clone)]
pub struct NodeStyle {
    shape: String,
    style: String,
    fill_color: String,
    strike_color: String,
    free_form: String,
}

impl fmt::Display for NodeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shape={}, style=\"{}\", color=\"{}\", fillcolor=\"{}\"{}",
            self.shape,
            self.style,
            self.strike_color,
            self.fill_color,
            free_form_suffix(&self.free_form)
        )
    }
}

/// Edge attributes with palette references resolved.
#[derive(Debug, Clone)]
pub struct EdgeStyle {
    arrowhead: String,
    strike_color: String,
    free_form: String,
}

impl fmt::Display for EdgeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "color=\"{}\", arrowhead={}{}",
            self.strike_color,
            self.arrowhead,
            free_form_suffix(&self.free_form)
        )
    }
}

fn free_form_suffix(free_form: &str) -> String {
    if free_form.is_empty() {
        String::new()
    } else {
        format!(", {free_form}")
    }
}

/// Everything rendering needs, resolved once from the configuration.
#[derive(Debug, Clone)]
pub struct GraphStyle {
    pub anonymise: bool,
    pub show_tag_edges: bool,
    pub show_note_edges: bool,
    pub destination: String,
    pub run_graphviz: String,
    pub output_format: String,
    max_label_length: usize,
    overlap: String,
    sep: String,
    splines: String,
    background_color: String,
    free_form: String,
    tag_style: NodeStyle,
    note_style: NodeStyle,
    tag_link_style: EdgeStyle,
    note_link_style: EdgeStyle,
}

impl GraphStyle {
    pub fn from_config(config: &Config, palettes: &Palettes) -> Result<Self, GraphError> {
        let resolve = |color: &str| resolve_color(color, &config.palettes, palettes);
        let node_style = |section: &crate::config::NodeSection| -> Result<NodeStyle, GraphError> {
            Ok(NodeStyle {
                shape: section.shape.clone(),
                style: section.style.clone(),
                fill_color: resolve(&section.fill_color)?,
                strike_color: resolve(&section.strike_color)?,
                free_form: section.free_form.clone(),
            })
        };
        let edge_style = |section: &crate::config::EdgeSection| -> Result<EdgeStyle, GraphError> {
            Ok(EdgeStyle {
                arrowhead: section.arrowhead.clone(),
                strike_color: resolve(&section.strike_color)?,
                free_form: section.free_form.clone(),
            })
        };
        let graph = &config.graph;
        Ok(Self {
            anonymise: graph.anonymise,
            show_tag_edges: graph.show_tag_edges,
            show_note_edges: graph.show_note_edges,
            destination: graph.destination.clone(),
            run_graphviz: graph.run_graphviz.clone(),
            output_format: graph.output_format.clone(),
            max_label_length: graph.max_label_length,
            overlap: graph.overlap.clone(),
            sep: graph.sep.clone(),
            splines: graph.splines.clone(),
            background_color: resolve(&graph.bgcolor)?,
            free_form: graph.free_form.clone(),
            tag_style: node_style(&config.tag)?,
            note_style: node_style(&config.note)?,
            tag_link_style: edge_style(&config.tag_link)?,
            note_link_style: edge_style(&config.note_link)?,
        })
    }

    fn graph_attrs(&self) -> String {
        format!(
            "graph [overlap={}, sep=\"{}\", splines={}, bgcolor=\"{}\"{}]",
            self.overlap,
            self.sep,
            self.splines,
            self.background_color,
            free_form_suffix(&self.free_form)
        )
    }

    /// Shortens a label to the configured length and either anonymises it or
    /// escapes it for a quoted Graphviz string.
    pub fn label(&self, raw: &str) -> String {
        let shortened: String = if raw.chars().count() > self.max_label_length {
            let mut s: String = raw.chars().take(self.max_label_length).collect();
            s.push('…');
            s
        } else {
            raw.to_string()
        };
        if self.anonymise {
            mangle(&shortened)
        } else {
            shortened.replace('"', "\\\"")
        }
    }
}

/// Replaces every character of the label with successive characters of its
/// sha-512 hex digest, keeping spaces and the `#` and `/` separators so the
/// shape of tags and titles stays recognizable.
fn mangle(label: &str) -> String {
    let digest = Sha512::digest(label.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    let mut cycle = hex.chars().cycle();
    label
        .chars()
        .map(|ch| {
            if matches!(ch, ' ' | '#' | '/') {
                ch
            } else {
                cycle.next().unwrap_or('0')
            }
        })
        .collect()
}

/// Renders the graph as a Graphviz document.
pub fn render_dot(style: &GraphStyle, graph: &NoteGraph) -> String {
    let mut out = String::new();
    out.push_str("digraph G_component_0 {\n");
    out.push_str(&format!("\t{}\n", style.graph_attrs()));

    out.push_str("\t\t# Tags section\n");
    if style.show_tag_edges {
        for tag in &graph.tags {
            let display = format!("#{tag}");
            let url = if style.anonymise {
                String::new()
            } else {
                format!("bear://x-callback-url/open-tag?name={display}")
            };
            out.push_str(&format!(
                "\t\t\"{}\" [{}, URL=\"{url}\"];\n",
                style.label(&display),
                style.tag_style
            ));
        }
    }

    out.push_str("\t\t# Notes section\n");
    for note in &graph.notes {
        let url = format!("bear://x-callback-url/open-note?id={}", note.id);
        out.push_str(&format!(
            "\t\t\"{}\" [label=\"{}\", {}, URL=\"{url}\"];\n",
            note.id,
            style.label(&note.title),
            style.note_style
        ));
    }

    out.push_str("\t\t# Tag edge section\n");
    if style.show_tag_edges {
        for edge in &graph.tag_edges {
            out.push_str(&format!(
                "\t\t\"{}\" -> \"{}\" [{}];\n",
                style.label(&format!("#{}", edge.src)),
                edge.dst,
                style.tag_link_style
            ));
        }
    }

    out.push_str("\t\t# Note edge section\n");
    if style.show_note_edges {
        for edge in &graph.note_edges {
            out.push_str(&format!(
                "\t\t\"{}\" -> \"{}\" [{}];\n",
                edge.src, edge.dst, style.note_link_style
            ));
        }
    }

    out.push('}');
    out
}

/// Writes `<destination>.gv` and returns its path.
pub fn write_dot(style: &GraphStyle, graph: &NoteGraph) -> Result<PathBuf, GraphError> {
    let path = PathBuf::from(format!("{}.gv", style.destination));
    std::fs::write(&path, render_dot(style, graph)).map_err(|source| GraphError::WriteFile {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Invokes the configured layout program on the emitted `.gv` file, writing
/// its stdout to `<destination>.<output_format>`. A blank program name means
/// skip this step.
pub fn run_layout(style: &GraphStyle) -> Result<(), GraphError> {
    if style.run_graphviz.is_empty() {
        return Ok(());
    }
    let source = format!("{}.gv", style.destination);
    let target = format!("{}.{}", style.destination, style.output_format);
    log::info!(
        "Running layout command \"{} -T{} {}\"",
        style.run_graphviz,
        style.output_format,
        source
    );
    let output = Command::new(&style.run_graphviz)
        .arg(format!("-T{}", style.output_format))
        .arg(&source)
        .output()
        .map_err(|err| GraphError::LayoutSpawn {
            command: style.run_graphviz.clone(),
            source: err,
        })?;
    if !output.status.success() {
        return Err(GraphError::LayoutFailed {
            command: style.run_graphviz.clone(),
            status: output.status,
        });
    }
    std::fs::write(&target, &output.stdout).map_err(|source| GraphError::WriteFile {
        path: PathBuf::from(&target),
        source,
    })?;
    log::info!("Run \"open {target}\" to open the generated file");
    Ok(())
}
