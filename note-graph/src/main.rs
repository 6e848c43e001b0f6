use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use note_graph::config::{Config, DEFAULT_CONFIG, DEFAULT_PALETTES};
use note_graph::{
    assemble, bear_db_path, copy_database, default_palettes, fetch_notes, run_layout, write_dot,
    GraphStyle,
};
use std::path::PathBuf;

/// Generate a Graphviz graph of your Bear notes.
#[derive(Debug, Parser)]
#[command(name = "note-graph", version, about)]
struct Args {
    /// Configuration file overriding the embedded defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the default configuration and exit.
    #[arg(long)]
    dump_config: bool,

    /// Print the default palettes and exit.
    #[arg(long)]
    dump_palette: bool,

    /// Mangle tag names and note titles in the output.
    #[arg(long)]
    anonymise: bool,

    /// Show only the tag graph, hiding note-to-note links.
    #[arg(long, conflicts_with = "only_notes")]
    only_tags: bool,

    /// Show only the note graph, hiding tags.
    #[arg(long)]
    only_notes: bool,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(if args.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    if args.dump_config {
        print!("{DEFAULT_CONFIG}");
        return Ok(());
    }
    if args.dump_palette {
        print!("{DEFAULT_PALETTES}");
        return Ok(());
    }

    let config = Config::load(args.config.as_deref())?;
    let palettes = default_palettes()?;
    let mut style = GraphStyle::from_config(&config, &palettes)?;
    if args.anonymise {
        style.anonymise = true;
    }
    if args.only_tags {
        style.show_note_edges = false;
    }
    if args.only_notes {
        style.show_tag_edges = false;
    }

    let source = bear_db_path()?;
    let copy = copy_database(&source, &config.graph.tmp)
        .context("is Bear installed on this machine?")?;
    let notes = fetch_notes(&copy)?;

    let graph = assemble(&notes, &config.graph);
    log::info!(
        "All notes processed, there are {} tags, {} (valid) notes, {} tag edges among them \
         and {} note edges among them",
        graph.tags.len(),
        graph.notes.len(),
        graph.tag_edges.len(),
        graph.note_edges.len()
    );

    let dot_path = write_dot(&style, &graph)?;
    log::info!("Graphviz file generated at {}", dot_path.display());
    run_layout(&style)?;
    Ok(())
}
