//! Aggregates per-note token streams into the note/tag graph.

use crate::config::GraphSection;
use crate::store::Note;
use note_scanner::{Grammar, Token};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteNode {
    pub title: String,
    pub id: String,
}

/// A directed edge; sources and destinations are tag names or note ids
/// depending on which edge list it lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub src: String,
    pub dst: String,
}

/// The assembled graph. Tag names carry no `#` prefix; rendering adds it
/// back for display.
#[derive(Debug, Default)]
pub struct NoteGraph {
    pub tags: BTreeSet<String>,
    pub notes: Vec<NoteNode>,
    /// tag name -> note id
    pub tag_edges: Vec<Edge>,
    /// note id -> note id
    pub note_edges: Vec<Edge>,
}

/// Scans every note and applies the configured filters.
///
/// Note links are recorded against titles first and resolved to ids once
/// all notes are known; a link whose title matches no included note is
/// logged and dropped.
pub fn assemble(notes: &[Note], section: &GraphSection) -> NoteGraph {
    let grammar = Grammar::new();
    let mut graph = NoteGraph::default();
    let mut pending_links: Vec<(String, String)> = Vec::new();

    for note in notes {
        if excluded_title(&note.title, section) {
            log::debug!("Skipping excluded note <<{}>>", note.title);
            continue;
        }
        if note.text.trim().is_empty() {
            log::warn!("There is a problem parsing note <<{}>>", note.title);
        }

        let mut tags = BTreeSet::new();
        let mut links = BTreeSet::new();
        for token in grammar.scan(note.text.as_str()) {
            match token {
                Token::Tag { name, .. } => {
                    tags.insert(name);
                }
                Token::NoteLink { title, .. } => {
                    links.insert(title);
                }
                Token::Text { .. } => {}
            }
        }

        let kept: Vec<String> = tags.into_iter().filter(|t| keep_tag(t, section)).collect();
        if section.prune && kept.is_empty() {
            log::debug!("Pruning note <<{}>>: no tags survive the filters", note.title);
            continue;
        }

        for tag in &kept {
            graph.tag_edges.push(Edge {
                src: tag.clone(),
                dst: note.uuid.clone(),
            });
            graph.tags.insert(tag.clone());
        }
        for link in links {
            pending_links.push((note.uuid.clone(), link));
        }
        graph.notes.push(NoteNode {
            title: note.title.clone(),
            id: note.uuid.clone(),
        });
    }

    for (src, title) in pending_links {
        match graph.notes.iter().find(|n| n.title == title) {
            Some(target) => graph.note_edges.push(Edge {
                src,
                dst: target.id.clone(),
            }),
            None => log::warn!(
                "Could not find note titled <<{title}>> linked from note \
                 bear://x-callback-url/open-note?id={src}"
            ),
        }
    }

    graph
}

fn excluded_title(title: &str, section: &GraphSection) -> bool {
    let lower = title.to_lowercase();
    section
        .exclude_titles
        .iter()
        .filter(|pattern| !pattern.is_empty())
        .any(|pattern| lower.contains(&pattern.to_lowercase()))
}

fn keep_tag(tag: &str, section: &GraphSection) -> bool {
    if section
        .exclude_tags
        .iter()
        .any(|pattern| !pattern.is_empty() && tag.contains(pattern))
    {
        return false;
    }
    let includes: Vec<&String> = section
        .include_only_tags
        .iter()
        .filter(|pattern| !pattern.is_empty())
        .collect();
    includes.is_empty() || includes.iter().any(|pattern| tag.contains(pattern.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn note(title: &str, text: &str, uuid: &str) -> Note {
        Note {
            title: title.to_string(),
            text: text.to_string(),
            uuid: uuid.to_string(),
        }
    }

    fn default_section() -> GraphSection {
        Config::load(None).unwrap().graph
    }

    #[test]
    fn tags_and_links_become_edges() {
        let notes = [
            note("note title", "some text and a #tag", "42"),
            note("empty note title", "", "43"),
            note("title", "[[note title]]", "44"),
            note("title nowhere", "[[ ]] goes nowhere", "45"),
        ];
        let graph = assemble(&notes, &default_section());
        assert!(graph.tags.contains("tag"));
        assert_eq!(graph.notes.len(), 4);
        assert!(graph.tag_edges.contains(&Edge {
            src: "tag".to_string(),
            dst: "42".to_string(),
        }));
        assert_eq!(graph.note_edges.len(), 1);
        assert!(graph.note_edges.contains(&Edge {
            src: "44".to_string(),
            dst: "42".to_string(),
        }));
    }

    #[test]
    fn duplicate_mentions_collapse_to_one_edge() {
        let notes = [note("a", "#tag once, #tag twice", "1")];
        let graph = assemble(&notes, &default_section());
        assert_eq!(graph.tag_edges.len(), 1);
    }

    #[test]
    fn excluded_titles_are_skipped() {
        let mut section = default_section();
        section.exclude_titles = vec!["Secret".to_string()];
        let notes = [
            note("my secret diary", "#keep", "1"),
            note("public", "#keep", "2"),
        ];
        let graph = assemble(&notes, &section);
        assert_eq!(graph.notes.len(), 1);
        assert_eq!(graph.notes[0].id, "2");
    }

    #[test]
    fn exclude_tags_wins_over_include_only() {
        let mut section = default_section();
        section.exclude_tags = vec!["work".to_string()];
        section.include_only_tags = vec!["work".to_string(), "home".to_string()];
        let notes = [note("a", "#work/urgent #home/chores #other", "1")];
        let graph = assemble(&notes, &section);
        assert_eq!(graph.tags.iter().collect::<Vec<_>>(), ["home/chores"]);
    }

    #[test]
    fn prune_drops_notes_without_surviving_tags() {
        let mut section = default_section();
        section.prune = true;
        section.include_only_tags = vec!["keep".to_string()];
        let notes = [
            note("kept", "#keep/this", "1"),
            note("dropped", "#other only", "2"),
        ];
        let graph = assemble(&notes, &section);
        assert_eq!(graph.notes.len(), 1);
        assert_eq!(graph.notes[0].id, "1");
    }

    #[test]
    fn links_to_pruned_or_unknown_notes_are_dropped() {
        let mut section = default_section();
        section.prune = true;
        section.include_only_tags = vec!["keep".to_string()];
        let notes = [
            note("kept", "#keep and [[dropped]] and [[nowhere]]", "1"),
            note("dropped", "no tags here", "2"),
        ];
        let graph = assemble(&notes, &section);
        assert!(graph.note_edges.is_empty());
    }

    #[test]
    fn tags_inside_code_are_not_extracted() {
        let notes = [note("a", "```\n#fenced\n``` and `#inline` but #real", "1")];
        let graph = assemble(&notes, &default_section());
        assert_eq!(graph.tags.iter().collect::<Vec<_>>(), ["real"]);
    }
}
