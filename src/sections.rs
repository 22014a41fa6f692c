use serde::{Deserialize, Serialize};

pub const HEADING_MARKER: &str = "## ";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: String,
}

/// Split a markdown report into sections opened by level-2 headings.
///
/// Text before the first heading is dropped, as are blank lines. Each kept
/// line lands in the open section's content with its newline restored.
pub fn parse(markdown: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<Section> = None;

    for line in markdown.split('\n') {
        if let Some(rest) = line.strip_prefix(HEADING_MARKER) {
            if let Some(done) = current.take() {
                sections.push(done);
            }
            current = Some(Section {
                title: rest.trim().to_string(),
                content: String::new(),
            });
        } else if let Some(open) = current.as_mut() {
            if !line.trim().is_empty() {
                open.content.push_str(line);
                open.content.push('\n');
            }
        }
    }

    if let Some(done) = current {
        sections.push(done);
    }
    sections
}
