//! Display elements of editable fields, rendered from values.
//!
//! Rendering is a pure function of the committed value: a commit discards the old
//! node and renders a new one instead of patching it.

/// Text shown for an empty line of a multi-line field. A non-breaking space keeps
/// the line's height.
pub const EMPTY_LINE_MARKER: &str = "\u{a0}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayLine {
    Text(String),
    Empty,
}

impl DisplayLine {
    /// Reads one rendered line, mapping the empty-line marker back to an empty line.
    pub fn from_rendered(text: &str) -> Self {
        if text.is_empty() || text == EMPTY_LINE_MARKER {
            DisplayLine::Empty
        } else {
            DisplayLine::Text(text.to_string())
        }
    }

    pub fn text(&self) -> &str {
        match self {
            DisplayLine::Text(text) => text,
            DisplayLine::Empty => "",
        }
    }

    pub fn rendered(&self) -> &str {
        match self {
            DisplayLine::Text(text) => text,
            DisplayLine::Empty => EMPTY_LINE_MARKER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayNode {
    Heading { id: &'static str, text: String },
    Lines {
        id: &'static str,
        lines: Vec<DisplayLine>,
    },
}

impl DisplayNode {
    pub fn id(&self) -> &'static str {
        match self {
            DisplayNode::Heading { id, .. } | DisplayNode::Lines { id, .. } => id,
        }
    }

    /// The value the node shows; lines are joined with `\n`.
    pub fn text_content(&self) -> String {
        match self {
            DisplayNode::Heading { text, .. } => text.clone(),
            DisplayNode::Lines { lines, .. } => lines
                .iter()
                .map(DisplayLine::text)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn visual_lines(&self) -> Vec<&str> {
        match self {
            DisplayNode::Heading { text, .. } => vec![text.as_str()],
            DisplayNode::Lines { lines, .. } => lines.iter().map(DisplayLine::rendered).collect(),
        }
    }
}

pub fn render_heading(id: &'static str, value: &str) -> DisplayNode {
    DisplayNode::Heading {
        id,
        text: value.to_string(),
    }
}

pub fn render_lines(id: &'static str, value: &str) -> DisplayNode {
    DisplayNode::Lines {
        id,
        lines: value.split('\n').map(DisplayLine::from_rendered).collect(),
    }
}

/// Rebuilds a multi-line node from the texts of server-rendered line elements.
pub fn lines_from_rendered<'a>(
    id: &'static str,
    rendered: impl IntoIterator<Item = &'a str>,
) -> DisplayNode {
    DisplayNode::Lines {
        id,
        lines: rendered.into_iter().map(DisplayLine::from_rendered).collect(),
    }
}
