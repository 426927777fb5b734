/// A styled span of text (UI-agnostic).
///
/// This is a minimal representation that can be converted to
/// ratatui Span/Line types at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub style: Style,
}

impl StyledSpan {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// A line of styled spans.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    /// Creates an empty line.
    pub fn empty() -> Self {
        StyledLine { spans: vec![] }
    }

    /// Creates a line holding a single span.
    pub fn plain(text: impl Into<String>, style: Style) -> Self {
        StyledLine {
            spans: vec![StyledSpan::new(text, style)],
        }
    }

    /// Concatenated text of all spans.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Appends a span, skipping empty text.
    pub fn push(&mut self, text: impl Into<String>, style: Style) {
        let text = text.into();
        if !text.is_empty() {
            self.spans.push(StyledSpan { text, style });
        }
    }
}

/// Semantic style identifiers (UI-agnostic).
///
/// These are translated to actual terminal styles by the active `Theme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// No styling (indentation, whitespace).
    Plain,
    /// Code without a known language.
    Code,

    // YAML styles
    /// Mapping key.
    Key,
    /// Quoted or plain string scalar.
    String,
    /// Integer or float scalar.
    Number,
    /// `true`, `false`, `null`, `~`, anchors and aliases.
    Literal,
    /// `# comment`.
    Comment,
    /// `---` / `...` document markers.
    Separator,
    /// `:`, block scalar indicators.
    Punctuation,
    /// Sequence entry dash.
    Dash,
}
