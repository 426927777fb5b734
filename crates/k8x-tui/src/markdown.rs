//! Markdown rendering for the preview.
//!
//! The preview text is a single fenced `yml` block. Fenced YAML is handed to
//! `YamlHighlighter`; other code blocks get a flat style. Text outside code
//! blocks is not part of a preview and is skipped.
//!
//! Uses pulldown-cmark for parsing.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

use crate::highlight::YamlHighlighter;
use crate::style::{Style, StyledLine};

/// Shortest fence CommonMark accepts.
const MIN_FENCE_LEN: usize = 3;

/// Wraps manifest text in a fenced `yml` block.
///
/// The fence is one backtick longer than the longest backtick run in `text`,
/// so no line of a manifest can close it early.
pub fn fence_yaml(text: &str) -> String {
    let fence = "`".repeat(longest_backtick_run(text).max(MIN_FENCE_LEN - 1) + 1);
    format!("{fence}yml\n{}\n{fence}\n", text.trim_end_matches('\n'))
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}

/// Renders the code blocks of markdown text into styled lines.
pub fn render_markdown(text: &str) -> Vec<StyledLine> {
    let mut renderer = MarkdownRenderer::default();
    for event in Parser::new(text) {
        renderer.process_event(event);
    }
    renderer.finish()
}

#[derive(Default)]
struct MarkdownRenderer {
    lines: Vec<StyledLine>,
    /// Language of the open code block; `Some("")` when unlabeled.
    code_block_lang: Option<String>,
    /// Raw text of the open code block.
    code_buffer: String,
}

impl MarkdownRenderer {
    fn process_event(&mut self, event: Event) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                self.code_block_lang = Some(match kind {
                    CodeBlockKind::Fenced(lang) => lang.trim().to_string(),
                    CodeBlockKind::Indented => String::new(),
                });
                self.code_buffer.clear();
            }
            Event::Text(text) if self.code_block_lang.is_some() => {
                self.code_buffer.push_str(&text);
            }
            Event::End(TagEnd::CodeBlock) => self.flush_code_block(),
            _ => {}
        }
    }

    fn flush_code_block(&mut self) {
        let Some(lang) = self.code_block_lang.take() else {
            return;
        };
        let code = std::mem::take(&mut self.code_buffer);

        if is_yaml(&lang) {
            self.lines.extend(YamlHighlighter::highlight(&code));
        } else {
            self.lines
                .extend(code.lines().map(|line| StyledLine::plain(line, Style::Code)));
        }
    }

    fn finish(mut self) -> Vec<StyledLine> {
        // An unterminated fence runs to the end of the document.
        self.flush_code_block();
        while self.lines.last().is_some_and(|line| line.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

fn is_yaml(lang: &str) -> bool {
    matches!(
        lang.split_whitespace().next(),
        Some("yml" | "yaml" | "YAML" | "YML")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[StyledLine]) -> Vec<String> {
        lines.iter().map(StyledLine::text).collect()
    }

    #[test]
    fn test_fence_yaml() {
        assert_eq!(fence_yaml("---\na: 1\n"), "```yml\n---\na: 1\n```\n");
    }

    #[test]
    fn test_fence_outgrows_embedded_backticks() {
        assert_eq!(fence_yaml("a: \"```\"\n"), "````yml\na: \"```\"\n````\n");
        assert_eq!(
            fence_yaml("a: \"`````\"\n"),
            "``````yml\na: \"`````\"\n``````\n"
        );
    }

    #[test]
    fn test_embedded_fence_keeps_manifest_intact() {
        let text = "---\nkind: ConfigMap\nnotes: |\n  ```\n  hi\n  ```\n  end\n";
        let lines = render_markdown(&fence_yaml(text));

        assert_eq!(texts(&lines), text.lines().collect::<Vec<_>>());
        assert_eq!(lines[3].spans[0].style, Style::String);
        assert_eq!(lines[6].spans[0].style, Style::String);
    }

    #[test]
    fn test_yaml_block_is_highlighted() {
        let lines = render_markdown(&fence_yaml("---\nkind: ConfigMap\n"));

        assert_eq!(texts(&lines), vec!["---", "kind: ConfigMap"]);
        assert_eq!(lines[0].spans[0].style, Style::Separator);
        assert_eq!(lines[1].spans[0].style, Style::Key);
    }

    #[test]
    fn test_empty_yaml_block() {
        assert!(render_markdown(&fence_yaml("")).is_empty());
    }

    #[test]
    fn test_other_code_block_is_plain_code() {
        let lines = render_markdown("```sh\nkubectl apply -f x\n```\n");
        assert_eq!(lines, vec![StyledLine::plain("kubectl apply -f x", Style::Code)]);
    }
}
