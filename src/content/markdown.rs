//! Markdown rendering and excerpt extraction

use pulldown_cmark::{html, Options, Parser};

use crate::helpers::{strip_html, truncate_words, unescape_html};

/// Marker separating a hand-written excerpt from the rest of a post
pub const MORE_MARKER: &str = "<!-- more -->";

/// Markdown renderer used to derive post summaries
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        // Front-matter is stripped before rendering, so no metadata blocks
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_SMART_PUNCTUATION;
        Self { options }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, parser);
        html_output
    }

    /// Plain-text summary of a post body
    ///
    /// Text before `<!-- more -->` is used in full when present; otherwise
    /// the rendered body is cut to `words` words and `more` is appended.
    pub fn excerpt(&self, body: &str, words: usize, more: &str) -> Option<String> {
        let (manual, full) = Self::split_excerpt(body);

        let text = match manual {
            Some(manual) => truncate_words(&self.plain_text(&manual), usize::MAX, ""),
            None => truncate_words(&self.plain_text(&full), words, more),
        };

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn plain_text(&self, markdown: &str) -> String {
        unescape_html(&strip_html(&self.render(markdown)))
    }

    /// Split content at `<!-- more -->` into (excerpt, full body)
    pub fn split_excerpt(content: &str) -> (Option<String>, String) {
        match content.split_once(MORE_MARKER) {
            Some((excerpt, rest)) => {
                let excerpt = excerpt.trim().to_string();
                let full = format!("{}\n\n{}", excerpt, rest.trim());
                (Some(excerpt), full)
            }
            None => (None, content.to_string()),
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}
