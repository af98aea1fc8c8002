use std::fmt::Debug;

use pulldown_cmark::{html, Options, Parser};

use crate::markdown::{AutoHeading, ExternalLinks, Plugin};

/// Converts markdown source into an HTML fragment.
pub trait Converter: Send + Sync + Debug {
    fn to_html(&self, markdown: &str) -> String;
}

/// The stock converter: CommonMark plus tables, footnotes, strikethrough, task
/// lists, heading attributes and smart punctuation. Headings get slug ids and
/// off-site links open in a new tab.
#[derive(Debug, Clone)]
pub struct Markdown {
    options: Options,
}

impl Markdown {
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_HEADING_ATTRIBUTES
                | Options::ENABLE_SMART_PUNCTUATION,
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}

impl Default for Markdown {
    fn default() -> Self {
        Markdown::new()
    }
}

impl Converter for Markdown {
    fn to_html(&self, markdown: &str) -> String {
        let mut headings = AutoHeading::default();
        let mut links = ExternalLinks;

        let parser = Parser::new_ext(markdown, self.options);
        let events = links.remap(headings.remap(parser));

        let mut html_output = String::with_capacity(markdown.len() + markdown.len() / 2);
        html::push_html(&mut html_output, events);
        html_output
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(markdown: &str) -> String {
        Markdown::new().to_html(markdown)
    }

    #[test]
    fn headings_get_slug_ids() {
        assert_eq!(render("# Hi"), "<h1 id=\"hi\">Hi</h1>\n");
        assert_eq!(render("## Getting `Started` Now"),
            "<h2 id=\"getting-started-now\">Getting <code>Started</code> Now</h2>\n");
    }

    #[test]
    fn duplicate_headings_are_numbered() {
        let html = render("# Notes\n\n# Notes\n\n# Notes\n");
        assert_eq!(html, concat!(
            "<h1 id=\"notes\">Notes</h1>\n",
            "<h1 id=\"notes-1\">Notes</h1>\n",
            "<h1 id=\"notes-2\">Notes</h1>\n",
        ));
    }

    #[test]
    fn numbered_ids_never_collide() {
        let html = render("# A\n\n# A-1\n\n# A\n");
        assert_eq!(html, concat!(
            "<h1 id=\"a\">A</h1>\n",
            "<h1 id=\"a-1\">A-1</h1>\n",
            "<h1 id=\"a-2\">A</h1>\n",
        ));
    }

    #[test]
    fn explicit_ids_are_reserved() {
        let html = render("# Intro {#setup}\n\n# Setup\n\n# Setup\n");
        assert_eq!(html, concat!(
            "<h1 id=\"setup\">Intro</h1>\n",
            "<h1 id=\"setup-1\">Setup</h1>\n",
            "<h1 id=\"setup-2\">Setup</h1>\n",
        ));
    }

    #[test]
    fn whitespace_separates_words_in_ids() {
        assert_eq!(render("# Foo\tBar"), "<h1 id=\"foo-bar\">Foo\tBar</h1>\n");
    }

    #[test]
    fn explicit_heading_ids_are_kept() {
        assert_eq!(render("# Intro {#start}"), "<h1 id=\"start\">Intro</h1>\n");
    }

    #[test]
    fn paragraphs() {
        assert_eq!(render("plain text"), "<p>plain text</p>\n");
    }

    #[test]
    fn external_links_open_in_new_tab() {
        assert_eq!(
            render("[site](https://example.com)"),
            "<p><a href=\"https://example.com\" target=\"_blank\">site</a></p>\n"
        );

        assert_eq!(
            render("[site](https://example.com \"Home\")"),
            "<p><a href=\"https://example.com\" title=\"Home\" target=\"_blank\">site</a></p>\n"
        );
    }

    #[test]
    fn local_links_are_untouched() {
        assert_eq!(render("[setup](/intro/setup)"), "<p><a href=\"/intro/setup\">setup</a></p>\n");
    }

    #[test]
    fn extensions_are_enabled() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));

        let html = render("~~gone~~");
        assert_eq!(html, "<p><del>gone</del></p>\n");

        let html = render("- [x] done\n");
        assert!(html.contains("checkbox"));
    }
}
