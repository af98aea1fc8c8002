use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Chainable, ErrorKind, Result};
use crate::listing::DirectoryLister;
use crate::markdown::Converter;
use crate::taxonomy::{Page, Rendered, SOURCE_EXT};
use crate::templating::Engine;

/// A directory of pages directly below the input root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    /// The directory's name.
    pub name: String,
    /// `<input root>/<name>`
    pub input: PathBuf,
    /// `<output root>/<name>`
    pub output: PathBuf,
    /// Pages in file name order.
    pub pages: Vec<Page>,
}

/// How many pages of an article were written and skipped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub written: usize,
    pub skipped: usize,
}

impl Article {
    /// Lists `<input_root>/<name>` and collects its markdown files as pages.
    ///
    /// Only non-directory entries named `<page>.md` with a non-empty `<page>`
    /// count; everything else, including nested directories, is ignored.
    pub fn enumerate(
        lister: &dyn DirectoryLister,
        input_root: &Path,
        output_root: &Path,
        name: &str,
    ) -> Result<Article> {
        let input = input_root.join(name);
        let output = output_root.join(name);
        let pages = lister.list(&input)
            .chain_with(|| error! {
                "failed to enumerate article pages",
                "article" => name,
            })?
            .into_iter()
            .filter(|entry| !entry.is_dir)
            .filter(|entry| entry.file_ext() == Some(SOURCE_EXT) && !entry.file_stem().is_empty())
            .map(|entry| Page::new(entry.file_stem(), input.clone(), output.clone()))
            .collect();

        Ok(Article { name: name.into(), input, output, pages })
    }

    /// Renders every page of this article.
    ///
    /// Creates the output directory, renders the sidebar once, then renders
    /// each page against it. Already rendered pages are counted as skipped.
    /// The first failure aborts the article.
    pub fn render(
        &self,
        engine: &dyn Engine,
        converter: &dyn Converter,
        parallel: bool,
    ) -> Result<Tally> {
        fs::create_dir_all(&self.output)
            .chain_with(|| error! {
                "failed to create article output directory",
                "article" => &self.name,
                "path" => self.output.display(),
            })
            .with_kind(ErrorKind::DirectoryCreation)?;

        let sidebar = engine.render_sidebar(self)?;
        let render = |page: &Page| page.render(converter, &sidebar)
            .chain_with(|| error! {
                "failed to render page",
                "article" => &self.name,
                "page" => &page.name,
            });

        let outcomes: Vec<Rendered> = if parallel {
            self.pages.par_iter().map(render).collect::<Result<_>>()?
        } else {
            self.pages.iter().map(render).collect::<Result<_>>()?
        };

        let mut tally = Tally::default();
        for outcome in outcomes {
            match outcome {
                Rendered::Written => tally.written += 1,
                Rendered::Skipped => tally.skipped += 1,
            }
        }

        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::Settings;
    use crate::listing::{FsLister, Listing, MemoryLister};
    use crate::markdown::Markdown;
    use crate::templating::minijinja::MiniJinjaEngine;

    static_assertions::assert_impl_all!(Article: Send, Sync);
    static_assertions::assert_impl_all!(Page: Send, Sync);

    #[derive(Debug, Default)]
    struct CountingEngine(AtomicUsize);

    impl Engine for CountingEngine {
        fn render_sidebar(&self, article: &Article) -> Result<String> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(format!("<nav>{}</nav>", article.name))
        }
    }

    #[test]
    fn enumerate_keeps_only_markdown_files() {
        let lister = MemoryLister::new().with_dir("in/foo", [
            Listing::file("baz.md"),
            Listing::file("bar.md"),
            Listing::file("notes.txt"),
            Listing::file(".md"),
            Listing::file("README"),
            Listing::dir("drafts"),
            Listing::dir("nested.md"),
        ]);

        let article = Article::enumerate(&lister, Path::new("in"), Path::new("out"), "foo").unwrap();
        assert_eq!(article.name, "foo");
        assert_eq!(article.input, Path::new("in/foo"));
        assert_eq!(article.output, Path::new("out/foo"));
        assert_eq!(article.pages, vec![
            Page::new("bar", "in/foo".into(), "out/foo".into()),
            Page::new("baz", "in/foo".into(), "out/foo".into()),
        ]);
    }

    #[test]
    fn enumerate_fails_when_directory_cannot_be_listed() {
        let lister = MemoryLister::new();
        let error = Article::enumerate(&lister, Path::new("in"), Path::new("out"), "foo").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Discovery);
    }

    #[test]
    fn render_builds_sidebar_once_and_tallies() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (input, output) = (temp_dir.path().join("in"), temp_dir.path().join("out"));
        fs::create_dir_all(input.join("foo")).unwrap();
        fs::write(input.join("foo/bar.md"), "# Hi").unwrap();
        fs::write(input.join("foo/baz.md"), "plain text").unwrap();

        let article = Article::enumerate(&FsLister, &input, &output, "foo").unwrap();
        let engine = CountingEngine::default();
        let tally = article.render(&engine, &Markdown::new(), false).unwrap();

        assert_eq!(tally, Tally { written: 2, skipped: 0 });
        assert_eq!(engine.0.load(Ordering::SeqCst), 1);

        let bar = fs::read_to_string(output.join("foo/bar.layout.tmpl")).unwrap();
        let baz = fs::read_to_string(output.join("foo/baz.layout.tmpl")).unwrap();
        assert!(bar.ends_with("{{define \"sidebar\"}}<nav>foo</nav>{{end}}"));
        assert!(baz.ends_with("{{define \"sidebar\"}}<nav>foo</nav>{{end}}"));

        let tally = article.render(&engine, &Markdown::new(), false).unwrap();
        assert_eq!(tally, Tally { written: 0, skipped: 2 });
    }

    #[test]
    fn render_in_parallel() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (input, output) = (temp_dir.path().join("in"), temp_dir.path().join("out"));
        fs::create_dir_all(input.join("many")).unwrap();
        for i in 0..32 {
            fs::write(input.join(format!("many/page-{i}.md")), format!("# Page {i}")).unwrap();
        }

        let article = Article::enumerate(&FsLister, &input, &output, "many").unwrap();
        let engine = MiniJinjaEngine::builtin(&Settings::default()).unwrap();
        let tally = article.render(&engine, &Markdown::new(), true).unwrap();
        assert_eq!(tally, Tally { written: 32, skipped: 0 });

        let page = fs::read_to_string(output.join("many/page-7.layout.tmpl")).unwrap();
        assert!(page.contains("<h1 id=\"page-7\">Page 7</h1>"));
        assert!(page.contains("<a href=\"/many/page-31\">page 31</a>"));
    }

    #[test]
    fn page_errors_abort_with_their_kind() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (input, output) = (temp_dir.path().join("in"), temp_dir.path().join("out"));

        // Enumerated, but the source disappears before rendering.
        let lister = MemoryLister::new().with_dir(input.join("foo"), [Listing::file("gone.md")]);
        let article = Article::enumerate(&lister, &input, &output, "foo").unwrap();

        let error = article.render(&CountingEngine::default(), &Markdown::new(), false).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::SourceRead);
        assert!(error.to_string().starts_with("failed to render page"));
    }

    #[test]
    fn sidebar_failures_abort_before_any_page() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (input, output) = (temp_dir.path().join("in"), temp_dir.path().join("out"));
        fs::create_dir_all(input.join("foo")).unwrap();
        fs::write(input.join("foo/bar.md"), "# Hi").unwrap();

        let article = Article::enumerate(&FsLister, &input, &output, "foo").unwrap();
        let engine = MiniJinjaEngine::new("{{ article.missing.field }}", &Settings::default()).unwrap();
        let error = article.render(&engine, &Markdown::new(), false).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::TemplateExec);
        assert!(output.join("foo").is_dir());
        assert!(!output.join("foo/bar.layout.tmpl").exists());
    }

    #[test]
    fn output_directory_failure_is_fatal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output = temp_dir.path().join("out");
        // A file where the output root should be.
        fs::write(&output, "").unwrap();

        let article = Article {
            name: "foo".into(),
            input: temp_dir.path().join("in/foo"),
            output: output.join("foo"),
            pages: vec![],
        };

        let error = article.render(&CountingEngine::default(), &Markdown::new(), false).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DirectoryCreation);
    }
}
