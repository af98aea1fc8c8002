use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Chainable, ErrorKind, Result};
use crate::markdown::Converter;

/// Extension of markdown sources.
pub const SOURCE_EXT: &str = "md";

/// Suffix of rendered layout fragments.
pub const OUTPUT_SUFFIX: &str = ".layout.tmpl";

/// Opens the main content block inside the base article layout.
pub const MAIN_OPEN: &str = "{{template \"article-base\" .}}\n{{define \"main\"}}\n";

/// Closes the main content block and opens the sidebar block.
pub const SIDEBAR_OPEN: &str = "{{end}}{{define \"sidebar\"}}";

/// Closes the sidebar block.
pub const SIDEBAR_CLOSE: &str = "{{end}}";

/// One markdown file of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// The file name without `.md`.
    pub name: String,
    /// The article's input directory.
    pub input: PathBuf,
    /// The article's output directory.
    pub output: PathBuf,
}

/// What [`Page::render()`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendered {
    /// The fragment was converted and written.
    Written,
    /// The fragment already existed; nothing was read or written.
    Skipped,
}

impl Page {
    pub fn new(name: impl Into<String>, input: PathBuf, output: PathBuf) -> Self {
        Page { name: name.into(), input, output }
    }

    /// `<input>/<name>.md`
    pub fn source_path(&self) -> PathBuf {
        self.input.join(format!("{}.{SOURCE_EXT}", self.name))
    }

    /// `<output>/<name>.layout.tmpl`
    pub fn target_path(&self) -> PathBuf {
        self.output.join(format!("{}{OUTPUT_SUFFIX}", self.name))
    }

    /// Renders this page into its layout fragment unless the fragment already
    /// exists.
    ///
    /// The output file is created exclusively, so concurrent renders of the
    /// same page write it at most once; the loser reports `Skipped`.
    pub fn render(&self, converter: &dyn Converter, sidebar: &str) -> Result<Rendered> {
        let target = self.target_path();
        if target.exists() {
            tracing::debug!(page = %self.name, target = %target.display(), "already rendered");
            return Ok(Rendered::Skipped);
        }

        let source = self.source_path();
        let markdown = fs::read(&source)
            .chain_with(|| error! {
                "failed to read page source",
                "path" => source.display(),
            })
            .with_kind(ErrorKind::SourceRead)?;

        let html = converter.to_html(&String::from_utf8_lossy(&markdown));
        let fragment = assemble(&html, sidebar);

        let rendered = write_new(&target, fragment.as_bytes())
            .chain_with(|| error! {
                "failed to write rendered page",
                "path" => target.display(),
            })
            .with_kind(ErrorKind::OutputWrite)?;

        if rendered == Rendered::Written {
            tracing::debug!(page = %self.name, target = %target.display(), "rendered");
        }

        Ok(rendered)
    }
}

/// Wraps converted page HTML and the article sidebar into a layout fragment.
pub fn assemble(html: &str, sidebar: &str) -> String {
    let len = MAIN_OPEN.len() + html.len() + SIDEBAR_OPEN.len() + sidebar.len() + SIDEBAR_CLOSE.len();
    let mut fragment = String::with_capacity(len);
    fragment.push_str(MAIN_OPEN);
    fragment.push_str(html);
    fragment.push_str(SIDEBAR_OPEN);
    fragment.push_str(sidebar);
    fragment.push_str(SIDEBAR_CLOSE);
    fragment
}

fn write_new(path: &Path, contents: &[u8]) -> io::Result<Rendered> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(Rendered::Skipped),
        Err(e) => return Err(e),
    };

    // Don't leave a truncated fragment behind: it would be skipped forever.
    if let Err(e) = file.write_all(contents).and_then(|_| file.flush()) {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(e);
    }

    Ok(Rendered::Written)
}
