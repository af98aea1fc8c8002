use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::error::{Chainable, Result};
use crate::listing::{DirectoryLister, FsLister};
use crate::markdown::{Converter, Markdown};
use crate::taxonomy::{Article, Tally};
use crate::templating::Engine;
use crate::templating::minijinja::MiniJinjaEngine;

/// Drives a build: discovers articles below an input root and renders each
/// into the matching directory below an output root.
#[derive(Debug, Clone)]
pub struct Builder {
    pub lister: Arc<dyn DirectoryLister>,
    pub engine: Arc<dyn Engine>,
    pub converter: Arc<dyn Converter>,
    pub parallel: bool,
}

/// Renders every article below `input` into `output` with default settings.
///
/// See [`Builder::build()`].
pub fn build<I, O>(input: I, output: O) -> Result<Vec<Article>>
    where I: AsRef<Path>, O: AsRef<Path>
{
    Builder::new(&Settings::default())?.build(input, output)
}

impl Builder {
    /// A builder reading the real file system, converting with [`Markdown`]
    /// and rendering sidebars with the template selected by `settings`.
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Builder {
            lister: Arc::new(FsLister),
            engine: Arc::new(MiniJinjaEngine::from_settings(settings)?),
            converter: Arc::new(Markdown::new()),
            parallel: settings.parallel,
        })
    }

    pub fn with_lister<L: DirectoryLister + 'static>(mut self, lister: L) -> Self {
        self.lister = Arc::new(lister);
        self
    }

    pub fn with_engine<E: Engine + 'static>(mut self, engine: E) -> Self {
        self.engine = Arc::new(engine);
        self
    }

    pub fn with_converter<C: Converter + 'static>(mut self, converter: C) -> Self {
        self.converter = Arc::new(converter);
        self
    }

    /// Renders every article below `input` into `output`.
    ///
    /// Each direct subdirectory of `input` is an article; any other entry is
    /// ignored. Articles are processed one at a time in name order, and each
    /// is fully rendered before the next is listed. The first failure stops
    /// the build; files written up to that point are kept.
    ///
    /// Returns the discovered articles.
    pub fn build<I, O>(&self, input: I, output: O) -> Result<Vec<Article>>
        where I: AsRef<Path>, O: AsRef<Path>
    {
        let (input, output) = (input.as_ref(), output.as_ref());
        let start = Instant::now();

        let entries = self.lister.list(input)
            .chain_with(|| error! {
                "failed to discover articles",
                "input" => input.display(),
            })?;

        let mut total = Tally::default();
        let mut articles = vec![];
        for entry in entries.into_iter().filter(|entry| entry.is_dir) {
            let article = Article::enumerate(&*self.lister, input, output, &entry.file_name)?;
            let tally = article.render(&*self.engine, &*self.converter, self.parallel)?;
            tracing::info!(
                article = %article.name,
                written = tally.written,
                skipped = tally.skipped,
                "rendered article"
            );

            total.written += tally.written;
            total.skipped += tally.skipped;
            articles.push(article);
        }

        tracing::info!(
            articles = articles.len(),
            written = total.written,
            skipped = total.skipped,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "build finished"
        );

        Ok(articles)
    }
}
