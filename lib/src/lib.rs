#![doc = svgbobdoc::transform!(
//! Render directories of markdown articles into layout template fragments.
//!
//! # Overview
//!
//! Leaflet consumes an input root whose subdirectories are _articles_ and
//! whose markdown files are _pages_, and emits one layout fragment per page
//! for a downstream site assembler to pick up:
//!
//! ```svgbob
//!   input/                              output/
//!   +-- intro/          ---------->     +-- intro/
//!   |   +-- setup.md                    |   +-- setup.layout.tmpl
//!   |   +-- usage.md                    |   +-- usage.layout.tmpl
//!   +-- notes.txt       (ignored)       |
//!   +-- design/         ---------->     +-- design/
//!       +-- goals.md                        +-- goals.layout.tmpl
//!       +-- drafts/     (ignored)
//! ```
//!
//! In words, a build consists of:
//!
//!   * **Discovery**: every direct subdirectory of the input root becomes an
//!     [`Article`]. Every `*.md` file directly inside it becomes a [`Page`].
//!     Anything else is ignored.
//!
//!   * **Article processing**: the article's output directory is created, and
//!     the navigation sidebar is rendered _once_ from the sidebar template.
//!
//!   * **Page rendering**: each page's markdown is converted to HTML and
//!     wrapped, together with the shared sidebar, into a fragment of the form
//!
//!     ```text
//!     {{template "article-base" .}}
//!     {{define "main"}}
//!     <converted html>{{end}}{{define "sidebar"}}<sidebar>{{end}}
//!     ```
//!
//! ## Idempotence
//!
//! A page whose output file already exists is skipped without being read,
//! converted or written. Rerunning a build over the same output tree is
//! therefore cheap and never overwrites anything.
//!
//! ```no_run
//! # fn main() -> leaflet::error::Result<()> {
//! let articles = leaflet::build("content", "public/templates")?;
//! for article in &articles {
//!     println!("{}: {} pages", article.name, article.pages.len());
//! }
//! # Ok(())
//! # }
//! ```
)]

#[macro_use]
pub mod error;
pub mod util;
pub mod config;
pub mod listing;
pub mod markdown;
pub mod templating;
pub mod taxonomy;
pub mod build;

pub use taxonomy::*;
pub use build::{build, Builder};
