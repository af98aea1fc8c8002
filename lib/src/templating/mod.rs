pub mod minijinja;

use std::fmt::Debug;

use crate::error::Result;
use crate::taxonomy::Article;

/// Renders the navigation sidebar shared by every page of an article.
pub trait Engine: Send + Sync + Debug {
    fn render_sidebar(&self, article: &Article) -> Result<String>;
}
