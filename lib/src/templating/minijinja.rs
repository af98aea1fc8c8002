use std::fs;
use std::sync::Arc;

use minijinja::{context, Environment, UndefinedBehavior};
use minijinja::value::{Rest, Value};

use crate::config::Settings;
use crate::error::{Chainable, ErrorKind, Result};
use crate::taxonomy::Article;
use crate::templating::Engine;

/// The built-in navigation template.
pub const NAVBAR: &str = include_str!("../../assets/navbar.html");

const SIDEBAR_TEMPLATE: &str = "sidebar.html";

/// A sidebar engine backed by a single, pre-parsed minijinja template.
///
/// Besides `article`, templates see the globals `root` (the link prefix) and
/// `G` (free-form settings), the filters `deslug` and `slugify`, and the
/// function `join(segments...)` which builds a link below `root`.
#[derive(Debug)]
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Parses `source` as the sidebar template. Fails with
    /// [`ErrorKind::TemplateParse`] if it is blank or malformed.
    pub fn new(source: impl Into<String>, settings: &Settings) -> Result<Self> {
        let source = source.into();
        if source.trim().is_empty() {
            return Err(error!("sidebar template is empty").with_kind(ErrorKind::TemplateParse));
        }

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template_owned(SIDEBAR_TEMPLATE, source)
            .chain(error!("failed to parse sidebar template"))
            .with_kind(ErrorKind::TemplateParse)?;

        let root: Arc<str> = settings.root.as_str().into();
        env.add_global("root", Value::from(root.to_string()));
        env.add_global("G", Value::from_serializable(&settings.globals));
        env.add_function("join", move |segments: Rest<Arc<str>>| {
            Value::from_safe_string(ext::join(&root, &segments))
        });
        env.add_filter("deslug", ext::deslug);
        env.add_filter("slugify", ext::slugify);

        Ok(MiniJinjaEngine { env })
    }

    /// The built-in template.
    pub fn builtin(settings: &Settings) -> Result<Self> {
        MiniJinjaEngine::new(NAVBAR, settings)
    }

    /// The template named by `settings.sidebar`, or the built-in one.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let Some(path) = &settings.sidebar else {
            return MiniJinjaEngine::builtin(settings);
        };

        let source = fs::read_to_string(path)
            .chain_with(|| error! {
                "failed to read sidebar template",
                "path" => path.display(),
            })
            .with_kind(ErrorKind::Config)?;

        MiniJinjaEngine::new(source, settings)
            .chain_with(|| error! {
                "invalid sidebar template",
                "path" => path.display(),
            })
    }
}

impl Engine for MiniJinjaEngine {
    fn render_sidebar(&self, article: &Article) -> Result<String> {
        let template = self.env.get_template(SIDEBAR_TEMPLATE)
            .with_kind(ErrorKind::TemplateParse)?;

        template.render(context! { article => article })
            .chain_with(|| error! {
                "failed to render sidebar",
                "article" => &article.name,
            })
            .with_kind(ErrorKind::TemplateExec)
    }
}

mod ext {
    use std::sync::Arc;

    use minijinja::value::Rest;
    use pulldown_cmark_escape::escape_href;

    /// Joins `segments` below `root` with single slashes. The result is
    /// percent-encoded and safe to place in an attribute.
    pub fn join(root: &str, segments: &Rest<Arc<str>>) -> String {
        let mut url = root.trim_end_matches('/').to_string();
        for segment in segments.iter() {
            let segment = segment.trim_matches('/');
            if !segment.is_empty() {
                url.push('/');
                url.push_str(segment);
            }
        }

        if url.is_empty() {
            url.push('/');
        }

        let mut escaped = String::with_capacity(url.len());
        let _ = escape_href(&mut escaped, &url);
        escaped
    }

    pub fn deslug(value: &str) -> String {
        crate::util::deslug(value)
    }

    pub fn slugify(value: &str) -> String {
        crate::util::slugify(value)
    }
}
