use pulldown_cmark::{Event, LinkType, Tag, TagEnd};
use pulldown_cmark_escape::{escape_href, escape_html};

use super::Plugin;
use crate::util::is_external_url;

/// Opens links to other sites in a new browsing context (`target="_blank"`).
#[derive(Default)]
pub struct ExternalLinks;

struct LinkIterator<I> {
    inner: I,
    rewritten: bool,
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for LinkIterator<I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let event = match self.inner.next()? {
            Event::Start(Tag::Link { link_type, dest_url, title, .. })
                if link_type != LinkType::Email && is_external_url(&dest_url) =>
            {
                // Links don't nest, so one flag pairs this with its end tag.
                self.rewritten = true;

                let mut html = String::from("<a href=\"");
                let _ = escape_href(&mut html, &dest_url);
                if !title.is_empty() {
                    html.push_str("\" title=\"");
                    let _ = escape_html(&mut html, &title);
                }

                html.push_str("\" target=\"_blank\">");
                Event::Html(html.into())
            }
            Event::End(TagEnd::Link) if self.rewritten => {
                self.rewritten = false;
                Event::Html("</a>".into())
            }
            event => event,
        };

        Some(event)
    }
}

impl Plugin for ExternalLinks {
    fn remap<'a, I>(&'a mut self, events: I) -> impl Iterator<Item = Event<'a>> + 'a
        where I: Iterator<Item = Event<'a>> + 'a
    {
        LinkIterator { inner: events, rewritten: false }
    }
}
