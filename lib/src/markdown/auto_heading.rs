use std::collections::VecDeque;
use std::fmt::Write;

use pulldown_cmark::{Event, Tag, TagEnd};
use rustc_hash::FxHashMap;

use super::Plugin;

/// Assigns a slug `id` to every heading that doesn't carry one.
///
/// Repeated slugs within one document are suffixed `-1`, `-2`, and so on,
/// skipping any id already taken by an earlier heading, explicit or not.
#[derive(Default)]
pub struct AutoHeading {
    seen: FxHashMap<String, usize>,
}

struct HeadingIterator<'a, 's, I: Iterator<Item = Event<'a>>> {
    stack: VecDeque<Event<'a>>,
    seen: &'s mut FxHashMap<String, usize>,
    inner: I,
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for HeadingIterator<'a, '_, I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.stack.pop_front() {
            return Some(event);
        }

        match self.inner.next()? {
            Event::Start(Tag::Heading { level, id: None, classes, attrs }) => {
                let mut text = String::new();
                loop {
                    let event = self.inner.next()?;
                    if let Event::Text(ref s) | Event::Code(ref s) = event {
                        text.push_str(s);
                    } else if let Event::End(TagEnd::Heading(..)) = event {
                        break;
                    }

                    self.stack.push_back(event);
                }

                let slug = crate::util::slugify(&text);
                let id = if slug.is_empty() {
                    None
                } else {
                    Some(claim(self.seen, slug).into())
                };

                self.stack.push_back(Event::End(TagEnd::Heading(level)));
                Some(Event::Start(Tag::Heading { level, id, classes, attrs }))
            },
            Event::Start(Tag::Heading { level, id: Some(id), classes, attrs }) => {
                self.seen.entry(id.to_string()).or_insert(1);
                Some(Event::Start(Tag::Heading { level, id: Some(id), classes, attrs }))
            },
            event => Some(event)
        }
    }
}

/// Returns `slug` if no heading uses it yet, otherwise the first free
/// `slug-N`, and marks the result as used.
fn claim(seen: &mut FxHashMap<String, usize>, slug: String) -> String {
    let Some(&next) = seen.get(&slug) else {
        seen.insert(slug.clone(), 1);
        return slug;
    };

    let mut count = next;
    let mut id = String::with_capacity(slug.len() + 2);
    loop {
        id.clear();
        let _ = write!(&mut id, "{slug}-{count}");
        count += 1;
        if !seen.contains_key(&id) {
            break;
        }
    }

    seen.insert(slug, count);
    seen.insert(id.clone(), 1);
    id
}

impl Plugin for AutoHeading {
    fn remap<'a, I>(&'a mut self, events: I) -> impl Iterator<Item = Event<'a>> + 'a
        where I: Iterator<Item = Event<'a>> + 'a
    {
        HeadingIterator {
            seen: &mut self.seen,
            inner: events,
            stack: VecDeque::with_capacity(4),
        }
    }
}
