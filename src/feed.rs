//! RSS/Atom feed parsing and keyword matching for digest mode.
//!
//! A deliberately small parser: it pulls title, link and description out of
//! `<item>` (RSS) and `<entry>` (Atom) elements and ignores everything else.
//! Feeds are one dialect or the other, never mixed, so both element names
//! are checked in a single pass.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("failed to fetch feed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("malformed feed XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// One discrete entry (article/post) parsed from a feed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    /// Item headline, trimmed; may be empty
    pub title: String,
    /// Article URL; may be empty when the feed omits it
    pub link: String,
    /// Item description or summary, trimmed; may be empty
    pub description: String,
}

/// Which child of the current item is being captured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Description,
    Summary,
}

/// Accumulates text for one `<item>`/`<entry>` until its end tag.
#[derive(Default)]
struct ItemDraft {
    title: String,
    link_text: String,
    link_href: Option<String>,
    description: Option<String>,
    summary: Option<String>,
}

impl ItemDraft {
    fn push(&mut self, field: Field, text: &str) {
        match field {
            Field::Title => self.title.push_str(text),
            Field::Link => self.link_text.push_str(text),
            Field::Description => {
                self.description.get_or_insert_with(String::new).push_str(text)
            }
            Field::Summary => self.summary.get_or_insert_with(String::new).push_str(text),
        }
    }

    /// Finalise the draft; `None` when the item carries no useful signal.
    fn finish(self) -> Option<FeedItem> {
        let title = self.title.trim().to_string();
        // Atom puts the URL in an href attribute, RSS in the element text
        let link = match self.link_href {
            Some(href) => href,
            None => self.link_text.trim().to_string(),
        };
        let description = self
            .description
            .or(self.summary)
            .map(|d| d.trim().to_string())
            .unwrap_or_default();

        if title.is_empty() && description.is_empty() {
            return None;
        }

        Some(FeedItem {
            title,
            link,
            description,
        })
    }
}

fn read_href(element: &BytesStart<'_>) -> Result<Option<String>, FeedError> {
    let attr = element
        .try_get_attribute("href")
        .map_err(quick_xml::Error::from)?;
    match attr {
        Some(attr) => {
            let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

/// Parse an RSS or Atom document into feed items, preserving document order.
///
/// Items where both title and description are empty are skipped.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedItem>, FeedError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut items = Vec::new();
    let mut draft: Option<ItemDraft> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"item" | b"entry" => {
                    draft = Some(ItemDraft::default());
                    field = None;
                }
                b"title" if draft.is_some() => field = Some(Field::Title),
                b"link" if draft.is_some() => {
                    if let Some(current) = draft.as_mut() {
                        if current.link_href.is_none() {
                            current.link_href = read_href(&e)?;
                        }
                    }
                    field = Some(Field::Link);
                }
                b"description" if draft.is_some() => field = Some(Field::Description),
                b"summary" if draft.is_some() => field = Some(Field::Summary),
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"link" {
                    if let Some(current) = draft.as_mut() {
                        if current.link_href.is_none() {
                            current.link_href = read_href(&e)?;
                        }
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if let (Some(current), Some(f)) = (draft.as_mut(), field) {
                    let text = t.unescape().map_err(quick_xml::Error::from)?;
                    current.push(f, &text);
                }
            }
            Ok(Event::CData(t)) => {
                if let (Some(current), Some(f)) = (draft.as_mut(), field) {
                    current.push(f, &String::from_utf8_lossy(&t));
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"item" | b"entry" => {
                    if let Some(finished) = draft.take().and_then(ItemDraft::finish) {
                        items.push(finished);
                    }
                    field = None;
                }
                b"title" | b"link" | b"description" | b"summary" => field = None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(items)
}

/// Fetch a feed URL and parse its items.
///
/// Non-2xx responses are fatal for this feed; the digest flow treats a
/// failed feed as a warning and moves on to the next one.
pub async fn fetch_feed_items(url: &str) -> Result<Vec<FeedItem>, FeedError> {
    let client = crate::scraper::create_client()?;

    let response = client.get(url).send().await?.error_for_status()?;
    let xml = response.text().await?;

    parse_feed(&xml)
}

/// Keep the items whose title or description contains `query`,
/// case-insensitively, preserving relative order.
///
/// The query is expected to be trimmed and non-empty; empty queries are
/// rejected upstream.
pub fn matching_items(query: &str, items: &[FeedItem]) -> Vec<FeedItem> {
    let query_lower = query.to_lowercase();
    items
        .iter()
        .filter(|item| {
            let haystack = format!("{} {}", item.title, item.description).to_lowercase();
            haystack.contains(&query_lower)
        })
        .cloned()
        .collect()
}
