//! Shift+X on a post listing opens every image expando at once.

use super::dom::Document;
use super::event::{Event, KeyPress};
use super::selector::SelectorList;

/// `which` code for X.
pub const EXPAND_KEY: u32 = 88;

const LISTING: &str = ".alldaposts";
const POST: &str = "div.post";
const EXPANDO: &str = ".expando-btn";

pub fn is_expand_shortcut(key: &KeyPress) -> bool {
    key.shift && key.code == EXPAND_KEY
}

/// Clicks to synthesize for an expand-all: the first expando button of each
/// post, when it is an image expando. Empty off listing pages.
pub fn expand_all_clicks(doc: &Document) -> Vec<Event> {
    let (Ok(listing), Ok(post), Ok(expando)) = (
        SelectorList::parse(LISTING),
        SelectorList::parse(POST),
        SelectorList::parse(EXPANDO),
    ) else {
        return Vec::new();
    };
    if doc.query(&listing).is_none() {
        return Vec::new();
    }

    doc.query_all(&post)
        .into_iter()
        .filter_map(|p| doc.query_within(p, &expando).into_iter().next())
        .filter(|button| doc.data(*button, "icon") == Some("image"))
        .map(Event::click)
        .collect()
}
