//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::action::ActionRequest;
use crate::core::dom::{Display, Document, Element, ElementKey};
use crate::core::outcome::ActionResult;
use crate::core::state::PageState;
use crate::transport::{Transport, TransportError};

/// Answers requests from a queue of canned results; `{"status":"ok"}` once it runs dry.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<ActionResult, TransportError>>>,
    calls: Mutex<Vec<ActionRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: Result<ActionResult, TransportError>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Paths posted so far, in order.
    pub fn paths(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.path.clone())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn post(&self, request: &ActionRequest) -> Result<ActionResult, TransportError> {
        self.calls.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ActionResult::ok()))
    }
}

/// Keys of the interesting elements on [`moderation_page`].
pub struct ModerationPage {
    pub revoke_invite: ElementKey,
    pub accept_invite: ElementKey,
    pub refuse_invite: ElementKey,
    pub remove_mod: ElementKey,
    pub revoke_ban: ElementKey,
    pub subscribe_icon: ElementKey,
    pub post_toggle: ElementKey,
    pub post_type_value: ElementKey,
    pub ban_expires: ElementKey,
    pub ban_expires_data: ElementKey,
    pub ban_timepick: ElementKey,
    pub image_expando: ElementKey,
}

/// A community moderation page for `news` with one of every control,
/// a link-post form and a two-post listing.
pub fn moderation_page() -> (PageState, ModerationPage) {
    let mut doc = Document::new();
    let root = doc.root();
    fn add(doc: &mut Document, parent: ElementKey, element: Element) -> ElementKey {
        doc.append(parent, element).unwrap()
    }

    let mods = add(&mut doc, root, Element::new("ul").with_id("mods"));
    let revoke_invite = add(
        &mut doc,
        mods,
        Element::new("a")
            .with_class("revoke-mod2inv")
            .with_data("user", "carol")
            .with_data("sub", "news"),
    );
    let accept_invite = add(
        &mut doc,
        mods,
        Element::new("button")
            .with_id("accept-mod2-inv")
            .with_data("user", "alice")
            .with_data("sub", "news"),
    );
    let refuse_invite = add(
        &mut doc,
        mods,
        Element::new("button")
            .with_id("refuse-mod2-inv")
            .with_data("user", "alice")
            .with_data("sub", "news"),
    );
    let remove_mod = add(
        &mut doc,
        mods,
        Element::new("a")
            .with_class("revoke-mod2")
            .with_data("user", "bob")
            .with_data("sub", "news")
            .with_label("remove"),
    );
    let revoke_ban = add(
        &mut doc,
        mods,
        Element::new("a")
            .with_class("revoke-ban")
            .with_data("user", "mallory")
            .with_data("sub", "news"),
    );

    let sub_row = add(&mut doc, root, Element::new("div").with_data("sid", "17"));
    let subscribe = add(
        &mut doc,
        sub_row,
        Element::new("button").with_class("sub").with_data("ac", "subscribe"),
    );
    let subscribe_icon = add(&mut doc, subscribe, Element::new("i"));

    let form = add(&mut doc, root, Element::new("form"));
    let post_type_value = add(
        &mut doc,
        form,
        Element::new("input").with_id("ptypeval").with_attr("type", "hidden").with_value("link"),
    );
    add(&mut doc, form, Element::new("span").with_id("ptype").with_label("link"));
    let post_toggle = add(
        &mut doc,
        form,
        Element::new("button").with_id("ptoggle").with_label("Change to text post"),
    );
    let link_group = add(&mut doc, form, Element::new("div").with_class("lncont").with_display(Display::Block));
    add(
        &mut doc,
        link_group,
        Element::new("input").with_id("link").with_attr("required", ""),
    );
    add(&mut doc, form, Element::new("div").with_class("txcont").with_display(Display::None));

    let ban_form = add(&mut doc, root, Element::new("form"));
    let ban_timepick = add(
        &mut doc,
        ban_form,
        Element::new("select").with_id("ban_timepick").with_value("ban_temp"),
    );
    let ban_expires = add(
        &mut doc,
        ban_form,
        Element::new("input").with_id("ban_expires").with_display(Display::InlineBlock),
    );
    let ban_expires_data = add(
        &mut doc,
        ban_form,
        Element::new("input").with_id("ban_expires_data").with_attr("type", "hidden"),
    );

    let listing = add(&mut doc, root, Element::new("div").with_class("alldaposts"));
    let image_post = add(&mut doc, listing, Element::new("div").with_class("post"));
    let image_expando = add(
        &mut doc,
        image_post,
        Element::new("a").with_class("expando-btn").with_data("icon", "image"),
    );
    let video_post = add(&mut doc, listing, Element::new("div").with_class("post"));
    add(
        &mut doc,
        video_post,
        Element::new("a").with_class("expando-btn").with_data("icon", "video"),
    );

    let page = ModerationPage {
        revoke_invite,
        accept_invite,
        refuse_invite,
        remove_mod,
        revoke_ban,
        subscribe_icon,
        post_toggle,
        post_type_value,
        ban_expires,
        ban_expires_data,
        ban_timepick,
        image_expando,
    };
    (PageState::new(doc, "/s/news/mods"), page)
}
