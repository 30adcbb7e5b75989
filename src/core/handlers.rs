//! # Moderation Panel Bindings
//!
//! The selectors the page templates expose and what each one does:
//!
//! | selector                                        | event   | behaviour                      |
//! |-------------------------------------------------|---------|--------------------------------|
//! | `.revoke-mod2inv`                               | click   | revoke invite, reload          |
//! | `#accept-mod2-inv`                              | click   | accept invite, reload          |
//! | `#refuse-mod2-inv`                              | click   | refuse invite, reload          |
//! | `.revoke-mod2`                                  | click   | confirm, remove mod, resign-aware |
//! | `.revoke-ban`                                   | click   | lift ban, reload               |
//! | `#ptoggle`                                      | click   | text/link post toggle          |
//! | `button.blk,button.unblk,button.sub,button.unsub` | click | `data-ac` verb on parent `data-sid` |
//! | `#ban_expires`                                  | input   | recompute expiry timestamp     |
//! | `#ban_timepick`                                 | change  | clear expiry, show/hide date   |
//! | window                                          | keydown | Shift+X expands image posts    |

use log::{debug, info};

use super::action::{Effect, ModAction};
use super::ban;
use super::confirm::GateDecision;
use super::event::EventKind;
use super::expand;
use super::registry::{Dispatcher, HandlerResult, Trigger};
use super::selector::SelectorError;
use super::state::PageState;

/// Registers every panel binding on `dispatcher`. Request paths start with `prefix`.
pub fn register_all(dispatcher: &mut Dispatcher, prefix: &str) -> Result<(), SelectorError> {
    let posts = [
        (".revoke-mod2inv", ModAction::RevokeModInvite),
        ("#accept-mod2-inv", ModAction::AcceptModInvite),
        ("#refuse-mod2-inv", ModAction::RefuseModInvite),
        (".revoke-ban", ModAction::RemoveSubBan),
        ("button.blk,button.unblk,button.sub,button.unsub", ModAction::Subscription),
    ];
    for (selector, action) in posts {
        let prefix = prefix.to_string();
        dispatcher.register(selector, EventKind::Click, move |state, trigger| {
            post(state, trigger, action, &prefix)
        })?;
    }

    let prefix = prefix.to_string();
    dispatcher.register(".revoke-mod2", EventKind::Click, move |state, trigger| {
        remove_mod(state, trigger, &prefix)
    })?;
    dispatcher.register("#ptoggle", EventKind::Click, toggle_post_type)?;
    dispatcher.register(&format!("#{}", ban::EXPIRES_FIELD_ID), EventKind::Input, |state, _| {
        ban::refresh_expiry(&mut state.document);
        Ok(None)
    })?;
    dispatcher.register(&format!("#{}", ban::TIMING_CONTROL_ID), EventKind::Change, ban_timing)?;
    dispatcher.register_window(EventKind::KeyDown, expand_all);
    Ok(())
}

fn post(state: &mut PageState, trigger: &Trigger<'_>, action: ModAction, prefix: &str) -> HandlerResult {
    let element = trigger.element()?;
    let effect = Effect::post(action, &state.document, element, prefix)?;
    info!("Queued {:?}", action);
    Ok(Some(effect))
}

fn remove_mod(state: &mut PageState, trigger: &Trigger<'_>, prefix: &str) -> HandlerResult {
    let element = trigger.element()?;
    // Identifiers first, so a page missing them never arms the control.
    let effect = Effect::post(ModAction::RemoveMod, &state.document, element, prefix)?;
    match state.gate.trigger(&mut state.document, element)? {
        GateDecision::Armed => Ok(None),
        GateDecision::Fire => {
            info!("Queued {:?}", ModAction::RemoveMod);
            Ok(Some(effect))
        }
    }
}

fn toggle_post_type(state: &mut PageState, trigger: &Trigger<'_>) -> HandlerResult {
    let control = trigger.element()?;
    state.toggle.toggle(&mut state.document, control)?;
    Ok(None)
}

fn ban_timing(state: &mut PageState, trigger: &Trigger<'_>) -> HandlerResult {
    let control = trigger.element()?;
    let mode = state
        .document
        .get(control)
        .map(|e| e.value.clone())
        .unwrap_or_default();
    ban::timing_changed(&mut state.document, &mode);
    Ok(None)
}

fn expand_all(state: &mut PageState, trigger: &Trigger<'_>) -> HandlerResult {
    let Some(key) = trigger.event.key else {
        return Ok(None);
    };
    if !expand::is_expand_shortcut(&key) {
        return Ok(None);
    }
    let clicks = expand::expand_all_clicks(&state.document);
    if clicks.is_empty() {
        debug!("Expand-all ignored: not a listing page");
        return Ok(None);
    }
    state.expand_all = true;
    info!("Expanding {} posts", clicks.len());
    Ok(Some(Effect::Emit(clicks)))
}
