//! JavaScript bridge
//!
//! Messages travel as JSON strings in the `detail` of CustomEvents on the
//! window object, one event name per direction.

use erasure_config::ErasureConfig;
use erasure_inference::{InferenceBackend, RemoteInference, SubmissionTicket};
use erasure_ipc::{CoreToUi, SubmissionRequest, UiToCore};
use erasure_session::Session;
use std::cell::RefCell;
use tracing::{error, info, warn};
use wasm_bindgen::prelude::*;

use crate::dispatch::{Outcome, handle_completion, handle_message};

pub const UI_TO_CORE_EVENT: &str = "erasure:ui-to-core";
pub const CORE_TO_UI_EVENT: &str = "erasure:core-to-ui";

thread_local! {
    static SESSION: RefCell<Session> = RefCell::new(Session::new(ErasureConfig::default()));
}

/// Run `f` against the page's session
pub fn with_session<R>(f: impl FnOnce(&mut Session) -> R) -> R {
    SESSION.with(|session| f(&mut session.borrow_mut()))
}

/// Register the listener for UI messages
pub fn init_bridge() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;

    let closure = Closure::wrap(Box::new(move |event: web_sys::CustomEvent| {
        let Some(detail) = event.detail().as_string() else {
            warn!("Ignoring {UI_TO_CORE_EVENT} without a string detail");
            return;
        };
        match UiToCore::from_json(&detail) {
            Ok(message) => receive(message),
            Err(e) => {
                error!("Failed to parse UI message: {e}");
                send_to_ui(&CoreToUi::Error {
                    code: "invalid_message".to_string(),
                    message: e.to_string(),
                });
            }
        }
    }) as Box<dyn FnMut(_)>);

    window.add_event_listener_with_callback(UI_TO_CORE_EVENT, closure.as_ref().unchecked_ref())?;

    // The listener lives as long as the page
    closure.forget();

    info!("Erasure bridge initialized");
    Ok(())
}

/// Handle one message and post whatever it produced
pub fn receive(message: UiToCore) {
    // The borrow ends before any reply is dispatched, since listeners may
    // call straight back into the bridge
    let outcome = with_session(|session| handle_message(session, message));
    deliver(outcome);
}

fn deliver(outcome: Outcome) {
    for reply in &outcome.replies {
        send_to_ui(reply);
    }
    if let Some((ticket, request)) = outcome.submit {
        spawn_submission(ticket, request);
    }
}

fn spawn_submission(ticket: SubmissionTicket, request: SubmissionRequest) {
    let config = with_session(|session| session.config().inference.clone());
    wasm_bindgen_futures::spawn_local(async move {
        let result = match RemoteInference::new(&config) {
            Ok(backend) => backend.infer(request).await,
            Err(e) => Err(e),
        };
        let outcome = with_session(|session| handle_completion(session, ticket, result));
        deliver(outcome);
    });
}

/// Post a message to the UI
pub fn send_to_ui(message: &CoreToUi) {
    let Some(window) = web_sys::window() else {
        error!("No global window; dropping message");
        return;
    };

    let json = match message.to_json() {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize message: {e}");
            return;
        }
    };

    let init = web_sys::CustomEventInit::new();
    init.set_detail(&JsValue::from_str(&json));
    let dispatched = web_sys::CustomEvent::new_with_event_init_dict(CORE_TO_UI_EVENT, &init)
        .and_then(|event| window.dispatch_event(&event));
    if let Err(e) = dispatched {
        error!("Failed to dispatch {CORE_TO_UI_EVENT}: {e:?}");
    }
}
