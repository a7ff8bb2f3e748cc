use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

use crate::error::VitrineError;

struct Registration {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// DOM event listeners owned by a demo handle. Dropping the set removes
/// every listener.
#[derive(Default)]
pub(crate) struct ListenerSet {
    registrations: Vec<Registration>,
}

impl ListenerSet {
    /// Register `handler` for `kind` events on `target` as a passive
    /// listener.
    pub(crate) fn add(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), VitrineError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| VitrineError::Host(format!("addEventListener({kind}): {e:?}")))?;
        self.registrations.push(Registration {
            target: target.clone(),
            kind,
            callback,
        });
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.registrations.len()
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        for reg in self.registrations.drain(..) {
            if let Err(e) = reg.target.remove_event_listener_with_callback(
                reg.kind,
                reg.callback.as_ref().unchecked_ref(),
            ) {
                log::warn!("removeEventListener({}): {e:?}", reg.kind);
            }
        }
    }
}
