use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, EventTarget, ResizeObserver};

/// A DOM event listener that is removed again when dropped.
pub struct EventSubscription {
    target: EventTarget,
    event: &'static str,
    capture: bool,
    callback: Closure<dyn FnMut(Event)>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ListenOptions {
    pub capture: bool,
    /// `false` lets the handler call `prevent_default()` on touch events.
    pub passive: Option<bool>,
}

impl EventSubscription {
    pub fn listen<E>(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(E) + 'static,
    ) -> Result<Self, String>
    where
        E: JsCast + 'static,
    {
        Self::listen_with(target, event, ListenOptions::default(), handler)
    }

    pub fn listen_with<E>(
        target: &EventTarget,
        event: &'static str,
        options: ListenOptions,
        mut handler: impl FnMut(E) + 'static,
    ) -> Result<Self, String>
    where
        E: JsCast + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
            if let Ok(ev) = ev.dyn_into::<E>() {
                handler(ev);
            }
        });

        let opts = AddEventListenerOptions::new();
        opts.set_capture(options.capture);
        if let Some(passive) = options.passive {
            opts.set_passive(passive);
        }
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event,
                callback.as_ref().unchecked_ref(),
                &opts,
            )
            .map_err(|e| format!("Failed to listen for {event}: {e:?}"))?;

        Ok(Self {
            target: target.clone(),
            event,
            capture: options.capture,
            callback,
        })
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback_and_bool(
            self.event,
            self.callback.as_ref().unchecked_ref(),
            self.capture,
        );
    }
}

/// A `ResizeObserver` watching one element, disconnected when dropped.
pub struct ResizeSubscription {
    observer: ResizeObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, ResizeObserver)>,
}

impl ResizeSubscription {
    pub fn observe(
        target: &web_sys::Element,
        mut handler: impl FnMut() + 'static,
    ) -> Result<Self, String> {
        let callback = Closure::<dyn FnMut(js_sys::Array, ResizeObserver)>::new(
            move |entries: js_sys::Array, _observer: ResizeObserver| {
                if entries.length() > 0 {
                    handler();
                }
            },
        );
        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| format!("ResizeObserver unavailable: {e:?}"))?;
        observer.observe(target);
        Ok(Self { observer, _callback: callback })
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    async fn sleep_ms(ms: i32) {
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let _ = web_sys::window()
                .unwrap()
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
        });
        let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
    }

    #[wasm_bindgen_test]
    async fn test_resize_handler_runs_on_observe() {
        let document = web_sys::window().unwrap().document().unwrap();
        let el = document.create_element("div").unwrap();
        el.set_attribute("style", "width: 120px; height: 40px").unwrap();
        document.body().unwrap().append_child(&el).unwrap();

        let calls = Rc::new(Cell::new(0u32));
        let counter = calls.clone();
        let sub = ResizeSubscription::observe(&el, move || counter.set(counter.get() + 1)).unwrap();
        sleep_ms(100).await;
        assert!(calls.get() >= 1, "handler never ran");

        drop(sub);
        let seen = calls.get();
        el.set_attribute("style", "width: 300px; height: 40px").unwrap();
        sleep_ms(100).await;
        assert_eq!(calls.get(), seen, "handler ran after disconnect");
        el.remove();
    }
}
