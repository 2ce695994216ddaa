use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MouseEvent, TouchEvent};
use vidcompare_core::{CompareConfig, CompareSession, PanelCount};
use crate::canvas::compositor;
use crate::captions::CaptionTargets;
use crate::input;
use crate::listener::{EventSubscription, ListenOptions, ResizeSubscription};
use crate::render_loop::RenderLoop;

struct Shared {
    session: CompareSession,
    captions: CaptionTargets,
    canvas: HtmlCanvasElement,
}

impl Shared {
    /// Re-clip the caption labels against the canvas's current on-screen width.
    fn refresh_captions(&self) {
        if self.captions.is_empty() {
            return;
        }
        let css_width = self.canvas.get_bounding_client_rect().width();
        self.captions.apply(&self.session.caption_masks(css_width));
    }

    fn press(&mut self, px: f64) -> bool {
        let grabbed = self.session.press(px);
        if grabbed {
            self.refresh_captions();
        }
        grabbed
    }

    fn drag_to(&mut self, px: f64) {
        if self.session.drag_to(px) {
            self.refresh_captions();
        }
    }
}

/// One live comparison widget: a canvas compositing the panels of a video,
/// its drag handling, and the caption masks that follow the dividers.
///
/// Everything it registers (render loop, window listeners, resize observer)
/// is released by [`Comparator::dispose`] or on drop.
pub struct Comparator {
    canvas: HtmlCanvasElement,
    render_loop: RenderLoop,
    subscriptions: Vec<EventSubscription>,
    resize: Option<ResizeSubscription>,
}

impl Comparator {
    pub fn new(
        video: HtmlVideoElement,
        canvas: HtmlCanvasElement,
        count: PanelCount,
        config: CompareConfig,
    ) -> Result<Self, String> {
        let session = CompareSession::new(video.video_width(), video.video_height(), count, config);
        let layout = *session.layout();
        if layout.is_empty() {
            return Err(format!(
                "Video frame {}x{} too small for {} panels",
                video.video_width(),
                video.video_height(),
                count.panels()
            ));
        }

        canvas.set_width(layout.panel_width);
        canvas.set_height(layout.panel_height);
        let _ = canvas.style().set_property(
            "aspect-ratio",
            &format!("{}/{}", layout.panel_width, layout.panel_height),
        );

        let ctx = canvas
            .get_context("2d")
            .map_err(|e| format!("getContext failed: {e:?}"))?
            .ok_or("Canvas has no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "Unexpected 2d context type".to_string())?;

        let captions = CaptionTargets::discover(&canvas, count);
        let shared = Rc::new(RefCell::new(Shared {
            session,
            captions,
            canvas: canvas.clone(),
        }));
        shared.borrow().refresh_captions();

        let render_loop = {
            let shared = shared.clone();
            let canvas = canvas.clone();
            RenderLoop::start(move || {
                if !canvas.is_connected() {
                    crate::page::schedule_prune();
                    return false;
                }
                let shared = shared.borrow();
                let plan = shared.session.frame_plan();
                compositor::draw_frame(&ctx, &video, &plan, shared.session.config(), layout.height());
                true
            })?
        };

        let subscriptions = subscribe_input(&canvas, &shared)?;

        let resize = {
            let shared = shared.clone();
            match ResizeSubscription::observe(&canvas, move || shared.borrow().refresh_captions()) {
                Ok(sub) => Some(sub),
                Err(e) => {
                    log::warn!("{e}; captions will not track resizes");
                    None
                }
            }
        };

        log::info!(
            "comparator ready: {} panels of {}x{}",
            count.panels(),
            layout.panel_width,
            layout.panel_height
        );

        Ok(Self {
            canvas,
            render_loop,
            subscriptions,
            resize,
        })
    }

    pub fn is_attached(&self) -> bool {
        self.canvas.is_connected()
    }

    /// Stop drawing and drop every listener this widget registered.
    pub fn dispose(mut self) {
        self.release_resources();
    }

    fn release_resources(&mut self) {
        self.render_loop.cancel();
        self.subscriptions.clear();
        self.resize.take();
    }
}

impl Drop for Comparator {
    fn drop(&mut self) {
        self.release_resources();
    }
}

/// Press handlers live on the canvas; move/release listen on the window so a
/// drag keeps tracking, and always ends, outside the canvas.
fn subscribe_input(
    canvas: &HtmlCanvasElement,
    shared: &Rc<RefCell<Shared>>,
) -> Result<Vec<EventSubscription>, String> {
    let window = web_sys::window().ok_or("No window")?;
    let canvas_target: &web_sys::EventTarget = canvas.as_ref();
    let window_target: &web_sys::EventTarget = window.as_ref();
    let non_passive = ListenOptions { capture: false, passive: Some(false) };
    let mut subs = Vec::with_capacity(8);

    // Hover cursor
    {
        let shared = shared.clone();
        let canvas = canvas.clone();
        subs.push(EventSubscription::listen(canvas_target, "mousemove", move |ev: MouseEvent| {
            let shared = shared.borrow();
            if shared.session.is_dragging() {
                return;
            }
            let over = shared.session.is_over_divider(input::mouse_x(&canvas, &ev));
            let cursor = if over { "col-resize" } else { "default" };
            let _ = canvas.style().set_property("cursor", cursor);
        })?);
    }

    {
        let shared = shared.clone();
        let canvas = canvas.clone();
        subs.push(EventSubscription::listen(canvas_target, "mousedown", move |ev: MouseEvent| {
            if ev.button() != 0 {
                return;
            }
            let x = input::mouse_x(&canvas, &ev);
            if shared.borrow_mut().press(x) {
                ev.prevent_default();
            }
        })?);
    }

    {
        let shared = shared.clone();
        let canvas = canvas.clone();
        subs.push(EventSubscription::listen(window_target, "mousemove", move |ev: MouseEvent| {
            let mut shared = shared.borrow_mut();
            if !shared.session.is_dragging() {
                return;
            }
            shared.drag_to(input::mouse_x(&canvas, &ev));
        })?);
    }

    {
        let shared = shared.clone();
        subs.push(EventSubscription::listen(window_target, "mouseup", move |_: MouseEvent| {
            shared.borrow_mut().session.release();
        })?);
    }

    {
        let shared = shared.clone();
        let canvas = canvas.clone();
        subs.push(EventSubscription::listen_with(
            canvas_target,
            "touchstart",
            non_passive,
            move |ev: TouchEvent| {
                let Some(x) = input::touch_x(&canvas, &ev) else { return };
                if shared.borrow_mut().press(x) {
                    ev.prevent_default();
                }
            },
        )?);
    }

    {
        let shared = shared.clone();
        let canvas = canvas.clone();
        subs.push(EventSubscription::listen_with(
            canvas_target,
            "touchmove",
            non_passive,
            move |ev: TouchEvent| {
                let mut shared = shared.borrow_mut();
                if !shared.session.is_dragging() {
                    return;
                }
                ev.prevent_default();
                if let Some(x) = input::touch_x(&canvas, &ev) {
                    shared.drag_to(x);
                }
            },
        )?);
    }

    for event in ["touchend", "touchcancel"] {
        let shared = shared.clone();
        subs.push(EventSubscription::listen(window_target, event, move |_: web_sys::Event| {
            shared.borrow_mut().session.release();
        })?);
    }

    Ok(subs)
}
