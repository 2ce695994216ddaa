use std::cell::{Cell, RefCell};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AddEventListenerOptions, Document, HtmlCanvasElement, HtmlVideoElement};
use vidcompare_core::{CompareConfig, PanelCount, PanelLayout};
use crate::comparator::Comparator;

const VIDEO_SELECTOR: &str = "video.video-compare";
const ACTIVE_ATTR: &str = "data-compare-active";
const MERGE_ATTR: &str = "data-merge";
const CONFIG_ATTR: &str = "data-compare-config";
/// `HTMLMediaElement.HAVE_CURRENT_DATA`: at least one decoded frame.
const HAVE_CURRENT_DATA: u16 = 2;

thread_local! {
    static COMPARATORS: RefCell<Vec<Comparator>> = RefCell::new(Vec::new());
    static PRUNE_PENDING: Cell<bool> = Cell::new(false);
}

/// Attach comparators once the document has been parsed.
pub fn start() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else { return };
    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(move |_: web_sys::Event| attach_all());
        let opts = AddEventListenerOptions::new();
        opts.set_once(true);
        let _ = document.add_event_listener_with_callback_and_add_event_listener_options(
            "DOMContentLoaded",
            on_ready.unchecked_ref(),
            &opts,
        );
    } else {
        attach_all();
    }
}

/// Turn every not-yet-activated `video.video-compare` on the page into a comparator.
pub fn attach_all() {
    prune_detached();
    let Some(document) = web_sys::window().and_then(|w| w.document()) else { return };
    let Ok(nodes) = document.query_selector_all(VIDEO_SELECTOR) else { return };

    for i in 0..nodes.length() {
        let Some(video) = nodes.get(i).and_then(|n| n.dyn_into::<HtmlVideoElement>().ok()) else {
            continue;
        };
        if video.has_attribute(ACTIVE_ATTR) {
            continue;
        }
        let _ = video.set_attribute(ACTIVE_ATTR, "");
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = activate(video).await {
                log::error!("comparator setup failed: {e}");
            }
        });
    }
}

pub fn live_count() -> usize {
    COMPARATORS.with(|c| c.borrow().len())
}

/// Drop comparators whose canvas has left the document, from outside any
/// animation-frame callback.
pub(crate) fn schedule_prune() {
    if PRUNE_PENDING.with(|p| p.replace(true)) {
        return;
    }
    let Some(window) = web_sys::window() else { return };
    let cb = Closure::once_into_js(move || {
        PRUNE_PENDING.with(|p| p.set(false));
        prune_detached();
    });
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), 0);
}

fn prune_detached() {
    let detached: Vec<Comparator> = COMPARATORS.with(|c| {
        let mut c = c.borrow_mut();
        let (live, gone): (Vec<_>, Vec<_>) = c.drain(..).partition(Comparator::is_attached);
        *c = live;
        gone
    });
    if !detached.is_empty() {
        log::debug!("disposing {} detached comparator(s)", detached.len());
    }
    for comparator in detached {
        comparator.dispose();
    }
}

async fn activate(video: HtmlVideoElement) -> Result<(), String> {
    wait_for_frame(&video).await?;
    let result = build(&video);
    // The plain video keeps working if the comparator could not be set up.
    play(&video);
    result
}

fn build(video: &HtmlVideoElement) -> Result<(), String> {
    let count = PanelCount::from_attr(video.get_attribute(MERGE_ATTR).as_deref());
    let config = CompareConfig::from_attr(video.get_attribute(CONFIG_ATTR).as_deref());
    let layout = PanelLayout::from_frame(video.video_width(), video.video_height(), count);
    if layout.is_empty() {
        return Err(format!(
            "Video frame {}x{} too small for {} panels",
            video.video_width(),
            video.video_height(),
            count.panels()
        ));
    }

    let document = video.owner_document().ok_or("Video is not in a document")?;
    let slot = CanvasSlot::insert(&document, video)?;
    match Comparator::new(video.clone(), slot.canvas.clone(), count, config) {
        Ok(comparator) => {
            COMPARATORS.with(|c| c.borrow_mut().push(comparator));
            log::debug!("{} comparator(s) live", live_count());
            Ok(())
        }
        Err(e) => {
            slot.undo();
            Err(e)
        }
    }
}

fn has_frame(video: &HtmlVideoElement) -> bool {
    video.ready_state() >= HAVE_CURRENT_DATA && video.video_width() > 0 && video.video_height() > 0
}

/// Resolve once the video has decoded a frame with known dimensions.
async fn wait_for_frame(video: &HtmlVideoElement) -> Result<(), String> {
    if has_frame(video) {
        return Ok(());
    }
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let cb = Closure::once_into_js(move |_: web_sys::Event| {
            let _ = resolve.call0(&JsValue::NULL);
        });
        let opts = AddEventListenerOptions::new();
        opts.set_once(true);
        let _ = video.add_event_listener_with_callback_and_add_event_listener_options(
            "loadeddata",
            cb.unchecked_ref(),
            &opts,
        );
    });
    wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map_err(|e| format!("Waiting for video data failed: {e:?}"))?;
    Ok(())
}

/// A canvas placed right after its video. The video is collapsed but keeps
/// playing as the frame source; its previous height and position are kept
/// so the swap can be undone.
struct CanvasSlot {
    canvas: HtmlCanvasElement,
    video: HtmlVideoElement,
    height: u32,
    position: String,
}

impl CanvasSlot {
    fn insert(document: &Document, video: &HtmlVideoElement) -> Result<Self, String> {
        let canvas = document
            .create_element("canvas")
            .map_err(|e| format!("Failed to create canvas: {e:?}"))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| "Created element is not a canvas".to_string())?;
        let _ = canvas.class_list().add_1("video-compare");

        let parent = video.parent_node().ok_or("Video has no parent")?;
        parent
            .insert_before(&canvas, video.next_sibling().as_ref())
            .map_err(|e| format!("Failed to insert canvas: {e:?}"))?;

        let style = video.style();
        let slot = Self {
            canvas,
            video: video.clone(),
            height: video.height(),
            position: style.get_property_value("position").unwrap_or_default(),
        };
        video.set_height(0);
        let _ = style.set_property("position", "absolute");
        Ok(slot)
    }

    /// Remove the canvas and give the video its layout back.
    fn undo(self) {
        self.canvas.remove();
        self.video.set_height(self.height);
        let style = self.video.style();
        if self.position.is_empty() {
            let _ = style.remove_property("position");
        } else {
            let _ = style.set_property("position", &self.position);
        }
    }
}

fn play(video: &HtmlVideoElement) {
    match video.play() {
        Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                log::warn!("video autoplay was blocked: {e:?}");
            }
        }),
        Err(e) => log::warn!("video play() failed: {e:?}"),
    }
}
