use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlCanvasElement, HtmlElement};
use vidcompare_core::captions::{label_slots, ClipRegion};
use vidcompare_core::PanelCount;

const LABEL_GROUP_SELECTOR: &str = ".video-label";

/// Caption elements belonging to one comparator, one entry per panel in each group.
pub struct CaptionTargets {
    groups: Vec<Vec<HtmlElement>>,
}

impl CaptionTargets {
    /// Collect `.video-label` groups next to the canvas. Missing or malformed
    /// groups are skipped; the widget then simply has no caption masking.
    pub fn discover(canvas: &HtmlCanvasElement, count: PanelCount) -> Self {
        let Some(parent) = canvas.parent_element() else {
            return Self { groups: Vec::new() };
        };
        let Ok(nodes) = parent.query_selector_all(LABEL_GROUP_SELECTOR) else {
            return Self { groups: Vec::new() };
        };

        let mut groups = Vec::new();
        for i in 0..nodes.length() {
            let Some(group) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let candidates = label_candidates(&group, count);
            let Some(slots) = label_slots(candidates.len(), count) else {
                log::warn!(
                    "caption group has {} usable labels for {} panels; leaving it unmasked",
                    candidates.len(),
                    count.panels()
                );
                continue;
            };
            let labels: Vec<HtmlElement> = slots
                .into_iter()
                .filter_map(|slot| candidates.get(slot).cloned())
                .collect();
            if labels.len() == count.panels() {
                groups.push(labels);
            }
        }
        if groups.is_empty() {
            log::debug!("no caption labels found for comparator");
        }
        Self { groups }
    }

    #[cfg(all(test, target_arch = "wasm32"))]
    pub(crate) fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn apply(&self, masks: &[ClipRegion]) {
        for group in &self.groups {
            for (label, mask) in group.iter().zip(masks) {
                let _ = label.style().set_property("clip-path", &mask.to_clip_path());
            }
        }
    }
}

/// Element children that may carry a caption: any child for two panels,
/// only `span` children for three.
fn label_candidates(group: &Element, count: PanelCount) -> Vec<HtmlElement> {
    let children = group.children();
    (0..children.length())
        .filter_map(|i| children.item(i))
        .filter(|el| count == PanelCount::Two || el.local_name() == "span")
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect()
}
