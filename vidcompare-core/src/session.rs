use crate::captions::{caption_masks, ClipRegion};
use crate::compositor::{plan_frame, FramePlan};
use crate::config::CompareConfig;
use crate::dividers::DividerController;
use crate::layout::{PanelCount, PanelLayout};

/// Platform-free state of one comparison widget: geometry, dividers and tuning.
/// The browser side feeds it canvas-space coordinates and reads back draw
/// plans and caption masks.
#[derive(Clone, Debug)]
pub struct CompareSession {
    layout: PanelLayout,
    dividers: DividerController,
    config: CompareConfig,
}

impl CompareSession {
    pub fn new(frame_width: u32, frame_height: u32, count: PanelCount, config: CompareConfig) -> Self {
        let layout = PanelLayout::from_frame(frame_width, frame_height, count);
        let initial = config.initial_positions_for(count);
        let dividers = DividerController::new(
            &layout,
            &initial,
            config.hit_radius(layout.panel_width),
            config.snap_distance(layout.panel_width),
        );
        Self { layout, dividers, config }
    }

    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    pub fn dividers(&self) -> &DividerController {
        &self.dividers
    }

    pub fn positions(&self) -> &[f64] {
        self.dividers.positions()
    }

    pub fn is_dragging(&self) -> bool {
        self.dividers.is_dragging()
    }

    /// Whether a press at canvas x `px` would grab a divider.
    pub fn is_over_divider(&self, px: f64) -> bool {
        self.dividers.hit_test(px).is_some()
    }

    /// Pointer or touch press. Grabs the divider under `px`, if any, and
    /// moves it to the press point. Returns whether a divider was grabbed.
    pub fn press(&mut self, px: f64) -> bool {
        let target = self.dividers.hit_test(px);
        self.dividers.begin_drag(target);
        if target.is_some() {
            log::debug!("drag start: divider {:?} at x={px:.1}", target);
            self.dividers.update_drag(px);
        }
        target.is_some()
    }

    /// Pointer or touch move. Returns whether a divider position changed.
    pub fn drag_to(&mut self, px: f64) -> bool {
        self.dividers.update_drag(px)
    }

    pub fn release(&mut self) {
        if let Some(index) = self.dividers.active() {
            log::debug!("drag end: divider {index} -> {:?}", self.dividers.positions());
        }
        self.dividers.end_drag();
    }

    pub fn frame_plan(&self) -> FramePlan {
        plan_frame(&self.layout, self.dividers.positions(), &self.config)
    }

    pub fn caption_masks(&self, css_width: f64) -> Vec<ClipRegion> {
        caption_masks(self.dividers.positions(), css_width, self.config.caption_line_gap)
    }
}
