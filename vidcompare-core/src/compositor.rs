use crate::config::CompareConfig;
use crate::layout::PanelLayout;

/// One `drawImage` call: copy `width × height` from source x `src_x` to canvas x `dst_x`.
/// Both y origins are 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blit {
    pub panel: usize,
    pub src_x: f64,
    pub dst_x: f64,
    pub width: f64,
    pub height: f64,
}

/// Decoration for one divider: a vertical line at `x` and a marker circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DividerMark {
    pub x: f64,
    pub marker_y: f64,
    pub marker_radius: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FramePlan {
    pub blits: Vec<Blit>,
    pub marks: Vec<DividerMark>,
}

/// Build the draw calls for one frame.
///
/// Panel 0 covers the whole canvas. Panel k (k >= 1) is laid over it from
/// divider k-1 to the right edge, sourced from the same x offset inside the
/// k-th slice of the source frame. Overlays with no width are left out.
pub fn plan_frame(layout: &PanelLayout, positions: &[f64], config: &CompareConfig) -> FramePlan {
    if layout.is_empty() {
        return FramePlan::default();
    }
    let w = layout.width();
    let h = layout.height();

    let mut blits = Vec::with_capacity(positions.len() + 1);
    blits.push(Blit { panel: 0, src_x: 0.0, dst_x: 0.0, width: w, height: h });

    let mut marks = Vec::with_capacity(positions.len());
    for (i, &position) in positions.iter().enumerate() {
        let panel = i + 1;
        let x = layout.divider_x(position);
        let width = w - x;
        if width > 0.0 {
            blits.push(Blit {
                panel,
                src_x: panel as f64 * w + x,
                dst_x: x,
                width,
                height: h,
            });
        }
        marks.push(DividerMark {
            x,
            marker_y: h * config.marker_y_ratio,
            marker_radius: h * config.marker_radius_ratio,
        });
    }

    FramePlan { blits, marks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PanelCount;

    #[test]
    fn test_two_panel_plan() {
        let layout = PanelLayout::from_frame(1280, 360, PanelCount::Two);
        let plan = plan_frame(&layout, &[0.25], &CompareConfig::default());
        assert_eq!(plan.blits.len(), 2);
        assert_eq!(plan.blits[0], Blit { panel: 0, src_x: 0.0, dst_x: 0.0, width: 640.0, height: 360.0 });
        assert_eq!(plan.blits[1], Blit { panel: 1, src_x: 800.0, dst_x: 160.0, width: 480.0, height: 360.0 });
        let mark = plan.marks[0];
        assert_eq!(mark.x, 160.0);
        assert_eq!(mark.marker_y, 36.0);
        assert!((mark.marker_radius - 22.68).abs() < 1e-9, "radius {}", mark.marker_radius);
    }

    #[test]
    fn test_divider_at_right_edge_skips_overlay() {
        let layout = PanelLayout::from_frame(1280, 360, PanelCount::Two);
        let plan = plan_frame(&layout, &[1.0], &CompareConfig::default());
        assert_eq!(plan.blits.len(), 1);
        assert_eq!(plan.marks.len(), 1);
        assert_eq!(plan.marks[0].x, 640.0);
    }

    #[test]
    fn test_out_of_range_positions_stay_on_canvas() {
        let layout = PanelLayout::from_frame(1280, 360, PanelCount::Two);
        let plan = plan_frame(&layout, &[-0.5], &CompareConfig::default());
        assert_eq!(plan.blits[1].dst_x, 0.0);
        assert_eq!(plan.blits[1].src_x, 640.0);
        assert_eq!(plan.blits[1].width, 640.0);
        let plan = plan_frame(&layout, &[7.0], &CompareConfig::default());
        assert_eq!(plan.blits.len(), 1);
        assert_eq!(plan.marks[0].x, 640.0);
    }

    #[test]
    fn test_three_panel_slices() {
        let layout = PanelLayout::from_frame(900, 300, PanelCount::Three);
        let plan = plan_frame(&layout, &[0.5, 0.75], &CompareConfig::default());
        assert_eq!(plan.blits.len(), 3);
        assert_eq!(plan.blits[1].src_x, 450.0);
        assert_eq!(plan.blits[1].dst_x, 150.0);
        assert_eq!(plan.blits[1].width, 150.0);
        assert_eq!(plan.blits[2].src_x, 825.0);
        assert_eq!(plan.blits[2].dst_x, 225.0);
        assert_eq!(plan.blits[2].width, 75.0);
        for b in &plan.blits {
            assert!(b.src_x + b.width <= 900.0, "blit reads past the frame: {b:?}");
            assert!(b.dst_x + b.width <= 300.0, "blit writes past the canvas: {b:?}");
        }
    }

    #[test]
    fn test_empty_layout_draws_nothing() {
        let layout = PanelLayout::from_frame(0, 0, PanelCount::Two);
        assert_eq!(plan_frame(&layout, &[0.5], &CompareConfig::default()), FramePlan::default());
    }
}
