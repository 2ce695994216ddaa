use crate::layout::{clamp_px, PanelLayout};

/// Owns the normalized divider positions and the active drag.
///
/// Positions are kept sorted: every divider lies between its immediate
/// neighbours, with 0 and 1 standing in for the missing neighbours at the ends.
#[derive(Clone, Debug)]
pub struct DividerController {
    positions: Vec<f64>,
    panel_width: f64,
    hit_radius: f64,
    snap_distance: f64,
    drag: Option<Drag>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Drag {
    index: usize,
    /// No position has changed since the drag began.
    pristine: bool,
}

impl DividerController {
    pub fn new(layout: &PanelLayout, initial: &[f64], hit_radius: f64, snap_distance: f64) -> Self {
        let dividers = layout.count.dividers();
        let mut positions: Vec<f64> = (0..dividers)
            .map(|i| initial.get(i).copied().filter(|p| p.is_finite()).unwrap_or(0.5))
            .map(|p| p.clamp(0.0, 1.0))
            .collect();
        positions.sort_by(|a, b| a.total_cmp(b));
        Self {
            positions,
            panel_width: layout.width(),
            hit_radius,
            snap_distance,
            drag: None,
        }
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn active(&self) -> Option<usize> {
        self.drag.map(|d| d.index)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Canvas-space x of divider `index`.
    pub fn pixel_x(&self, index: usize) -> f64 {
        self.positions
            .get(index)
            .map(|p| clamp_px(p * self.panel_width, self.panel_width))
            .unwrap_or(0.0)
    }

    /// The divider nearest to `px` within the hit radius. Equal distances go to the lower index.
    pub fn hit_test(&self, px: f64) -> Option<usize> {
        if px.is_nan() {
            return None;
        }
        let mut best: Option<(usize, f64)> = None;
        for index in 0..self.positions.len() {
            let d = (px - self.pixel_x(index)).abs();
            if d > self.hit_radius {
                continue;
            }
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((index, d));
            }
        }
        best.map(|(index, _)| index)
    }

    pub fn begin_drag(&mut self, target: Option<usize>) {
        let Some(index) = target else { return };
        if index >= self.positions.len() {
            return;
        }
        self.drag = Some(Drag { index, pristine: true });
    }

    /// Move the dragged divider toward canvas-space `px`.
    /// Returns true when a position actually changed.
    pub fn update_drag(&mut self, px: f64) -> bool {
        let Some(drag) = self.drag else { return false };
        if self.panel_width <= 0.0 {
            return false;
        }
        let w = self.panel_width;
        let x = clamp_px(px, w);

        // Two dividers sitting on the same spot are indistinguishable to
        // `hit_test`, which always hands out the lower one. If the pointer
        // heads past the shared spot before anything moved, drag the
        // neighbour on that side instead so the pair can be pulled apart.
        if drag.pristine {
            if let Some(next) = self.coincident_neighbour(drag.index, x) {
                self.drag = Some(Drag { index: next, pristine: true });
                return self.update_drag(px);
            }
        }

        let index = drag.index;
        let (lo, hi) = self.bounds(index);
        let x = snap(x, &self.snap_targets(index), self.snap_distance);
        let position = (x / w).clamp(lo, hi);

        if position == self.positions[index] {
            return false;
        }
        self.positions[index] = position;
        self.drag = Some(Drag { index, pristine: false });
        true
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Normalized range divider `index` may occupy.
    fn bounds(&self, index: usize) -> (f64, f64) {
        let lo = if index == 0 { 0.0 } else { self.positions[index - 1] };
        let hi = self.positions.get(index + 1).copied().unwrap_or(1.0);
        (lo, hi)
    }

    /// Pixel snap targets for divider `index`: panel edges first, then
    /// neighbouring dividers, so a neighbour in range beats an edge in range.
    fn snap_targets(&self, index: usize) -> Vec<f64> {
        let w = self.panel_width;
        let (lo, hi) = self.bounds(index);
        let lo_is_edge = index == 0;
        let hi_is_edge = index + 1 == self.positions.len();
        let mut targets = Vec::with_capacity(2);
        for (target, is_edge) in [(lo, lo_is_edge), (hi, hi_is_edge)] {
            if is_edge {
                targets.push(target * w);
            }
        }
        for (target, is_edge) in [(lo, lo_is_edge), (hi, hi_is_edge)] {
            if !is_edge {
                targets.push(target * w);
            }
        }
        targets
    }

    fn coincident_neighbour(&self, index: usize, x: f64) -> Option<usize> {
        let here = self.positions[index];
        let here_px = here * self.panel_width;
        if x > here_px + self.snap_distance {
            let next = index + 1;
            (self.positions.get(next) == Some(&here)).then_some(next)
        } else if x < here_px - self.snap_distance && index > 0 {
            (self.positions[index - 1] == here).then_some(index - 1)
        } else {
            None
        }
    }
}

/// Snap `x` onto a target within `distance`. Later targets take precedence.
fn snap(x: f64, targets: &[f64], distance: f64) -> f64 {
    targets
        .iter()
        .copied()
        .filter(|t| (x - t).abs() <= distance)
        .last()
        .unwrap_or(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PanelCount;

    fn two_panel(width: u32, position: f64) -> DividerController {
        let layout = PanelLayout::from_frame(width * 2, 400, PanelCount::Two);
        DividerController::new(&layout, &[position], 20.0, 10.0)
    }

    fn three_panel(width: u32, a: f64, b: f64, hit: f64, snap: f64) -> DividerController {
        let layout = PanelLayout::from_frame(width * 3, 400, PanelCount::Three);
        DividerController::new(&layout, &[a, b], hit, snap)
    }

    #[test]
    fn test_snap_to_panel_edges() {
        let mut c = two_panel(1000, 0.5);
        c.begin_drag(Some(0));
        assert!(c.update_drag(5.0));
        assert_eq!(c.positions()[0], 0.0);
        assert!(c.update_drag(995.0));
        assert_eq!(c.positions()[0], 1.0);
        assert!(c.update_drag(500.0));
        assert_eq!(c.positions()[0], 0.5);
    }

    #[test]
    fn test_two_panel_stays_normalized() {
        let mut c = two_panel(640, 0.5);
        c.begin_drag(Some(0));
        for px in [-1e9, 3000.0, f64::NAN, f64::INFINITY, -0.5, 320.0, f64::NEG_INFINITY, 641.0] {
            c.update_drag(px);
            let p = c.positions()[0];
            assert!((0.0..=1.0).contains(&p), "px={px} gave position {p}");
        }
    }

    #[test]
    fn test_update_without_drag_is_noop() {
        let mut c = two_panel(1000, 0.5);
        assert!(!c.update_drag(100.0));
        assert_eq!(c.positions(), &[0.5]);
        c.begin_drag(None);
        assert!(!c.update_drag(100.0));
        c.begin_drag(Some(7));
        assert!(!c.is_dragging());
    }

    #[test]
    fn test_end_drag_clears_target() {
        let mut c = two_panel(1000, 0.5);
        c.begin_drag(Some(0));
        assert_eq!(c.active(), Some(0));
        c.end_drag();
        assert_eq!(c.active(), None);
        assert!(!c.update_drag(100.0));
        assert_eq!(c.positions(), &[0.5]);
    }

    #[test]
    fn test_hit_test_two_dividers() {
        let c = three_panel(1000, 0.3, 0.7, 20.0, 10.0);
        assert_eq!(c.hit_test(305.0), Some(0));
        assert_eq!(c.hit_test(690.0), Some(1));
        assert_eq!(c.hit_test(500.0), None);
        assert_eq!(c.hit_test(f64::NAN), None);
    }

    #[test]
    fn test_hit_test_prefers_closer_then_lower() {
        // Dividers at 500 px and 515.625 px.
        let c = three_panel(1000, 0.5, 0.515625, 20.0, 10.0);
        assert_eq!(c.hit_test(505.0), Some(0));
        assert_eq!(c.hit_test(512.0), Some(1));
        // Equidistant from both.
        assert_eq!(c.hit_test(507.8125), Some(0));
    }

    #[test]
    fn test_dividers_clamped_by_neighbours() {
        let mut c = three_panel(1000, 0.3, 0.7, 20.0, 10.0);
        c.begin_drag(Some(0));
        c.update_drag(900.0);
        assert_eq!(c.positions(), &[0.7, 0.7]);
        c.end_drag();

        let mut c = three_panel(1000, 0.3, 0.7, 20.0, 10.0);
        c.begin_drag(Some(1));
        c.update_drag(100.0);
        assert_eq!(c.positions(), &[0.3, 0.3]);
    }

    #[test]
    fn test_snap_to_neighbour() {
        let mut c = three_panel(1000, 0.3, 0.7, 20.0, 10.0);
        c.begin_drag(Some(0));
        c.update_drag(692.0);
        assert_eq!(c.positions()[0], 0.7);
    }

    #[test]
    fn test_neighbour_snap_beats_edge_snap() {
        // Divider 0 at 5 px, divider 1 at 12 px: a drag to 3 px is within
        // snap range of both the left edge and divider 1.
        let mut c = three_panel(1000, 0.005, 0.012, 20.0, 10.0);
        c.begin_drag(Some(0));
        assert!(c.update_drag(3.0));
        let p = c.positions();
        assert_eq!(p[0], p[1], "divider 0 should land on divider 1: {p:?}");
        assert_eq!(p[1], 0.012);

        // Mirror case on the right edge for the last divider.
        let mut c = three_panel(1000, 0.988, 0.995, 20.0, 10.0);
        c.begin_drag(Some(1));
        assert!(c.update_drag(997.0));
        let p = c.positions();
        assert_eq!(p[1], p[0], "divider 1 should land on divider 0: {p:?}");
    }

    #[test]
    fn test_two_panel_right_edge_wins_when_both_in_range() {
        let layout = PanelLayout::from_frame(20, 100, PanelCount::Two);
        let mut c = DividerController::new(&layout, &[0.5], 14.0, 8.0);
        c.begin_drag(Some(0));
        c.update_drag(6.0);
        assert_eq!(c.positions(), &[1.0]);
    }

    #[test]
    fn test_ordering_survives_alternating_drags() {
        let mut c = three_panel(300, 0.33, 0.66, 14.0, 8.0);
        let mut seed = 0x2545_f491_u64;
        for step in 0..2000 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let px = (seed % 500) as f64 - 100.0;
            if step % 7 == 0 {
                c.end_drag();
                c.begin_drag(Some((seed % 2) as usize));
            }
            c.update_drag(px);
            let p = c.positions();
            assert!(p[0] <= p[1], "step {step}: {p:?}");
            assert!(p.iter().all(|v| (0.0..=1.0).contains(v)), "step {step}: {p:?}");
        }
    }

    #[test]
    fn test_coincident_dividers_can_be_separated() {
        let mut c = three_panel(1000, 0.0, 0.0, 20.0, 10.0);
        let hit = c.hit_test(5.0);
        assert_eq!(hit, Some(0));
        c.begin_drag(hit);
        assert!(c.update_drag(200.0));
        assert_eq!(c.active(), Some(1));
        assert_eq!(c.positions(), &[0.0, 0.2]);
    }

    #[test]
    fn test_no_handoff_once_moved() {
        let mut c = three_panel(1000, 0.3, 0.7, 20.0, 10.0);
        c.begin_drag(Some(0));
        c.update_drag(900.0);
        c.update_drag(950.0);
        assert_eq!(c.active(), Some(0));
        assert_eq!(c.positions(), &[0.7, 0.7]);
    }

    #[test]
    fn test_zero_width_panel_ignores_drag() {
        let layout = PanelLayout::from_frame(1, 100, PanelCount::Two);
        let mut c = DividerController::new(&layout, &[0.5], 14.0, 8.0);
        c.begin_drag(Some(0));
        assert!(!c.update_drag(10.0));
        assert_eq!(c.positions(), &[0.5]);
    }
}
