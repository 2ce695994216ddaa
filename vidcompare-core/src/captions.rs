use crate::layout::PanelCount;

/// Visible horizontal span of one caption label, in CSS pixels of the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipRegion {
    pub left: f64,
    pub right: f64,
    /// On-screen canvas width the region was computed against.
    pub total: f64,
}

impl ClipRegion {
    pub fn width(&self) -> f64 {
        (self.right - self.left).max(0.0)
    }

    /// CSS `clip-path` value showing only `[left, right)`.
    pub fn to_clip_path(&self) -> String {
        let right_inset = (self.total - self.right).max(0.0);
        format!("inset(0 {:.2}px 0 {:.2}px)", right_inset, self.left.max(0.0))
    }
}

/// Clip regions for every panel label given the divider positions.
///
/// Boundary i sits at `css_width * positions[i]`; half of `line_gap` is
/// trimmed from both labels meeting there so each caption stops at the
/// centre of the drawn divider line.
pub fn caption_masks(positions: &[f64], css_width: f64, line_gap: f64) -> Vec<ClipRegion> {
    let total = if css_width.is_finite() { css_width.max(0.0) } else { 0.0 };
    let half = line_gap / 2.0;
    let boundary = |i: usize| {
        let p = positions[i];
        if p.is_nan() { 0.0 } else { total * p.clamp(0.0, 1.0) }
    };
    let panels = positions.len() + 1;

    (0..panels)
        .map(|k| {
            let left = if k == 0 { 0.0 } else { boundary(k - 1) + half };
            let right = if k == panels - 1 { total } else { boundary(k) - half };
            let left = left.clamp(0.0, total);
            let right = right.clamp(left, total);
            ClipRegion { left, right, total }
        })
        .collect()
}

/// Which label of a `.video-label` group captions each panel.
///
/// Two panels: the first child captions the left panel and the last child
/// the right one, so any group with at least two children qualifies.
/// Three panels: the group must hold exactly three `span` labels, one per
/// panel in order; `labels` is then the number of `span` children.
pub fn label_slots(labels: usize, count: PanelCount) -> Option<Vec<usize>> {
    match count {
        PanelCount::Two if labels >= 2 => Some(vec![0, labels - 1]),
        PanelCount::Three if labels == 3 => Some(vec![0, 1, 2]),
        _ => None,
    }
}
