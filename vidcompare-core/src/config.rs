use serde::Deserialize;
use crate::layout::PanelCount;

/// Per-widget tuning, read from the optional `data-compare-config` JSON attribute.
/// Missing fields keep their defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Starting divider positions in [0, 1]. Ignored unless there is exactly one per divider.
    pub initial_positions: Option<Vec<f64>>,
    pub line_width: f64,
    pub line_color: String,
    pub marker_fill: String,
    /// Marker radius as a fraction of panel height.
    pub marker_radius_ratio: f64,
    /// Vertical marker centre as a fraction of panel height.
    pub marker_y_ratio: f64,
    /// Divider thickness as seen by the caption labels, in CSS pixels.
    /// Half of it is trimmed from each side of a caption boundary.
    pub caption_line_gap: f64,
    pub hit_radius_min: f64,
    pub hit_radius_ratio: f64,
    pub snap_min: f64,
    pub snap_ratio: f64,
    /// Draw a double-headed arrow through each marker.
    pub arrow_glyph: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            initial_positions: None,
            line_width: 5.0,
            line_color: "#444".to_string(),
            marker_fill: "#FFD79340".to_string(),
            marker_radius_ratio: 0.063,
            marker_y_ratio: 0.1,
            caption_line_gap: 4.0,
            hit_radius_min: 14.0,
            hit_radius_ratio: 0.02,
            snap_min: 8.0,
            snap_ratio: 0.01,
            arrow_glyph: false,
        }
    }
}

impl CompareConfig {
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("Invalid compare config: {e}"))
    }

    /// Parse an attribute value, falling back to defaults (with a warning) on bad JSON.
    pub fn from_attr(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Self::from_json(raw).unwrap_or_else(|e| {
                log::warn!("{e}; using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Starting positions for `count` panels: the configured ones when they fit,
    /// otherwise `floor(100 * i / n) / 100` (0.5 for two panels, 0.33 / 0.66 for three).
    pub fn initial_positions_for(&self, count: PanelCount) -> Vec<f64> {
        let n = count.panels();
        if let Some(configured) = &self.initial_positions {
            if configured.len() == count.dividers() && configured.iter().all(|p| p.is_finite()) {
                let mut positions: Vec<f64> = configured.iter().map(|p| p.clamp(0.0, 1.0)).collect();
                positions.sort_by(|a, b| a.total_cmp(b));
                return positions;
            }
            log::warn!(
                "initial_positions needs {} finite values, got {:?}; using defaults",
                count.dividers(),
                configured
            );
        }
        (1..n)
            .map(|i| (i as f64 * 100.0 / n as f64).floor() / 100.0)
            .collect()
    }

    /// Pointer distance, in canvas pixels, within which a divider can be grabbed.
    pub fn hit_radius(&self, panel_width: u32) -> f64 {
        self.hit_radius_min.max((panel_width as f64 * self.hit_radius_ratio).round())
    }

    /// Distance, in canvas pixels, at which a dragged divider snaps to a bound or neighbour.
    pub fn snap_distance(&self, panel_width: u32) -> f64 {
        self.snap_min.max((panel_width as f64 * self.snap_ratio).round())
    }
}
