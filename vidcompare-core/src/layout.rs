/// How many equal-width panels are packed side by side into one video frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PanelCount {
    #[default]
    Two,
    Three,
}

impl PanelCount {
    /// Read the `data-merge` attribute value. `"3"` selects three panels;
    /// anything else, including a missing attribute, selects two.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("3") => Self::Three,
            _ => Self::Two,
        }
    }

    pub fn panels(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    pub fn dividers(self) -> usize {
        self.panels() - 1
    }
}

/// Pixel geometry of one panel slice of the source frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelLayout {
    pub count: PanelCount,
    pub panel_width: u32,
    pub panel_height: u32,
}

impl PanelLayout {
    /// The panel width truncates: a 1001 px wide two-panel frame yields 500 px
    /// panels and the trailing column is never shown. Sources are not
    /// validated upstream, so an uneven frame is rendered as-is.
    pub fn from_frame(frame_width: u32, frame_height: u32, count: PanelCount) -> Self {
        Self {
            count,
            panel_width: frame_width / count.panels() as u32,
            panel_height: frame_height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.panel_width == 0 || self.panel_height == 0
    }

    pub fn width(&self) -> f64 {
        self.panel_width as f64
    }

    pub fn height(&self) -> f64 {
        self.panel_height as f64
    }

    /// Clamp a canvas-space x coordinate into `[0, panel_width]`. NaN maps to 0.
    pub fn clamp_x(&self, x: f64) -> f64 {
        clamp_px(x, self.width())
    }

    /// Pixel position of a normalized divider, clamped into the panel.
    pub fn divider_x(&self, position: f64) -> f64 {
        self.clamp_x(position * self.width())
    }
}

pub(crate) fn clamp_px(x: f64, width: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    x.clamp(0.0, width.max(0.0))
}
