/// Map a client-space x coordinate onto the canvas backing store.
///
/// `rect_left`/`rect_width` come from the canvas's bounding client rect and
/// should be read fresh for every event, since the page may have reflowed.
/// A collapsed canvas (zero or non-finite CSS width) maps everything to 0.
pub fn client_to_canvas_x(client_x: f64, rect_left: f64, rect_width: f64, canvas_width: f64) -> f64 {
    if !(rect_width.is_finite() && rect_width > 0.0) {
        return 0.0;
    }
    (client_x - rect_left) * (canvas_width / rect_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_canvas() {
        // CSS width 400, backing width 800, canvas starts at x = 50.
        assert_eq!(client_to_canvas_x(150.0, 50.0, 400.0, 800.0), 200.0);
        assert_eq!(client_to_canvas_x(50.0, 50.0, 400.0, 800.0), 0.0);
    }

    #[test]
    fn test_unscaled_canvas() {
        assert_eq!(client_to_canvas_x(321.0, 21.0, 640.0, 640.0), 300.0);
    }

    #[test]
    fn test_outside_canvas_is_not_clamped() {
        // Clamping belongs to the divider controller.
        assert_eq!(client_to_canvas_x(0.0, 50.0, 400.0, 800.0), -100.0);
    }

    #[test]
    fn test_collapsed_canvas() {
        assert_eq!(client_to_canvas_x(150.0, 50.0, 0.0, 800.0), 0.0);
        assert_eq!(client_to_canvas_x(150.0, 50.0, f64::NAN, 800.0), 0.0);
    }
}
