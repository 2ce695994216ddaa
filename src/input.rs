use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};
use vidcompare_core::input::client_to_canvas_x;

/// Canvas-space x of a mouse event. Reads the canvas rect on every call.
pub fn mouse_x(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> f64 {
    to_canvas_x(canvas, ev.client_x() as f64)
}

/// Canvas-space x of the first active touch, if there is one.
pub fn touch_x(canvas: &HtmlCanvasElement, ev: &TouchEvent) -> Option<f64> {
    let touch = ev.touches().get(0)?;
    Some(to_canvas_x(canvas, touch.client_x() as f64))
}

fn to_canvas_x(canvas: &HtmlCanvasElement, client_x: f64) -> f64 {
    let rect = canvas.get_bounding_client_rect();
    client_to_canvas_x(client_x, rect.left(), rect.width(), canvas.width() as f64)
}
