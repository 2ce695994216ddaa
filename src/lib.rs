pub mod canvas;
pub mod captions;
pub mod comparator;
pub mod input;
pub mod listener;
pub mod page;
pub mod render_loop;

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);

    page::start();
}
