pub mod captions;
pub mod compositor;
pub mod config;
pub mod dividers;
pub mod input;
pub mod layout;
pub mod session;

pub use config::CompareConfig;
pub use layout::{PanelCount, PanelLayout};
pub use session::CompareSession;
