pub mod controller;
pub mod feedback;
pub mod render;
pub mod state;

pub use controller::MoodController;
pub use render::{render, Screen};
pub use state::ViewState;
