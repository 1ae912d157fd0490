mod camera;
mod input;
mod overlay;
mod plugin;
mod state;

pub use camera::*;
pub use input::*;
pub use overlay::*;
pub use plugin::*;
pub use state::*;
