mod application;
mod context;
mod convert;
mod view;

pub use application::launch_application;
pub use context::*;
pub use view::*;
