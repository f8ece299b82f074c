#[cfg(target_os = "macos")]
#[macro_use]
pub extern crate objc;
#[cfg(target_os = "macos")]
#[macro_use]
pub extern crate cocoa;

mod backend;
mod bootstrap;
pub mod config;
mod error;
mod formats;
mod frame;
mod logging;
pub mod mesh;
mod pipeline;
mod renderer;
pub mod shader;
mod vertex_layout;
mod view;

#[cfg(target_os = "macos")]
mod metal_backend;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::*;
pub use config::{AppConfig, DrawMode, RendererConfig};
pub use error::*;
pub use formats::*;
pub use frame::*;
pub use logging::*;
pub use pipeline::*;
pub use renderer::*;
pub use vertex_layout::*;
pub use view::*;

#[cfg(target_os = "macos")]
pub use metal_backend::*;
#[cfg(target_os = "macos")]
pub use metal;
