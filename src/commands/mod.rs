mod build;
mod render;

pub use build::*;
pub use render::*;
