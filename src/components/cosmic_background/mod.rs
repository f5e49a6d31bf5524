//! Canvas-driven "cosmic neural network" backdrop: stars, nebulae, a circuit
//! grid, a drifting node graph with travelling packets, and floating glyphs.

mod component;
pub mod config;
pub mod controller;
mod render;
pub mod scene;
pub mod state;
pub mod surface;
pub mod types;

pub use component::CosmicBackground;
pub use config::{BackgroundConfig, Density};
pub use controller::BackgroundController;
pub use state::{BackgroundState, LoopMode};
