pub mod components;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod menu;
pub mod modal;
pub mod surface;
pub mod theme;
pub mod transform;
pub mod upload;

pub use config::{Config, Dimension, EditorOptions, Target};
pub use editor::Editor;
pub use error::{Error, Result};
