//! Configuration management for Pugg.

mod settings;

pub use settings::{CanvasSettings, GeneralSettings, LlmSettings, PlannerSettings, Settings};
