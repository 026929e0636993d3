//! Parameter definitions with physical units and documented semantics.
//!
//! Settings structs are immutable snapshots produced by the editor. The engine
//! reads them and never writes back. All magic numbers live next to the field
//! they configure, with:
//! - Units (world units, degrees, seconds)
//! - Documented ranges (enforced by the editor, assumed here)
//! - Defaults matching the editor's initial scene

mod camera;
mod clouds;
mod render;
mod scene;
mod sky;
mod terrain;
mod water;

// Re-export all types
pub use camera::{CameraPreset, FixedCamera, OrbitCamera};
pub use clouds::CloudSettings;
pub use render::RenderConfig;
pub use scene::{SceneSnapshot, SettingsError};
pub use sky::{SkyPreset, SkySettings};
pub use terrain::{TerrainSettings, TerrainType};
pub use water::WaterSettings;

/// Linear RGB colour, each channel in [0, 1]
pub type Rgb = [f32; 3];
