//! Moodscape library - procedural terrain, ocean, clouds and sky for a 3D scene

pub mod camera;
pub mod clouds;
pub mod environment;
pub mod error;
pub mod mesh;
pub mod noise;
pub mod ocean;
pub mod params;
pub mod rendering;
pub mod sky;
pub mod terrain;
