//! Viewer camera parameters.

/// Slow circular orbit around the scene centre
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Horizontal distance from the orbit centre (world units)
    pub radius: f32,

    /// Eye height above the base plane (world units)
    pub height: f32,

    /// Angular speed (radians per second)
    pub angular_speed: f32,

    /// Height of the look-at point (world units)
    pub target_height: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            radius: 160.0,
            height: 45.0,
            angular_speed: 0.05,
            target_height: 10.0,
        }
    }
}

impl OrbitCamera {
    /// Orbit scaled to a scene footprint so the whole box stays in view
    pub fn for_box(box_size: f32) -> Self {
        Self {
            radius: box_size * 0.8,
            height: box_size * 0.225,
            target_height: box_size * 0.05,
            ..Default::default()
        }
    }
}

/// Stationary camera
#[derive(Debug, Clone)]
pub struct FixedCamera {
    /// Eye position (world units)
    pub position: [f32; 3],

    /// Look-at point (world units)
    pub target: [f32; 3],
}

impl Default for FixedCamera {
    fn default() -> Self {
        Self {
            position: [0.0, 40.0, -150.0],
            target: [0.0, 10.0, 0.0],
        }
    }
}

/// Camera preset selection
#[derive(Debug, Clone)]
pub enum CameraPreset {
    Orbit(OrbitCamera),
    Fixed(FixedCamera),
}

impl Default for CameraPreset {
    fn default() -> Self {
        CameraPreset::Orbit(OrbitCamera::default())
    }
}
