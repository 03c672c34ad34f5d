use serde::{Deserialize, Serialize};

/// World-space vector. The simulation treats XZ as the ground plane
/// and +Y as up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    pub fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    pub fn scale(self, factor: f32) -> Vec3 {
        Vec3 {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length_sq(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    pub fn distance(self, other: Vec3) -> f32 {
        self.sub(other).length()
    }

    /// Zero-length input stays zero rather than producing NaN.
    pub fn normalized_or_zero(self) -> Vec3 {
        let len_sq = self.length_sq();
        if len_sq > 0.0 {
            self.scale(len_sq.sqrt().recip())
        } else {
            Vec3::ZERO
        }
    }

    /// Drops the vertical component, leaving the ground-plane part.
    pub fn project_on_ground(self) -> Vec3 {
        Vec3 {
            x: self.x,
            y: 0.0,
            z: self.z,
        }
    }
}

/// Expresses `point` in the ground-plane frame whose +Z axis is
/// `forward`. Used by the oriented probe-box overlap test. `forward`
/// is assumed to be a unit ground-plane vector; a degenerate forward
/// leaves the point untouched.
pub fn into_frame(forward: Vec3, point: Vec3) -> Vec3 {
    let flat = forward.project_on_ground();
    let len_sq = flat.length_sq();
    if len_sq <= 0.0 {
        return point;
    }
    let fwd = flat.scale(len_sq.sqrt().recip());
    // Right-hand basis on the ground plane: right = forward x up.
    let right = Vec3 {
        x: fwd.z,
        y: 0.0,
        z: -fwd.x,
    };
    Vec3 {
        x: point.dot(right),
        y: point.y,
        z: point.dot(fwd),
    }
}
