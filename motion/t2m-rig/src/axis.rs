//! Axis conventions and the conversion matrices between them
//!
//! A convention is described by which signed axis points "forward" and which
//! points "up". The right axis follows from `forward × up`, so every
//! conversion produced here is a proper rotation.
//!
//! # Conventions used by this crate
//!
//! - Host (Blender-style) rigs: forward = +Y, up = +Z
//! - Text2Motion skeletons: forward = -Z, up = +Y
//!
//! ```rust
//! use glam::Vec3;
//! use t2m_rig::axis::{blender_to_t2m, t2m_to_blender};
//!
//! let forward = blender_to_t2m().transform_vector3(Vec3::Y);
//! assert!(forward.abs_diff_eq(Vec3::NEG_Z, 1e-6));
//!
//! let back = t2m_to_blender().transform_vector3(forward);
//! assert!(back.abs_diff_eq(Vec3::Y, 1e-6));
//! ```

use std::fmt;
use std::str::FromStr;

use glam::{Mat3, Mat4, Vec3};

use crate::error::{Result, RigError};

/// A signed coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    NegX,
    NegY,
    NegZ,
}

impl Axis {
    /// Unit vector pointing along this axis
    pub fn to_vec3(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
            Axis::NegX => Vec3::NEG_X,
            Axis::NegY => Vec3::NEG_Y,
            Axis::NegZ => Vec3::NEG_Z,
        }
    }

    /// Index of the unsigned axis (0 = X, 1 = Y, 2 = Z)
    fn index(self) -> usize {
        match self {
            Axis::X | Axis::NegX => 0,
            Axis::Y | Axis::NegY => 1,
            Axis::Z | Axis::NegZ => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
            Axis::NegX => "-X",
            Axis::NegY => "-Y",
            Axis::NegZ => "-Z",
        };
        f.write_str(name)
    }
}

impl FromStr for Axis {
    type Err = RigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "X" | "+X" => Ok(Axis::X),
            "Y" | "+Y" => Ok(Axis::Y),
            "Z" | "+Z" => Ok(Axis::Z),
            "-X" => Ok(Axis::NegX),
            "-Y" => Ok(Axis::NegY),
            "-Z" => Ok(Axis::NegZ),
            _ => Err(RigError::UnknownAxis(s.to_string())),
        }
    }
}

/// Forward/up pair describing a coordinate convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisConvention {
    pub forward: Axis,
    pub up: Axis,
}

impl AxisConvention {
    /// Host rig convention: forward = +Y, up = +Z
    pub const BLENDER: Self = Self {
        forward: Axis::Y,
        up: Axis::Z,
    };

    /// Text2Motion skeleton convention: forward = -Z, up = +Y
    pub const T2M: Self = Self {
        forward: Axis::NegZ,
        up: Axis::Y,
    };

    pub const fn new(forward: Axis, up: Axis) -> Self {
        Self { forward, up }
    }

    /// Orthonormal basis with columns (right, forward, up)
    fn basis(&self) -> Result<Mat3> {
        if self.forward.index() == self.up.index() {
            return Err(RigError::InvalidAxes {
                forward: self.forward.to_string(),
                up: self.up.to_string(),
            });
        }
        let forward = self.forward.to_vec3();
        let up = self.up.to_vec3();
        Ok(Mat3::from_cols(forward.cross(up), forward, up))
    }
}

/// Build the rotation taking vectors expressed in `from` into `to`
///
/// The returned matrix maps `from.forward` onto `to.forward` and `from.up`
/// onto `to.up`.
pub fn axis_conversion(from: AxisConvention, to: AxisConvention) -> Result<Mat3> {
    let from_basis = from.basis()?;
    let to_basis = to.basis()?;
    if from == to {
        return Ok(Mat3::IDENTITY);
    }
    // Bases are orthonormal, so the transpose is the inverse
    Ok(to_basis * from_basis.transpose())
}

/// 4x4 conversion from the host convention to the Text2Motion convention
pub fn blender_to_t2m() -> Mat4 {
    // Same as axis_conversion(BLENDER, T2M): (x, y, z) -> (x, z, -y)
    Mat4::from_mat3(Mat3::from_cols(Vec3::X, Vec3::NEG_Z, Vec3::Y))
}

/// 4x4 conversion from the Text2Motion convention back to the host convention
pub fn t2m_to_blender() -> Mat4 {
    Mat4::from_mat3(Mat3::from_cols(Vec3::X, Vec3::Z, Vec3::NEG_Y))
}
