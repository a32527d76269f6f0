//! Matrix and quaternion helpers shared by extraction and import

use glam::{Mat3, Mat4, Quat};

/// Diagonal nudge applied before retrying the inversion of a singular matrix
const SINGULAR_NUDGE: f32 = 1e-8;

/// Invert a matrix without ever failing
///
/// Singular matrices (for example a bone scaled to zero on one axis) get a
/// tiny value added to the rotation diagonal and are inverted again. If that
/// still fails the identity is returned.
pub fn inverse_or_fallback(m: &Mat4) -> Mat4 {
    if is_invertible(m) {
        return m.inverse();
    }

    let mut nudged = *m;
    nudged.x_axis.x += SINGULAR_NUDGE;
    nudged.y_axis.y += SINGULAR_NUDGE;
    nudged.z_axis.z += SINGULAR_NUDGE;
    if is_invertible(&nudged) {
        let inverse = nudged.inverse();
        if inverse.is_finite() {
            return inverse;
        }
    }

    log::debug!("Matrix is singular, falling back to identity");
    Mat4::IDENTITY
}

fn is_invertible(m: &Mat4) -> bool {
    let det = m.determinant();
    det != 0.0 && det.is_finite()
}

/// Flatten a matrix into 16 floats, column by column
pub fn matrix_to_list(m: &Mat4) -> [f32; 16] {
    m.to_cols_array()
}

/// Rebuild a matrix from 16 column-major floats
pub fn matrix_from_list(values: &[f32; 16]) -> Mat4 {
    Mat4::from_cols_array(values)
}

/// Decode a wire quaternion stored as `[x, y, z, w]`
///
/// The result is normalized; a zero-length input decodes to the identity.
pub fn quat_from_wire(xyzw: [f32; 4]) -> Quat {
    let [x, y, z, w] = xyzw;
    let q = Quat::from_xyzw(x, y, z, w);
    let length = q.length();
    if length > 0.0 && length.is_finite() {
        q / length
    } else {
        Quat::IDENTITY
    }
}

/// Encode a quaternion in host component order `[w, x, y, z]`
pub fn quat_to_wxyz(q: Quat) -> [f32; 4] {
    [q.w, q.x, q.y, q.z]
}

/// Extract the rotation part of a 4x4 matrix
///
/// Each axis of the upper 3x3 block is normalized first so that scaled rest
/// matrices still produce a unit quaternion.
pub fn rotation_of(m: &Mat4) -> Quat {
    let x = m.x_axis.truncate().normalize_or_zero();
    let y = m.y_axis.truncate().normalize_or_zero();
    let z = m.z_axis.truncate().normalize_or_zero();
    if x == glam::Vec3::ZERO || y == glam::Vec3::ZERO || z == glam::Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}
