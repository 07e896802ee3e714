//! Minimal 3-D vector and rotation primitives shared by the mutation
//! builders and the plane-fitting code, on top of nalgebra.

pub mod eigen;
pub mod pca;

use nalgebra::{Rotation3, Unit, Vector3};
use thiserror::Error;

/// Vectors shorter than this are considered degenerate.
pub const DEGENERATE_NORM: f64 = 1e-12;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("cannot normalize a zero-length vector")]
    ZeroLengthVector,
    #[error("plane fitting requires at least 3 points (got {0})")]
    NotEnoughPoints(usize),
}

/// Checked unit-normalization.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroLengthVector`] for inputs below
/// [`DEGENERATE_NORM`].
pub fn unit(v: &Vector3<f64>) -> Result<Unit<Vector3<f64>>, GeometryError> {
    Unit::try_new(*v, DEGENERATE_NORM).ok_or(GeometryError::ZeroLengthVector)
}

/// Rotates `v` about a unit axis by `angle` radians (Rodrigues' formula).
pub fn rotate_about_axis(
    v: &Vector3<f64>,
    axis: &Unit<Vector3<f64>>,
    angle: f64,
) -> Vector3<f64> {
    Rotation3::from_axis_angle(axis, angle) * v
}

/// The component of `v` perpendicular to a unit axis.
pub fn perpendicular_component(v: &Vector3<f64>, axis: &Unit<Vector3<f64>>) -> Vector3<f64> {
    v - axis.as_ref() * axis.dot(v)
}

/// A coordinate axis guaranteed not to be parallel to `v`, used as a
/// last-resort reference direction when no structural one is available.
pub fn fallback_reference(v: &Vector3<f64>) -> Vector3<f64> {
    if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    }
}

/// A second fallback for the rare case where the first one is also (near)
/// parallel to `v`.
pub fn second_fallback_reference(v: &Vector3<f64>) -> Vector3<f64> {
    if v.y.abs() < 0.9 {
        Vector3::y()
    } else {
        Vector3::z()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_rejects_zero_vector() {
        assert!(matches!(
            unit(&Vector3::zeros()),
            Err(GeometryError::ZeroLengthVector)
        ));
        let u = unit(&Vector3::new(0.0, 3.0, 4.0)).unwrap();
        assert!((u.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rotation_about_z_by_quarter_turn() {
        let axis = unit(&Vector3::z()).unwrap();
        let rotated = rotate_about_axis(&Vector3::x(), &axis, std::f64::consts::FRAC_PI_2);
        assert!((rotated - Vector3::y()).norm() < 1e-12);
    }

    #[test]
    fn rotation_preserves_norm_and_axis_component() {
        let axis = unit(&Vector3::new(1.0, 1.0, 1.0)).unwrap();
        let v = Vector3::new(0.3, -2.0, 1.5);
        let rotated = rotate_about_axis(&v, &axis, 2.0 * std::f64::consts::FRAC_PI_3);
        assert!((rotated.norm() - v.norm()).abs() < 1e-12);
        assert!((axis.dot(&rotated) - axis.dot(&v)).abs() < 1e-12);
    }

    #[test]
    fn perpendicular_component_is_orthogonal_to_axis() {
        let axis = unit(&Vector3::new(0.0, 0.0, 2.0)).unwrap();
        let v = Vector3::new(1.0, 2.0, 3.0);
        let perp = perpendicular_component(&v, &axis);
        assert!(axis.dot(&perp).abs() < 1e-12);
        assert!((perp - Vector3::new(1.0, 2.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn fallback_references_are_never_parallel() {
        for v in [Vector3::x(), Vector3::y(), Vector3::z()] {
            let r = fallback_reference(&v);
            assert!(v.cross(&r).norm() > 0.1);
        }
    }
}
