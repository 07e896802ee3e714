use super::eigen::jacobi_eigen;
use super::{GeometryError, unit};
use nalgebra::{Matrix3, Point3, Vector3};

/// An orthonormal, right-handed basis fitted to a 3-D point cloud.
///
/// `normal` is the direction of least variance (the plane normal), `u` the
/// direction of greatest variance, and `v` completes the right-handed triple
/// (`u x v = normal` up to construction order). Eigenvalues are ascending.
#[derive(Debug, Clone)]
pub struct PlaneBasis {
    pub centroid: Point3<f64>,
    pub u: Vector3<f64>,
    pub v: Vector3<f64>,
    pub normal: Vector3<f64>,
    pub eigenvalues: [f64; 3],
}

impl PlaneBasis {
    /// Projects a point onto the two in-plane axes.
    pub fn project(&self, point: &Point3<f64>) -> (f64, f64) {
        let coords = point.coords;
        (self.u.dot(&coords), self.v.dot(&coords))
    }
}

/// In-plane bounding extents of a projected point set.
#[derive(Debug, Clone, Copy)]
pub struct PlanarExtents {
    pub min_u: f64,
    pub max_u: f64,
    pub min_v: f64,
    pub max_v: f64,
}

impl PlanarExtents {
    pub fn du(&self) -> f64 {
        self.max_u - self.min_u
    }

    pub fn dv(&self) -> f64 {
        self.max_v - self.min_v
    }
}

/// Fits a best-fit plane to at least 3 points by principal component
/// analysis.
///
/// Computes centroid and covariance, diagonalizes via the Jacobi solver,
/// sorts the eigenpairs ascending, and re-orthogonalizes the in-plane axes
/// with cross products so the returned basis is exactly orthonormal even
/// when the solver stops at its iteration cap. If the largest-variance
/// eigenvector is numerically parallel to the normal (|cos| > 0.9, which
/// only happens for ill-posed clouds), the medium-variance one substitutes.
///
/// # Errors
///
/// Returns [`GeometryError::NotEnoughPoints`] for fewer than 3 points.
pub fn fit_plane(points: &[Point3<f64>]) -> Result<PlaneBasis, GeometryError> {
    if points.len() < 3 {
        return Err(GeometryError::NotEnoughPoints(points.len()));
    }

    let n = points.len() as f64;
    let centroid = Point3::from(points.iter().map(|p| p.coords).sum::<Vector3<f64>>() / n);

    let mut cov = Matrix3::zeros();
    for point in points {
        let d = point - centroid;
        cov += d * d.transpose();
    }
    cov /= n;

    let (values, vectors) = jacobi_eigen(cov);
    let mut pairs: Vec<(f64, Vector3<f64>)> = (0..3)
        .map(|i| (values[i], vectors.column(i).into_owned()))
        .collect();
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let normal = unit(&pairs[0].1)?.into_inner();
    let mut u = unit(&pairs[2].1)?.into_inner();
    if u.dot(&normal).abs() > 0.9 {
        u = unit(&pairs[1].1)?.into_inner();
    }
    let v = unit(&normal.cross(&u))?.into_inner();
    let u = unit(&v.cross(&normal))?.into_inner();

    Ok(PlaneBasis {
        centroid,
        u,
        v,
        normal,
        eigenvalues: [pairs[0].0, pairs[1].0, pairs[2].0],
    })
}

/// Projects every point onto the in-plane axes and takes min/max, the
/// consumer contract for patch sizing. Returns `None` for an empty set.
pub fn planar_extents(basis: &PlaneBasis, points: &[Point3<f64>]) -> Option<PlanarExtents> {
    let mut extents: Option<PlanarExtents> = None;
    for point in points {
        let (pu, pv) = basis.project(point);
        extents = Some(match extents {
            None => PlanarExtents {
                min_u: pu,
                max_u: pu,
                min_v: pv,
                max_v: pv,
            },
            Some(e) => PlanarExtents {
                min_u: e.min_u.min(pu),
                max_u: e.max_u.max(pu),
                min_v: e.min_v.min(pv),
                max_v: e.max_v.max(pv),
            },
        });
    }
    extents
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tilted_plane_points() -> Vec<Point3<f64>> {
        // A grid on the plane z = 0.5x + 0.25y + 2 with slight noise-free
        // structure: du along x spans wider than dv along y.
        let mut points = Vec::new();
        for i in 0..10 {
            for j in 0..5 {
                let x = i as f64 * 2.0;
                let y = j as f64;
                points.push(Point3::new(x, y, 0.5 * x + 0.25 * y + 2.0));
            }
        }
        points
    }

    fn assert_orthonormal(basis: &PlaneBasis) {
        assert!((basis.u.norm() - 1.0).abs() < 1e-9);
        assert!((basis.v.norm() - 1.0).abs() < 1e-9);
        assert!((basis.normal.norm() - 1.0).abs() < 1e-9);
        assert!(basis.u.dot(&basis.v).abs() < 1e-9);
        assert!(basis.u.dot(&basis.normal).abs() < 1e-9);
        assert!(basis.v.dot(&basis.normal).abs() < 1e-9);
        assert!((basis.u.cross(&basis.v) - basis.normal).norm() < 1e-6);
    }

    #[test]
    fn basis_is_right_handed_and_orthonormal() {
        let basis = fit_plane(&tilted_plane_points()).unwrap();
        assert_orthonormal(&basis);
    }

    #[test]
    fn normal_matches_the_generating_plane() {
        let basis = fit_plane(&tilted_plane_points()).unwrap();
        let expected = Vector3::new(-0.5, -0.25, 1.0).normalize();
        // Sign of the normal is arbitrary.
        assert!(basis.normal.dot(&expected).abs() > 1.0 - 1e-6);
    }

    #[test]
    fn eigenvalues_come_back_ascending() {
        let basis = fit_plane(&tilted_plane_points()).unwrap();
        assert!(basis.eigenvalues[0] <= basis.eigenvalues[1]);
        assert!(basis.eigenvalues[1] <= basis.eigenvalues[2]);
        // Points are exactly coplanar: least variance is ~0.
        assert!(basis.eigenvalues[0].abs() < 1e-9);
    }

    #[test]
    fn flat_xy_cloud_recovers_z_normal() {
        let points: Vec<Point3<f64>> = (0..20)
            .map(|i| Point3::new((i % 5) as f64, (i / 5) as f64, 0.0))
            .collect();
        let basis = fit_plane(&points).unwrap();
        assert!(basis.normal.z.abs() > 1.0 - 1e-9);
        assert_orthonormal(&basis);
    }

    #[test]
    fn too_few_points_is_a_domain_error() {
        let points = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        assert!(matches!(
            fit_plane(&points),
            Err(GeometryError::NotEnoughPoints(2))
        ));
    }

    #[test]
    fn extents_cover_the_projected_spread() {
        let points = tilted_plane_points();
        let basis = fit_plane(&points).unwrap();
        let extents = planar_extents(&basis, &points).unwrap();
        // The grid spans 18 A along its long direction and 4 A along the
        // short one (in-plane distances are slightly longer due to tilt).
        assert!(extents.du() >= 18.0);
        assert!(extents.dv() >= 4.0);
        assert!(planar_extents(&basis, &[]).is_none());
    }
}
