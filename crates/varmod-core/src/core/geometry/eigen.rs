use nalgebra::{Matrix3, Vector3};

/// Off-diagonal magnitude below which the matrix counts as diagonalized.
pub const CONVERGENCE_EPS: f64 = 1e-12;

/// Iteration cap; covariance matrices from real point data converge in far
/// fewer rotations, so hitting the cap returns the best approximation
/// achieved rather than failing.
pub const MAX_ITERATIONS: usize = 50;

const OFF_DIAGONAL_PAIRS: [(usize, usize); 3] = [(0, 1), (0, 2), (1, 2)];

/// Eigen-decomposition of a real symmetric 3x3 matrix via cyclic Jacobi
/// rotations.
///
/// Each iteration zeroes the largest-magnitude off-diagonal element and
/// accumulates the rotation into an orthonormal eigenvector matrix. Returns
/// the eigenvalues (matrix diagonal after convergence) and the eigenvectors
/// as the columns of the second result, in matching but unsorted order.
pub fn jacobi_eigen(mut a: Matrix3<f64>) -> (Vector3<f64>, Matrix3<f64>) {
    let mut v = Matrix3::identity();

    for _ in 0..MAX_ITERATIONS {
        let (p, q) = OFF_DIAGONAL_PAIRS
            .into_iter()
            .max_by(|&(i1, j1), &(i2, j2)| {
                a[(i1, j1)]
                    .abs()
                    .partial_cmp(&a[(i2, j2)].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or((0, 1));

        if a[(p, q)].abs() < CONVERGENCE_EPS {
            break;
        }

        let app = a[(p, p)];
        let aqq = a[(q, q)];
        let apq = a[(p, q)];

        let phi = 0.5 * (2.0 * apq).atan2(aqq - app);
        let (s, c) = phi.sin_cos();

        for i in 0..3 {
            if i == p || i == q {
                continue;
            }
            let aip = a[(i, p)];
            let aiq = a[(i, q)];
            a[(i, p)] = c * aip - s * aiq;
            a[(p, i)] = a[(i, p)];
            a[(i, q)] = s * aip + c * aiq;
            a[(q, i)] = a[(i, q)];
        }

        a[(p, p)] = c * c * app - 2.0 * s * c * apq + s * s * aqq;
        a[(q, q)] = s * s * app + 2.0 * s * c * apq + c * c * aqq;
        a[(p, q)] = 0.0;
        a[(q, p)] = 0.0;

        for i in 0..3 {
            let vip = v[(i, p)];
            let viq = v[(i, q)];
            v[(i, p)] = c * vip - s * viq;
            v[(i, q)] = s * vip + c * viq;
        }
    }

    (Vector3::new(a[(0, 0)], a[(1, 1)], a[(2, 2)]), v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_matrix_is_already_solved() {
        let m = Matrix3::from_diagonal(&Vector3::new(3.0, -1.0, 7.5));
        let (values, vectors) = jacobi_eigen(m);
        assert!((values - Vector3::new(3.0, -1.0, 7.5)).norm() < 1e-9);
        assert!((vectors - Matrix3::identity()).norm() < 1e-9);
    }

    #[test]
    fn reconstructs_input_from_eigenpairs() {
        let m = Matrix3::new(2.0, 1.0, 0.5, 1.0, 3.0, -0.25, 0.5, -0.25, 1.5);
        let (values, vectors) = jacobi_eigen(m);
        let reconstructed = vectors * Matrix3::from_diagonal(&values) * vectors.transpose();
        assert!((reconstructed - m).norm() < 1e-9);
    }

    #[test]
    fn eigenvectors_are_orthonormal() {
        let m = Matrix3::new(4.0, -2.0, 1.0, -2.0, 5.0, 0.3, 1.0, 0.3, 6.0);
        let (_, vectors) = jacobi_eigen(m);
        let gram = vectors.transpose() * vectors;
        assert!((gram - Matrix3::identity()).norm() < 1e-9);
    }

    #[test]
    fn known_two_by_two_block_eigenvalues() {
        // [[2,1,0],[1,2,0],[0,0,5]] has eigenvalues 1, 3, 5.
        let m = Matrix3::new(2.0, 1.0, 0.0, 1.0, 2.0, 0.0, 0.0, 0.0, 5.0);
        let (values, _) = jacobi_eigen(m);
        let mut sorted = [values.x, values.y, values.z];
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((sorted[0] - 1.0).abs() < 1e-9);
        assert!((sorted[1] - 3.0).abs() < 1e-9);
        assert!((sorted[2] - 5.0).abs() < 1e-9);
    }
}
