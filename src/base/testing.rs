use crate::material::{InternalVariables, Variable};
use russell_lab::{mat_eigen_sym, mat_max_abs_diff, Matrix, Vector};
use russell_tensor::{Mandel, Tensor2};

/// Returns the largest absolute difference between a square matrix and its transpose
pub(crate) fn asymmetry(a: &Matrix) -> f64 {
    let mut at = Matrix::new(a.ncol(), a.nrow());
    for i in 0..a.nrow() {
        for j in 0..a.ncol() {
            at.set(j, i, a.get(i, j));
        }
    }
    match mat_max_abs_diff(a, &at) {
        Ok((_, _, diff)) => diff,
        Err(_) => f64::INFINITY,
    }
}

/// Checks whether a symmetric matrix is positive-definite by computing its eigenvalues
pub(crate) fn is_positive_definite(a: &Matrix) -> bool {
    let n = a.nrow();
    let mut work = a.clone();
    let mut l = Vector::new(n);
    if mat_eigen_sym(&mut l, &mut work, false).is_err() {
        return false;
    }
    l.as_data().iter().all(|v| *v > 0.0)
}

/// Sets the deformation gradient and its determinant at all quadrature points
pub(crate) fn set_deformation(vars: &mut InternalVariables, ff: &[[f64; 3]; 3]) {
    let f = vars.tensor_slot(Variable::DeformationGradient).unwrap();
    let det_f = vars.scalar_slot(Variable::DetF).unwrap();
    let tensor = Tensor2::from_matrix(ff, Mandel::General).unwrap();
    for p in 0..vars.n_point() {
        vars.state_mut(p).tensor_mut(f).set_tensor(1.0, &tensor);
        vars.state_mut(p).set_scalar(det_f, tensor.determinant());
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{asymmetry, is_positive_definite};
    use russell_lab::Matrix;

    #[test]
    fn functions_work() {
        let a = Matrix::from(&[[4.0, 1.0], [1.0, 3.0]]);
        assert_eq!(asymmetry(&a), 0.0);
        assert!(is_positive_definite(&a));
        let b = Matrix::from(&[[1.0, 2.0], [2.0, 1.0]]);
        assert!(!is_positive_definite(&b));
        let c = Matrix::from(&[[1.0, 2.0], [0.5, 1.0]]);
        assert_eq!(asymmetry(&c), 1.5);
    }
}
