//! Dense linear solvers for the restrained global system

use super::{Mat, Vector};
use crate::analysis::{AnalysisOptions, SolverKind};
use crate::error::{FrameError, FrameResult};

/// Solves `a · x = b` for a square system
pub trait LinearSolver: Send + Sync {
    fn solve(&self, a: &Mat, b: &Vector) -> FrameResult<Vector>;

    fn name(&self) -> &'static str;
}

fn ensure_finite<'a>(
    values: impl IntoIterator<Item = &'a f64>,
    what: &'static str,
) -> FrameResult<()> {
    if values.into_iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(FrameError::NonFinite(what))
    }
}

fn check_inputs(a: &Mat, b: &Vector) -> FrameResult<()> {
    ensure_finite(a.iter(), "matrix")?;
    ensure_finite(b.iter(), "right-hand side")
}

/// LU decomposition with partial pivoting.
///
/// Rejects the system when the smallest pivot is negligible next to the
/// largest one.
#[derive(Debug, Clone, Copy)]
pub struct LuSolver {
    pub singularity_tolerance: f64,
}

impl LinearSolver for LuSolver {
    fn solve(&self, a: &Mat, b: &Vector) -> FrameResult<Vector> {
        check_inputs(a, b)?;
        let lu = a.clone().lu();

        let u = lu.u();
        let (min_pivot, max_pivot) = u
            .diagonal()
            .iter()
            .fold((f64::INFINITY, 0.0_f64), |(lo, hi), p| (lo.min(p.abs()), hi.max(p.abs())));
        if max_pivot == 0.0 || min_pivot / max_pivot < self.singularity_tolerance {
            return Err(FrameError::SingularMatrix);
        }

        let x = lu.solve(b).ok_or(FrameError::SingularMatrix)?;
        ensure_finite(x.iter(), "solution")?;
        Ok(x)
    }

    fn name(&self) -> &'static str {
        "lu"
    }
}

/// Cholesky decomposition for symmetric positive definite systems
#[derive(Debug, Clone, Copy, Default)]
pub struct CholeskySolver;

impl LinearSolver for CholeskySolver {
    fn solve(&self, a: &Mat, b: &Vector) -> FrameResult<Vector> {
        check_inputs(a, b)?;
        let x = a
            .clone()
            .cholesky()
            .map(|chol| chol.solve(b))
            .ok_or(FrameError::NotPositiveDefinite)?;
        ensure_finite(x.iter(), "solution")?;
        Ok(x)
    }

    fn name(&self) -> &'static str {
        "cholesky"
    }
}

/// Solver selected by the analysis options
pub fn solver_for(options: &AnalysisOptions) -> Box<dyn LinearSolver> {
    match options.solver {
        SolverKind::Lu => Box::new(LuSolver {
            singularity_tolerance: options.singularity_tolerance,
        }),
        SolverKind::Cholesky => Box::new(CholeskySolver),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spd() -> (Mat, Vector) {
        let a = Mat::from_row_slice(3, 3, &[4.0, -1.0, 0.0, -1.0, 4.0, -1.0, 0.0, -1.0, 4.0]);
        let b = Vector::from_column_slice(&[3.0, 2.0, 3.0]);
        (a, b)
    }

    #[test]
    fn test_lu_and_cholesky_agree() {
        let (a, b) = spd();
        let x_lu = LuSolver { singularity_tolerance: 1e-14 }.solve(&a, &b).unwrap();
        let x_ch = CholeskySolver.solve(&a, &b).unwrap();
        assert_relative_eq!(x_lu, x_ch, epsilon = 1e-12);
        assert_relative_eq!(&a * &x_lu, b, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_rejected() {
        let a = Mat::from_row_slice(2, 2, &[1.0, -1.0, -1.0, 1.0]);
        let b = Vector::from_column_slice(&[1.0, -1.0]);
        let lu = LuSolver { singularity_tolerance: 1e-14 };
        assert!(matches!(lu.solve(&a, &b), Err(FrameError::SingularMatrix)));

        let indefinite = Mat::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        assert!(matches!(
            CholeskySolver.solve(&indefinite, &b),
            Err(FrameError::NotPositiveDefinite)
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let lu = LuSolver { singularity_tolerance: 1e-14 };
        let (mut a, b) = spd();
        a[(1, 1)] = f64::NAN;
        assert!(matches!(lu.solve(&a, &b), Err(FrameError::NonFinite("matrix"))));
        assert!(matches!(CholeskySolver.solve(&a, &b), Err(FrameError::NonFinite("matrix"))));

        let (a, mut b) = spd();
        b[2] = f64::INFINITY;
        assert!(matches!(lu.solve(&a, &b), Err(FrameError::NonFinite("right-hand side"))));
        assert!(matches!(
            CholeskySolver.solve(&a, &b),
            Err(FrameError::NonFinite("right-hand side"))
        ));

        // Finite inputs whose solution overflows
        let a = Mat::from_row_slice(2, 2, &[1e-300, 0.0, 0.0, 1e-300]);
        let b = Vector::from_column_slice(&[1e300, 1e300]);
        assert!(matches!(CholeskySolver.solve(&a, &b), Err(FrameError::NonFinite("solution"))));
        assert!(matches!(lu.solve(&a, &b), Err(FrameError::NonFinite("solution"))));
    }

    #[test]
    fn test_solver_for_options() {
        let options = AnalysisOptions::default().with_solver(SolverKind::Cholesky);
        assert_eq!(solver_for(&options).name(), "cholesky");
        assert_eq!(solver_for(&AnalysisOptions::default()).name(), "lu");
    }
}
