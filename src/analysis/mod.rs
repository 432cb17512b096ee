//! Analysis stages and options

use serde::{Deserialize, Serialize};

/// Pipeline stage of a [`FrameSystem`](crate::system::FrameSystem).
///
/// Each solve step moves the system exactly one stage forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SolveStage {
    /// Freshly built, nothing computed
    Unassembled,
    /// Every element has cached its local matrices
    LocalMatricesComputed,
    /// Global stiffness matrix and force vector are assembled
    GloballyAssembled,
    /// Restraints eliminated from a copy of the global system
    BoundaryApplied,
    /// Displacements and reactions distributed to nodes
    Solved,
    /// Element internal forces recovered
    PostProcessed,
}

impl Default for SolveStage {
    fn default() -> Self {
        Self::Unassembled
    }
}

/// Dense linear solver used on the restrained global system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    /// LU decomposition with partial pivoting
    Lu,
    /// Cholesky decomposition (symmetric positive definite systems)
    Cholesky,
}

impl Default for SolverKind {
    fn default() -> Self {
        Self::Lu
    }
}

/// Options for a linear static solve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Compute element matrices and recover stresses in parallel
    pub parallel: bool,
    /// Linear solver for the restrained system
    pub solver: SolverKind,
    /// Smallest accepted ratio between the smallest and largest LU pivot
    pub singularity_tolerance: f64,
    /// Check global force balance after the solve
    pub check_statics: bool,
    /// Relative tolerance for the force balance check
    pub statics_tolerance: f64,
    /// Number of stations used when sampling beam diagrams
    pub diagram_points: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            solver: SolverKind::Lu,
            singularity_tolerance: 1e-14,
            check_statics: true,
            statics_tolerance: 1e-6,
            diagram_points: 11,
        }
    }
}

impl AnalysisOptions {
    /// Default options (parallel, LU)
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every element step on the calling thread
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Select the linear solver
    pub fn with_solver(mut self, solver: SolverKind) -> Self {
        self.solver = solver;
        self
    }

    /// Set the pivot ratio under which the system is reported singular
    pub fn with_singularity_tolerance(mut self, tol: f64) -> Self {
        self.singularity_tolerance = tol;
        self
    }

    /// Enable or disable the force balance check
    pub fn with_statics_check(mut self, enabled: bool) -> Self {
        self.check_statics = enabled;
        self
    }

    /// Set the number of stations for sampled beam diagrams (at least 2)
    pub fn with_diagram_points(mut self, points: usize) -> Self {
        self.diagram_points = points.max(2);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_ordering() {
        assert!(SolveStage::Unassembled < SolveStage::LocalMatricesComputed);
        assert!(SolveStage::Solved < SolveStage::PostProcessed);
    }

    #[test]
    fn test_options_deserialize_partial() {
        let opts: AnalysisOptions =
            serde_json::from_str(r#"{"parallel": false, "solver": "cholesky"}"#).unwrap();
        assert!(!opts.parallel);
        assert_eq!(opts.solver, SolverKind::Cholesky);
        assert_eq!(opts.diagram_points, 11);
    }

    #[test]
    fn test_diagram_points_floor() {
        let opts = AnalysisOptions::new().with_diagram_points(0);
        assert_eq!(opts.diagram_points, 2);
    }
}
