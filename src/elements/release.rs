//! Release - translational spring connector between two nodes

use super::element::{ElementKind, ElementMatrices, FrameElement};
use super::Node;
use crate::error::{FrameError, FrameResult};
use crate::math::{address_table, orientation_matrix, Mat, Vector};

/// Couples the translations of two nodes with stiffness `k` and leaves the
/// rotations uncoupled, making the connection a hinge.
#[derive(Debug, Clone)]
pub struct Release {
    id: usize,
    start: usize,
    end: usize,
    stiffness: f64,
    matrices: Option<ElementMatrices>,
}

impl Release {
    pub const DEFAULT_STIFFNESS: f64 = 1.0;

    pub fn new(id: usize, start: usize, end: usize) -> Self {
        Self {
            id,
            start,
            end,
            stiffness: Self::DEFAULT_STIFFNESS,
            matrices: None,
        }
    }

    /// Set the translational coupling stiffness
    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    fn local_stiffness(&self) -> Mat {
        let k = self.stiffness;
        let mut m = Mat::zeros(12, 12);
        for i in 0..3 {
            m[(i, i)] = k;
            m[(i + 6, i + 6)] = k;
            m[(i, i + 6)] = -k;
            m[(i + 6, i)] = -k;
        }
        m
    }
}

impl FrameElement for Release {
    fn id(&self) -> usize {
        self.id
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Release
    }

    fn node_indices(&self) -> Vec<usize> {
        vec![self.start, self.end]
    }

    fn compute_matrices(&mut self, nodes: &[Node]) -> FrameResult<()> {
        let start = nodes.get(self.start).ok_or(FrameError::NodeNotFound(self.start))?;
        let end = nodes.get(self.end).ok_or(FrameError::NodeNotFound(self.end))?;

        self.matrices = Some(ElementMatrices {
            address_table: address_table(&[self.start, self.end]),
            rotation: orientation_matrix(&start.coords(), &end.coords(), 2),
            local_stiffness: self.local_stiffness(),
            equivalent_forces: Vector::zeros(12),
        });
        Ok(())
    }

    fn matrices(&self) -> Option<&ElementMatrices> {
        self.matrices.as_ref()
    }

    fn recover_internal_forces(&mut self, _nodes: &[Node]) -> FrameResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_translational_coupling_only() {
        let nodes = vec![Node::new(0, 0.0, 0.0, 0.0), Node::new(1, 0.0, 0.0, 0.0)];
        let mut release = Release::new(0, 0, 1).with_stiffness(5.0);
        release.compute_matrices(&nodes).unwrap();
        let k = release.global_stiffness_matrix().unwrap();

        assert_eq!(k[(0, 0)], 5.0);
        assert_eq!(k[(2, 8)], -5.0);
        for r in [3, 4, 5, 9, 10, 11] {
            assert!(k.row(r).iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_rotation_invariant() {
        // Isotropic coupling looks the same for any orientation
        let nodes = vec![Node::new(0, 0.0, 0.0, 0.0), Node::new(1, 1.0, 2.0, -1.0)];
        let mut release = Release::new(0, 0, 1);
        release.compute_matrices(&nodes).unwrap();
        let k = release.global_stiffness_matrix().unwrap();
        assert_relative_eq!(k, release.local_stiffness(), epsilon = 1e-12);
        assert_eq!(release.stiffness(), Release::DEFAULT_STIFFNESS);
    }
}
