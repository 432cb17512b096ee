//! Curved beam - three-node element without a stiffness formulation yet

use log::warn;

use super::element::{ElementKind, ElementMatrices, FrameElement};
use super::{ElementProperties, Node};
use crate::error::{FrameError, FrameResult};
use crate::math::{address_table, orientation_matrix, Mat, Vector};

/// A beam curving from `start` through `center` to `end`.
///
/// Contributes an 18x18 zero stiffness and no equivalent forces, so a system
/// made of curved beams alone is singular.
#[derive(Debug, Clone)]
pub struct CurvedBeam {
    id: usize,
    start: usize,
    center: usize,
    end: usize,
    pub properties: ElementProperties,
    matrices: Option<ElementMatrices>,
}

impl CurvedBeam {
    pub fn new(id: usize, start: usize, center: usize, end: usize, properties: ElementProperties) -> Self {
        Self {
            id,
            start,
            center,
            end,
            properties,
            matrices: None,
        }
    }

    pub fn center_node(&self) -> usize {
        self.center
    }
}

impl FrameElement for CurvedBeam {
    fn id(&self) -> usize {
        self.id
    }

    fn kind(&self) -> ElementKind {
        ElementKind::CurvedBeam
    }

    fn node_indices(&self) -> Vec<usize> {
        vec![self.start, self.center, self.end]
    }

    fn compute_matrices(&mut self, nodes: &[Node]) -> FrameResult<()> {
        for index in self.node_indices() {
            if index >= nodes.len() {
                return Err(FrameError::NodeNotFound(index));
            }
        }
        let start = nodes[self.start].coords();
        let end = nodes[self.end].coords();

        warn!(
            "Curved beam {} has no stiffness formulation; it contributes nothing to the system",
            self.id
        );

        self.matrices = Some(ElementMatrices {
            address_table: address_table(&self.node_indices()),
            rotation: orientation_matrix(&start, &end, 3),
            local_stiffness: Mat::zeros(18, 18),
            equivalent_forces: Vector::zeros(18),
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
