//! Element capability shared by every element kind

use serde::{Deserialize, Serialize};

use super::{Beam, CurvedBeam, Node, Release};
use crate::error::{FrameError, FrameResult};
use crate::math::{Mat, Vector, DOFS_PER_NODE};

/// Element kind tag, as written in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Beam,
    #[serde(rename = "Curved Beam")]
    CurvedBeam,
    Release,
}

/// Matrices cached by `FrameElement::compute_matrices`
#[derive(Debug, Clone)]
pub struct ElementMatrices {
    /// Global DOF of every local DOF
    pub address_table: Vec<usize>,
    /// Orientation matrix R (local → global)
    pub rotation: Mat,
    /// Local stiffness K_l
    pub local_stiffness: Mat,
    /// Local equivalent nodal forces f_l
    pub equivalent_forces: Vector,
}

impl ElementMatrices {
    /// R · K_l · Rᵗ
    pub fn global_stiffness(&self) -> Mat {
        &self.rotation * &self.local_stiffness * self.rotation.transpose()
    }

    /// R · f_l
    pub fn global_equivalent_forces(&self) -> Vector {
        &self.rotation * &self.equivalent_forces
    }

    /// Element displacements in global axes, gathered from the nodes
    pub fn global_displacements(&self, nodes: &[Node]) -> FrameResult<Vector> {
        let mut d = Vector::zeros(self.address_table.len());
        for (i, &dof) in self.address_table.iter().enumerate() {
            let node_index = dof / DOFS_PER_NODE;
            let node = nodes.get(node_index).ok_or(FrameError::NodeNotFound(node_index))?;
            d[i] = node.displacements[dof % DOFS_PER_NODE];
        }
        Ok(d)
    }

    /// Rᵗ · d_g
    pub fn local_displacements(&self, nodes: &[Node]) -> FrameResult<Vector> {
        Ok(self.rotation.transpose() * self.global_displacements(nodes)?)
    }
}

/// A structural element of the frame.
///
/// Matrix getters fail with `MatricesNotComputed` until `compute_matrices`
/// has run.
pub trait FrameElement: Send + Sync {
    fn id(&self) -> usize;

    fn kind(&self) -> ElementKind;

    /// Node indices in element order (start, [center,] end)
    fn node_indices(&self) -> Vec<usize>;

    /// Cache address table, orientation, local stiffness and local equivalent forces
    fn compute_matrices(&mut self, nodes: &[Node]) -> FrameResult<()>;

    fn matrices(&self) -> Option<&ElementMatrices>;

    /// Recover internal forces from the solved node displacements
    fn recover_internal_forces(&mut self, nodes: &[Node]) -> FrameResult<()>;

    fn computed_matrices(&self) -> FrameResult<&ElementMatrices> {
        self.matrices().ok_or(FrameError::MatricesNotComputed(self.id()))
    }

    fn global_stiffness_matrix(&self) -> FrameResult<Mat> {
        Ok(self.computed_matrices()?.global_stiffness())
    }

    fn global_equivalent_forces(&self) -> FrameResult<Vector> {
        Ok(self.computed_matrices()?.global_equivalent_forces())
    }

    fn address_table(&self) -> FrameResult<&[usize]> {
        Ok(&self.computed_matrices()?.address_table)
    }
}

/// Closed set of element kinds held by a `FrameSystem`
#[derive(Debug, Clone)]
pub enum Element {
    Beam(Beam),
    CurvedBeam(CurvedBeam),
    Release(Release),
}

impl Element {
    fn inner(&self) -> &dyn FrameElement {
        match self {
            Element::Beam(e) => e,
            Element::CurvedBeam(e) => e,
            Element::Release(e) => e,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn FrameElement {
        match self {
            Element::Beam(e) => e,
            Element::CurvedBeam(e) => e,
            Element::Release(e) => e,
        }
    }

    pub fn as_beam(&self) -> Option<&Beam> {
        match self {
            Element::Beam(beam) => Some(beam),
            _ => None,
        }
    }
}

impl FrameElement for Element {
    fn id(&self) -> usize {
        self.inner().id()
    }

    fn kind(&self) -> ElementKind {
        self.inner().kind()
    }

    fn node_indices(&self) -> Vec<usize> {
        self.inner().node_indices()
    }

    fn compute_matrices(&mut self, nodes: &[Node]) -> FrameResult<()> {
        self.inner_mut().compute_matrices(nodes)
    }

    fn matrices(&self) -> Option<&ElementMatrices> {
        self.inner().matrices()
    }

    fn recover_internal_forces(&mut self, nodes: &[Node]) -> FrameResult<()> {
        self.inner_mut().recover_internal_forces(nodes)
    }
}

impl From<Beam> for Element {
    fn from(beam: Beam) -> Self {
        Element::Beam(beam)
    }
}

impl From<CurvedBeam> for Element {
    fn from(beam: CurvedBeam) -> Self {
        Element::CurvedBeam(beam)
    }
}

impl From<Release> for Element {
    fn from(release: Release) -> Self {
        Element::Release(release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementProperties, Material, Section};

    fn nodes() -> Vec<Node> {
        vec![
            Node::new(0, 0.0, 0.0, 0.0),
            Node::new(1, 2.0, 0.0, 0.0),
            Node::new(2, 1.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_getters_before_compute_fail() {
        let props = ElementProperties::new(&Material::steel(), &Section::default());
        let element = Element::from(Beam::new(7, 0, 1, props));
        assert!(matches!(element.address_table(), Err(FrameError::MatricesNotComputed(7))));
        assert!(element.global_stiffness_matrix().is_err());
        assert!(element.global_equivalent_forces().is_err());
    }

    #[test]
    fn test_address_tables_per_kind() {
        let props = ElementProperties::new(&Material::steel(), &Section::default());
        let nodes = nodes();
        let mut elements = vec![
            Element::from(Beam::new(0, 1, 2, props)),
            Element::from(CurvedBeam::new(1, 0, 2, 1, props)),
            Element::from(Release::new(2, 0, 1)),
        ];
        for element in &mut elements {
            element.compute_matrices(&nodes).unwrap();
        }

        let beam: Vec<usize> = (6..18).collect();
        assert_eq!(elements[0].address_table().unwrap(), beam.as_slice());

        let curved = elements[1].address_table().unwrap();
        assert_eq!(curved.len(), 18);
        assert_eq!(&curved[..6], &[0, 1, 2, 3, 4, 5]);
        assert_eq!(&curved[6..12], &[12, 13, 14, 15, 16, 17]);
        assert_eq!(&curved[12..], &[6, 7, 8, 9, 10, 11]);

        assert_eq!(elements[2].kind(), ElementKind::Release);
        assert_eq!(elements[2].node_indices(), vec![0, 1]);
        for element in &elements {
            assert!(element.address_table().unwrap().iter().all(|&dof| dof < nodes.len() * 6));
        }
    }

    #[test]
    fn test_missing_node_reported() {
        let props = ElementProperties::new(&Material::steel(), &Section::default());
        let mut element = Element::from(Beam::new(0, 0, 9, props));
        assert!(matches!(element.compute_matrices(&nodes()), Err(FrameError::NodeNotFound(9))));
    }
}
