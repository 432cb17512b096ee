//! Node - a point in 3D space owning six global DOFs

use serde::{Deserialize, Serialize};

use super::Link;
use crate::loads::NodeLoad;

/// A node of the frame system.
///
/// The node's `id` is also its position in the system's node list, and its
/// DOFs occupy global indices `id*6 .. id*6 + 6`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    id: usize,
    x: f64,
    y: f64,
    z: f64,

    /// Point load applied directly to the node
    pub load: NodeLoad,
    /// Boundary link
    pub link: Link,
    /// Prescribed displacements/rotations [DX, DY, DZ, RX, RY, RZ]
    pub forced_displacements: [f64; 6],

    /// Solved displacements in global axes
    #[serde(skip)]
    pub(crate) displacements: [f64; 6],
    /// Slice of K·u at this node
    #[serde(skip)]
    pub(crate) end_forces: [f64; 6],
    /// Element equivalent nodal forces gathered at this node
    #[serde(skip)]
    pub(crate) equivalent_forces: [f64; 6],
}

impl Node {
    /// Create a new node at the given coordinates
    pub fn new(id: usize, x: f64, y: f64, z: f64) -> Self {
        Self {
            id,
            x,
            y,
            z,
            load: NodeLoad::default(),
            link: Link::free(),
            forced_displacements: [0.0; 6],
            displacements: [0.0; 6],
            end_forces: [0.0; 6],
            equivalent_forces: [0.0; 6],
        }
    }

    /// Set the applied point load
    pub fn with_load(mut self, load: NodeLoad) -> Self {
        self.load = load;
        self
    }

    /// Set the boundary link
    pub fn with_link(mut self, link: Link) -> Self {
        self.link = link;
        self
    }

    /// Prescribe translations [DX, DY, DZ]
    pub fn with_forced_displacement(mut self, d: [f64; 3]) -> Self {
        self.forced_displacements[..3].copy_from_slice(&d);
        self
    }

    /// Prescribe rotations [RX, RY, RZ]
    pub fn with_forced_rotation(mut self, r: [f64; 3]) -> Self {
        self.forced_displacements[3..].copy_from_slice(&r);
        self
    }

    /// Node index
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// First global DOF of this node
    pub fn dof_offset(&self) -> usize {
        self.id * 6
    }

    /// Whether DOF `dof` is eliminated: link-restricted or given a non-zero forced value
    pub fn is_restrained(&self, dof: usize) -> bool {
        self.link.is_restricted(dof) || self.forced_displacements[dof] != 0.0
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Solved displacements [DX, DY, DZ, RX, RY, RZ]
    pub fn displacements(&self) -> [f64; 6] {
        self.displacements
    }

    /// Nodal end forces, the node's slice of K·u
    pub fn end_forces(&self) -> [f64; 6] {
        self.end_forces
    }

    /// Equivalent nodal forces received from element distributed loads
    pub fn equivalent_forces(&self) -> [f64; 6] {
        self.equivalent_forces
    }

    /// Support reaction [FX, FY, FZ, MX, MY, MZ]: end forces minus every load
    /// applied at the node. Vanishes (up to round-off) on free DOFs.
    pub fn reactions(&self) -> [f64; 6] {
        let load = self.load.as_array();
        std::array::from_fn(|i| self.end_forces[i] - load[i] - self.equivalent_forces[i])
    }
}
