//! Beam element - straight two-node 3D frame member

use serde::{Deserialize, Serialize};

use super::element::{ElementKind, ElementMatrices, FrameElement};
use super::{ElementProperties, Node};
use crate::error::{FrameError, FrameResult};
use crate::loads::DistributedLoad;
use crate::math::{
    address_table, beam_equivalent_forces, beam_local_stiffness, beam_stiffness_rigid,
    condense_forces, elastic_line, load_transfer_stiffness, orientation_matrix, recover_released,
    released_dofs, BendingPlane, Mat, Mat12, Polynomial, Vec12, Vector,
};

/// Hinges at the ends of a beam (moment-free connections)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeamHinges {
    pub start: bool,
    pub end: bool,
}

impl BeamHinges {
    /// Rigid at both ends
    pub fn none() -> Self {
        Self::default()
    }

    /// Hinge at the start node
    pub fn start() -> Self {
        Self { start: true, end: false }
    }

    /// Hinge at the end node
    pub fn end() -> Self {
        Self { start: false, end: true }
    }

    /// Hinges at both ends (truss member)
    pub fn both() -> Self {
        Self { start: true, end: true }
    }

    pub fn any(&self) -> bool {
        self.start || self.end
    }

    /// Local DOFs condensed out by these hinges
    pub fn released_dofs(&self) -> Vec<usize> {
        released_dofs(self.start, self.end)
    }
}

/// Internal forces of a solved beam, in local axes.
///
/// Polynomials are in the local coordinate x ∈ [0, L]. The `_y` quantities
/// belong to bending with deflection along local y (stiffness E·Iz), the `_z`
/// ones to deflection along local z (stiffness E·Iy, slope −θy).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BeamResults {
    pub length: f64,
    /// `[u0, 1 + (uL − u0)/L]`
    pub axial_line: Polynomial,
    /// Axial force, positive in tension
    pub normal_force: f64,
    pub elastic_line_y: Polynomial,
    pub elastic_line_z: Polynomial,
    /// E·Iz · v''
    pub bending_moment_y: Polynomial,
    /// E·Iy · w''
    pub bending_moment_z: Polynomial,
    pub shear_force_y: Polynomial,
    pub shear_force_z: Polynomial,
    pub torsion: f64,
    /// Local displacements, hinged-end rotations included
    pub local_displacements: [f64; 12],
    /// K_l · d_l − f_l
    pub end_forces: [f64; 12],
}

/// One station of the sampled beam diagrams
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiagramStation {
    pub x: f64,
    pub deflection_y: f64,
    pub deflection_z: f64,
    pub moment_y: f64,
    pub moment_z: f64,
    pub shear_y: f64,
    pub shear_z: f64,
}

impl BeamResults {
    /// Evaluate the result polynomials at `points` equally spaced stations
    pub fn diagrams(&self, points: usize) -> Vec<DiagramStation> {
        let points = points.max(2);
        let step = self.length / (points - 1) as f64;
        (0..points)
            .map(|i| {
                let x = step * i as f64;
                DiagramStation {
                    x,
                    deflection_y: self.elastic_line_y.eval(x),
                    deflection_z: self.elastic_line_z.eval(x),
                    moment_y: self.bending_moment_y.eval(x),
                    moment_z: self.bending_moment_z.eval(x),
                    shear_y: self.shear_force_y.eval(x),
                    shear_z: self.shear_force_z.eval(x),
                }
            })
            .collect()
    }

    /// Largest absolute bending moment over the sampled stations
    pub fn max_moment(&self, points: usize) -> f64 {
        self.diagrams(points)
            .iter()
            .map(|s| s.moment_y.abs().max(s.moment_z.abs()))
            .fold(0.0, f64::max)
    }
}

/// A straight beam between two nodes
#[derive(Debug, Clone)]
pub struct Beam {
    id: usize,
    start: usize,
    end: usize,
    /// Stiffness scalars from material and section
    pub properties: ElementProperties,
    /// End hinges
    pub hinges: BeamHinges,
    /// Line load in local axes
    pub load: Option<DistributedLoad>,

    length: Option<f64>,
    matrices: Option<ElementMatrices>,
    /// Unhinged K and f, kept for hinge rotation recovery
    rigid: Option<(Mat12, Vec12)>,
    results: Option<BeamResults>,
}

impl Beam {
    /// Create a new beam between node indices `start` and `end`
    pub fn new(id: usize, start: usize, end: usize, properties: ElementProperties) -> Self {
        Self {
            id,
            start,
            end,
            properties,
            hinges: BeamHinges::none(),
            load: None,
            length: None,
            matrices: None,
            rigid: None,
            results: None,
        }
    }

    /// Set end hinges
    pub fn with_hinges(mut self, hinges: BeamHinges) -> Self {
        self.hinges = hinges;
        self
    }

    /// Set the distributed load
    pub fn with_load(mut self, load: DistributedLoad) -> Self {
        self.load = Some(load);
        self
    }

    pub fn start_node(&self) -> usize {
        self.start
    }

    pub fn end_node(&self) -> usize {
        self.end
    }

    /// Length, once matrices are computed
    pub fn length(&self) -> Option<f64> {
        self.length
    }

    /// Internal forces, once recovered
    pub fn results(&self) -> Option<&BeamResults> {
        self.results.as_ref()
    }

    fn recover(&self, d: Vec12, length: f64) -> FrameResult<BeamResults> {
        let matrices = self.computed_matrices()?;
        let (k_rigid, f_rigid) = self.rigid.as_ref().ok_or(FrameError::MatricesNotComputed(self.id))?;

        let released = self.hinges.released_dofs();
        let d = recover_released(&d, f_rigid, k_rigid, &released)?;

        let p = &self.properties;
        let l = length;
        let (s, e) = match &self.load {
            Some(load) => (load.start, load.end),
            None => ([0.0; 3], [0.0; 3]),
        };

        let axial_line = Polynomial::new(vec![d[0], 1.0 + (d[6] - d[0]) / l]);
        let normal_force = (d[6] - d[0]) / l * p.e * p.a;

        let plane_y = BendingPlane {
            w0: d[1],
            w_l: d[7],
            phi0: d[5],
            phi_l: d[11],
            q0: s[1],
            dq: (e[1] - s[1]) / l,
            ei: p.e * p.iz,
        };
        let plane_z = BendingPlane {
            w0: d[2],
            w_l: d[8],
            phi0: -d[4],
            phi_l: -d[10],
            q0: s[2],
            dq: (e[2] - s[2]) / l,
            ei: p.e * p.iy,
        };

        let elastic_line_y = elastic_line(&plane_y, l);
        let elastic_line_z = elastic_line(&plane_z, l);
        let bending_moment_y = elastic_line_y.derivative().derivative().scaled(plane_y.ei);
        let bending_moment_z = elastic_line_z.derivative().derivative().scaled(plane_z.ei);
        let shear_force_y = bending_moment_y.derivative();
        let shear_force_z = bending_moment_z.derivative();

        let torsion = (d[9] - d[3]) * p.g * p.j / l;

        let d_local = Vector::from_column_slice(d.as_slice());
        let forces = &matrices.local_stiffness * &d_local - &matrices.equivalent_forces;

        Ok(BeamResults {
            length: l,
            axial_line,
            normal_force,
            elastic_line_y,
            elastic_line_z,
            bending_moment_y,
            bending_moment_z,
            shear_force_y,
            shear_force_z,
            torsion,
            local_displacements: std::array::from_fn(|i| d[i]),
            end_forces: std::array::from_fn(|i| forces[i]),
        })
    }
}

impl FrameElement for Beam {
    fn id(&self) -> usize {
        self.id
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Beam
    }

    fn node_indices(&self) -> Vec<usize> {
        vec![self.start, self.end]
    }

    fn compute_matrices(&mut self, nodes: &[Node]) -> FrameResult<()> {
        let start = nodes.get(self.start).ok_or(FrameError::NodeNotFound(self.start))?;
        let end = nodes.get(self.end).ok_or(FrameError::NodeNotFound(self.end))?;

        let length = start.distance_to(end);
        if length < 1e-10 {
            return Err(FrameError::InvalidGeometry(format!(
                "beam {} has zero length",
                self.id
            )));
        }

        let k_rigid = beam_stiffness_rigid(&self.properties, length);
        let f_rigid = self
            .load
            .as_ref()
            .map(|load| beam_equivalent_forces(load, length))
            .unwrap_or_else(Vec12::zeros);

        let k = beam_local_stiffness(&self.properties, length, self.hinges.start, self.hinges.end);
        let k_transfer = load_transfer_stiffness(&self.properties, length);
        let f = condense_forces(&f_rigid, &k_transfer, &self.hinges.released_dofs())?;

        self.matrices = Some(ElementMatrices {
            address_table: address_table(&[self.start, self.end]),
            rotation: orientation_matrix(&start.coords(), &end.coords(), 2),
            local_stiffness: Mat::from_column_slice(12, 12, k.as_slice()),
            equivalent_forces: Vector::from_column_slice(f.as_slice()),
        });
        self.rigid = Some((k_rigid, f_rigid));
        self.length = Some(length);
        self.results = None;
        Ok(())
    }

    fn matrices(&self) -> Option<&ElementMatrices> {
        self.matrices.as_ref()
    }

    fn recover_internal_forces(&mut self, nodes: &[Node]) -> FrameResult<()> {
        let length = self.length.ok_or(FrameError::MatricesNotComputed(self.id))?;
        let d_local = self.computed_matrices()?.local_displacements(nodes)?;
        let d = Vec12::from_column_slice(d_local.as_slice());
        self.results = Some(self.recover(d, length)?);
        Ok(())
    }
}
