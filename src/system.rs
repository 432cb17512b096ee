//! Frame system - node arena, elements and the direct stiffness pipeline

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::analysis::{AnalysisOptions, SolveStage};
use crate::elements::{Beam, Element, ElementKind, FrameElement, Node};
use crate::error::{FrameError, FrameResult};
use crate::math::{apply_restraint, max_asymmetry, solver_for, Mat, Vec3, Vector, DOFS_PER_NODE};
use crate::results::{AnalysisSummary, BeamEndForces, NodeDisplacement, Reactions};

/// A frame structure ready for linear static analysis.
///
/// Node `i` sits at index `i` and owns global DOFs `6i..6i+6`. The solve
/// runs as a fixed sequence of stages; see [`SolveStage`].
#[derive(Debug, Clone)]
pub struct FrameSystem {
    nodes: Vec<Node>,
    elements: Vec<Element>,
    options: AnalysisOptions,
    stage: SolveStage,

    stiffness: Option<Mat>,
    forces: Option<Vector>,
    equivalent_forces: Option<Vector>,
    restrained: Option<(Mat, Vector)>,
    displacements: Option<Vector>,
    end_forces: Option<Vector>,
}

impl FrameSystem {
    /// Build a system, checking that node ids are their positions and that
    /// every element refers to existing nodes.
    pub fn new(nodes: Vec<Node>, elements: Vec<Element>) -> FrameResult<Self> {
        for (i, node) in nodes.iter().enumerate() {
            if node.id() != i {
                return Err(FrameError::NonContiguousNodes {
                    expected: i,
                    found: node.id(),
                });
            }
        }

        let mut ids = std::collections::HashSet::new();
        for element in &elements {
            if !ids.insert(element.id()) {
                return Err(FrameError::DuplicateId {
                    kind: "element",
                    id: element.id(),
                });
            }
            if let Some(&missing) = element.node_indices().iter().find(|&&n| n >= nodes.len()) {
                return Err(FrameError::NodeNotFound(missing));
            }
        }

        Ok(Self {
            nodes,
            elements,
            options: AnalysisOptions::default(),
            stage: SolveStage::Unassembled,
            stiffness: None,
            forces: None,
            equivalent_forces: None,
            restrained: None,
            displacements: None,
            end_forces: None,
        })
    }

    /// Set analysis options
    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    pub fn stage(&self) -> SolveStage {
        self.stage
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn num_dofs(&self) -> usize {
        self.nodes.len() * DOFS_PER_NODE
    }

    pub fn node(&self, id: usize) -> FrameResult<&Node> {
        self.nodes.get(id).ok_or(FrameError::NodeNotFound(id))
    }

    pub fn element(&self, id: usize) -> FrameResult<&Element> {
        self.elements
            .iter()
            .find(|e| e.id() == id)
            .ok_or(FrameError::ElementNotFound(id))
    }

    pub fn beam(&self, id: usize) -> FrameResult<&Beam> {
        self.element(id)?.as_beam().ok_or(FrameError::ElementNotFound(id))
    }

    /// Assembled global stiffness, before restraints
    pub fn global_stiffness(&self) -> Option<&Mat> {
        self.stiffness.as_ref()
    }

    /// Assembled global force vector: point loads plus equivalent forces
    pub fn global_forces(&self) -> Option<&Vector> {
        self.forces.as_ref()
    }

    /// Stiffness and forces after restraint elimination
    pub fn restrained_system(&self) -> Option<(&Mat, &Vector)> {
        self.restrained.as_ref().map(|(k, f)| (k, f))
    }

    /// Global displacement vector
    pub fn displacements(&self) -> Option<&Vector> {
        self.displacements.as_ref()
    }

    /// K · u over the whole system
    pub fn end_forces(&self) -> Option<&Vector> {
        self.end_forces.as_ref()
    }

    fn require(&self, expected: SolveStage) -> FrameResult<()> {
        if self.stage != expected {
            return Err(FrameError::OutOfOrder {
                expected,
                found: self.stage,
            });
        }
        Ok(())
    }

    fn require_solved(&self) -> FrameResult<()> {
        if self.stage < SolveStage::Solved {
            return Err(FrameError::OutOfOrder {
                expected: SolveStage::Solved,
                found: self.stage,
            });
        }
        Ok(())
    }

    /// Let every element cache its local matrices
    pub fn compute_local_matrices(&mut self) -> FrameResult<()> {
        self.require(SolveStage::Unassembled)?;

        let nodes = &self.nodes;
        if self.options.parallel {
            self.elements
                .par_iter_mut()
                .try_for_each(|element| element.compute_matrices(nodes))?;
        } else {
            self.elements
                .iter_mut()
                .try_for_each(|element| element.compute_matrices(nodes))?;
        }

        debug!("Computed local matrices of {} elements", self.elements.len());
        self.stage = SolveStage::LocalMatricesComputed;
        Ok(())
    }

    /// Accumulate element stiffness and equivalent forces through their
    /// address tables, then add the node point loads.
    pub fn assemble(&mut self) -> FrameResult<()> {
        self.require(SolveStage::LocalMatricesComputed)?;

        let n_dofs = self.num_dofs();
        let mut k = Mat::zeros(n_dofs, n_dofs);
        let mut equivalent = Vector::zeros(n_dofs);

        for element in &self.elements {
            let k_element = element.global_stiffness_matrix()?;
            let f_element = element.global_equivalent_forces()?;
            let table = element.address_table()?;

            for (a, &ga) in table.iter().enumerate() {
                equivalent[ga] += f_element[a];
                for (b, &gb) in table.iter().enumerate() {
                    k[(ga, gb)] += k_element[(a, b)];
                }
            }
        }

        let mut f = equivalent.clone();
        for node in &self.nodes {
            let offset = node.dof_offset();
            for (r, value) in node.load.as_array().iter().enumerate() {
                f[offset + r] += value;
            }
        }

        debug!(
            "Assembled {}x{} global stiffness (asymmetry {:.3e})",
            n_dofs,
            n_dofs,
            max_asymmetry(&k)
        );
        self.stiffness = Some(k);
        self.forces = Some(f);
        self.equivalent_forces = Some(equivalent);
        self.stage = SolveStage::GloballyAssembled;
        Ok(())
    }

    /// Eliminate linked and forced DOFs from a copy of the global system
    pub fn apply_boundary_conditions(&mut self) -> FrameResult<()> {
        self.require(SolveStage::GloballyAssembled)?;

        let (mut k, mut f) = match (&self.stiffness, &self.forces) {
            (Some(k), Some(f)) => (k.clone(), f.clone()),
            _ => {
                return Err(FrameError::OutOfOrder {
                    expected: SolveStage::GloballyAssembled,
                    found: self.stage,
                })
            }
        };

        let mut count = 0;
        for node in &self.nodes {
            for r in 0..DOFS_PER_NODE {
                if node.is_restrained(r) {
                    (k, f) = apply_restraint(k, f, node.dof_offset() + r, node.forced_displacements[r]);
                    count += 1;
                }
            }
        }

        debug!("Eliminated {} restrained DOFs", count);
        self.restrained = Some((k, f));
        self.stage = SolveStage::BoundaryApplied;
        Ok(())
    }

    /// Solve for displacements and write displacements, end forces and
    /// equivalent forces to the nodes.
    pub fn solve_displacements(&mut self) -> FrameResult<()> {
        self.require(SolveStage::BoundaryApplied)?;

        let solver = solver_for(&self.options);
        let (u, end_forces) = match (&self.restrained, &self.stiffness) {
            (Some((k, f)), Some(stiffness)) => {
                let u = solver.solve(k, f)?;
                let end_forces = stiffness * &u;
                (u, end_forces)
            }
            _ => {
                return Err(FrameError::OutOfOrder {
                    expected: SolveStage::BoundaryApplied,
                    found: self.stage,
                })
            }
        };
        debug!("Solved {} DOFs with {} solver", u.len(), solver.name());

        let equivalent = self
            .equivalent_forces
            .clone()
            .unwrap_or_else(|| Vector::zeros(u.len()));
        for node in &mut self.nodes {
            let offset = node.dof_offset();
            node.displacements = std::array::from_fn(|r| u[offset + r]);
            node.end_forces = std::array::from_fn(|r| end_forces[offset + r]);
            node.equivalent_forces = std::array::from_fn(|r| equivalent[offset + r]);
        }

        self.displacements = Some(u);
        self.end_forces = Some(end_forces);
        self.stage = SolveStage::Solved;

        if self.options.check_statics {
            self.check_statics();
        }
        Ok(())
    }

    /// Let every element recover its internal forces
    pub fn recover_internal_forces(&mut self) -> FrameResult<()> {
        self.require(SolveStage::Solved)?;

        let nodes = &self.nodes;
        if self.options.parallel {
            self.elements
                .par_iter_mut()
                .try_for_each(|element| element.recover_internal_forces(nodes))?;
        } else {
            self.elements
                .iter_mut()
                .try_for_each(|element| element.recover_internal_forces(nodes))?;
        }

        debug!("Recovered internal forces of {} elements", self.elements.len());
        self.stage = SolveStage::PostProcessed;
        Ok(())
    }

    /// Run the whole pipeline
    pub fn solve(&mut self) -> FrameResult<()> {
        self.compute_local_matrices()?;
        self.assemble()?;
        self.apply_boundary_conditions()?;
        self.solve_displacements()?;
        self.recover_internal_forces()?;

        let summary = self.summary();
        info!(
            "Solved frame: {} nodes, {} elements, {} free DOFs, max displacement {:.4e}",
            summary.num_nodes,
            self.elements.len(),
            summary.free_dofs,
            summary.max_displacement
        );
        Ok(())
    }

    /// Norm of the applied force resultant (point loads plus equivalent
    /// forces) minus the resultant of the reactions on restrained
    /// translational DOFs.
    pub fn force_imbalance(&self) -> f64 {
        let mut total = Vec3::zeros();
        for node in &self.nodes {
            let reactions = node.reactions();
            let load = node.load.as_array();
            for i in 0..3 {
                total[i] += load[i] + node.equivalent_forces[i];
                if node.is_restrained(i) {
                    total[i] += reactions[i];
                }
            }
        }
        total.norm()
    }

    /// Largest reaction found on a DOF that is not restrained
    pub fn free_dof_residual(&self) -> f64 {
        let mut worst = 0.0_f64;
        for node in &self.nodes {
            let reactions = node.reactions();
            for (r, reaction) in reactions.iter().enumerate() {
                if !node.is_restrained(r) {
                    worst = worst.max(reaction.abs());
                }
            }
        }
        worst
    }

    fn check_statics(&self) {
        let scale = match (&self.forces, &self.end_forces) {
            (Some(f), Some(e)) => f.amax().max(e.amax()).max(1.0),
            _ => 1.0,
        };
        let tolerance = self.options.statics_tolerance * scale;

        let imbalance = self.force_imbalance();
        if imbalance > tolerance {
            warn!("Force balance off by {:.3e} (tolerance {:.3e})", imbalance, tolerance);
        }
        let residual = self.free_dof_residual();
        if residual > tolerance {
            warn!(
                "Unbalanced force {:.3e} on a free DOF (tolerance {:.3e})",
                residual, tolerance
            );
        }
    }

    /// Displacements of node `id`
    pub fn node_displacement(&self, id: usize) -> FrameResult<NodeDisplacement> {
        self.require_solved()?;
        Ok(NodeDisplacement::from_array(self.node(id)?.displacements()))
    }

    /// Support reactions of node `id`
    pub fn node_reactions(&self, id: usize) -> FrameResult<Reactions> {
        self.require_solved()?;
        Ok(Reactions::from_array(self.node(id)?.reactions()))
    }

    /// Section forces at the start and end of beam `id`
    pub fn beam_end_forces(&self, id: usize) -> FrameResult<(BeamEndForces, BeamEndForces)> {
        let results = self.beam(id)?.results().ok_or(FrameError::OutOfOrder {
            expected: SolveStage::PostProcessed,
            found: self.stage,
        })?;
        Ok((
            BeamEndForces::at_start(&results.end_forces),
            BeamEndForces::at_end(&results.end_forces),
        ))
    }

    /// Extremes and counts over the current results
    pub fn summary(&self) -> AnalysisSummary {
        let total_dofs = self.num_dofs();
        let restrained: usize = self
            .nodes
            .iter()
            .map(|n| (0..DOFS_PER_NODE).filter(|&r| n.is_restrained(r)).count())
            .sum();

        let mut summary = AnalysisSummary {
            num_nodes: self.nodes.len(),
            total_dofs,
            free_dofs: total_dofs - restrained,
            ..Default::default()
        };

        for element in &self.elements {
            match element.kind() {
                ElementKind::Beam => summary.num_beams += 1,
                ElementKind::CurvedBeam => summary.num_curved_beams += 1,
                ElementKind::Release => summary.num_releases += 1,
            }
        }

        if self.stage < SolveStage::Solved {
            return summary;
        }

        for node in &self.nodes {
            let disp = NodeDisplacement::from_array(node.displacements());
            if disp.translation_magnitude() > summary.max_displacement {
                summary.max_displacement = disp.translation_magnitude();
                summary.max_disp_node = Some(node.id());
            }
            let rxn = Reactions::from_array(node.reactions());
            if rxn.force_magnitude() > summary.max_reaction {
                summary.max_reaction = rxn.force_magnitude();
                summary.max_reaction_node = Some(node.id());
            }
        }

        for beam in self.elements.iter().filter_map(Element::as_beam) {
            if let Some(results) = beam.results() {
                let forces = &results.end_forces;
                let axial = results.normal_force.abs();
                if axial > summary.max_axial {
                    summary.max_axial = axial;
                    summary.max_axial_beam = Some(beam.id());
                }

                let moment = forces[4]
                    .abs()
                    .max(forces[5].abs())
                    .max(forces[10].abs())
                    .max(forces[11].abs());
                if moment > summary.max_moment {
                    summary.max_moment = moment;
                    summary.max_moment_beam = Some(beam.id());
                }
            }
        }

        summary.force_imbalance = self.force_imbalance();
        summary
    }
}
