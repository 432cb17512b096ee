//! Frame Solver - linear static analysis of 3D frames
//!
//! Direct stiffness method for systems of nodes connected by beams, curved
//! beams and releases:
//! - Euler-Bernoulli beams with optional end hinges and linear line loads
//! - Links (supports) and forced displacements on any nodal DOF
//! - Reactions, elastic lines and internal force polynomials
//!
//! ## Example
//! ```rust
//! use frame_solver::prelude::*;
//!
//! let props = ElementProperties::new(&Material::steel(), &Section::rectangular(0.3, 0.5));
//!
//! let nodes = vec![
//!     Node::new(0, 0.0, 0.0, 0.0).with_link(Link::mount()),
//!     Node::new(1, 10.0, 0.0, 0.0).with_load(NodeLoad::force(0.0, -10000.0, 0.0)),
//! ];
//! let elements = vec![Beam::new(0, 0, 1, props).into()];
//!
//! let mut system = FrameSystem::new(nodes, elements).unwrap();
//! system.solve().unwrap();
//!
//! let tip = system.node_displacement(1).unwrap();
//! assert!(tip.dy < 0.0);
//! ```

pub mod analysis;
pub mod elements;
pub mod error;
pub mod io;
pub mod loads;
pub mod math;
pub mod results;
pub mod system;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{AnalysisOptions, SolveStage, SolverKind};
    pub use crate::elements::{
        Axis, Beam, BeamHinges, BeamResults, CurvedBeam, Element, ElementKind, ElementProperties,
        FrameElement, Link, Material, Node, Release, Section,
    };
    pub use crate::error::{FrameError, FrameResult};
    pub use crate::io::{load_system, load_system_from_path, write_report, FrameReport};
    pub use crate::loads::{DistributedLoad, NodeLoad};
    pub use crate::results::{AnalysisSummary, BeamEndForces, NodeDisplacement, Reactions};
    pub use crate::system::FrameSystem;
}
