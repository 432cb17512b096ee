//! Structural elements module

mod beam;
mod curved_beam;
mod element;
mod link;
mod material;
mod node;
mod release;
mod section;

pub use beam::{Beam, BeamHinges, BeamResults, DiagramStation};
pub use curved_beam::CurvedBeam;
pub use element::{Element, ElementKind, ElementMatrices, FrameElement};
pub use link::{Axis, Link};
pub use material::Material;
pub use node::Node;
pub use release::Release;
pub use section::{ElementProperties, Section};
