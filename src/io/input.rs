//! JSON model input.
//!
//! The document is deserialized strictly (unknown keys are rejected) and then
//! checked for references and node numbering before a `FrameSystem` is built.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;

use crate::elements::{
    Axis, Beam, BeamHinges, CurvedBeam, Element, ElementProperties, Link, Material, Node, Release,
    Section,
};
use crate::error::{FrameError, FrameResult};
use crate::loads::{DistributedLoad, NodeLoad};
use crate::system::FrameSystem;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "E")]
    pub e: f64,
    #[serde(rename = "Poisson")]
    pub poisson: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionRecord {
    #[serde(rename = "ID")]
    pub id: usize,
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
    #[serde(rename = "Width", default)]
    pub width: Option<f64>,
    #[serde(rename = "Height", default)]
    pub height: Option<f64>,
    #[serde(rename = "Radius", default)]
    pub radius: Option<f64>,
    #[serde(rename = "Area", default)]
    pub area: Option<f64>,
    #[serde(rename = "InertiaY", default)]
    pub inertia_y: Option<f64>,
    #[serde(rename = "InertiaZ", default)]
    pub inertia_z: Option<f64>,
    #[serde(rename = "PolarInertia", default)]
    pub polar_inertia: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeRecord {
    #[serde(rename = "ID")]
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BeamRecord {
    #[serde(rename = "ID")]
    pub id: usize,
    #[serde(rename = "Start Node")]
    pub start_node: usize,
    #[serde(rename = "End Node")]
    pub end_node: usize,
    #[serde(rename = "Material")]
    pub material: String,
    #[serde(rename = "Section")]
    pub section: usize,
    #[serde(rename = "Start Hinge", default)]
    pub start_hinge: bool,
    #[serde(rename = "End Hinge", default)]
    pub end_hinge: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurvedBeamRecord {
    #[serde(rename = "ID")]
    pub id: usize,
    #[serde(rename = "Start Node")]
    pub start_node: usize,
    #[serde(rename = "Center Node")]
    pub center_node: usize,
    #[serde(rename = "End Node")]
    pub end_node: usize,
    #[serde(rename = "Material")]
    pub material: String,
    #[serde(rename = "Section")]
    pub section: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseRecord {
    #[serde(rename = "ID")]
    pub id: usize,
    #[serde(rename = "Start Node")]
    pub start_node: usize,
    #[serde(rename = "End Node")]
    pub end_node: usize,
    #[serde(rename = "Stiffness", default)]
    pub stiffness: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadRecord {
    #[serde(rename = "Node")]
    pub node: usize,
    #[serde(rename = "Forces", default)]
    pub forces: [f64; 3],
    #[serde(rename = "Moments", default)]
    pub moments: [f64; 3],
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistributedLoadRecord {
    #[serde(rename = "Beam")]
    pub beam: usize,
    #[serde(rename = "Start Vector")]
    pub start_vector: [f64; 3],
    #[serde(rename = "End Vector")]
    pub end_vector: [f64; 3],
    #[serde(rename = "Start Moments", default)]
    pub start_moments: Option<[f64; 3]>,
    #[serde(rename = "End Moments", default)]
    pub end_moments: Option<[f64; 3]>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkRecord {
    #[serde(rename = "Node")]
    pub node: usize,
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
    #[serde(rename = "Direction", default)]
    pub direction: Option<String>,
    #[serde(rename = "Vector", default)]
    pub vector: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HingeRecord {
    #[serde(rename = "Beam")]
    pub beam: usize,
    #[serde(rename = "Node")]
    pub node: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForcedDisplacementRecord {
    #[serde(rename = "Node")]
    pub node: usize,
    #[serde(rename = "Displacements", default)]
    pub displacements: [f64; 3],
    #[serde(rename = "Rotations", default)]
    pub rotations: [f64; 3],
}

/// A frame model as read from JSON
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameDocument {
    #[serde(rename = "Materials", default)]
    pub materials: Vec<MaterialRecord>,
    #[serde(rename = "Sections", default)]
    pub sections: Vec<SectionRecord>,
    #[serde(rename = "Nodes")]
    pub nodes: Vec<NodeRecord>,
    #[serde(rename = "Beams", default)]
    pub beams: Vec<BeamRecord>,
    #[serde(rename = "Curved Beams", default)]
    pub curved_beams: Vec<CurvedBeamRecord>,
    #[serde(rename = "Releases", default)]
    pub releases: Vec<ReleaseRecord>,
    #[serde(rename = "Loads", default)]
    pub loads: Vec<LoadRecord>,
    #[serde(rename = "Distributed Loads", default)]
    pub distributed_loads: Vec<DistributedLoadRecord>,
    #[serde(rename = "Links", default)]
    pub links: Vec<LinkRecord>,
    #[serde(rename = "Hinges", default)]
    pub hinges: Vec<HingeRecord>,
    #[serde(rename = "Forced Displacements", default)]
    pub forced_displacements: Vec<ForcedDisplacementRecord>,
}

fn require(value: Option<f64>, record: String, field: &'static str) -> FrameResult<f64> {
    value.ok_or(FrameError::MissingField { record, field })
}

impl SectionRecord {
    fn to_section(&self) -> FrameResult<Section> {
        let record = || format!("Section {}", self.id);
        match self.kind.as_deref() {
            Some("Rectangular") => Ok(Section::rectangular(
                require(self.width, record(), "Width")?,
                require(self.height, record(), "Height")?,
            )),
            Some("Circular") => Ok(Section::circular(require(self.radius, record(), "Radius")?)),
            None | Some("Generic") => Ok(Section::new(
                require(self.area, record(), "Area")?,
                require(self.inertia_y, record(), "InertiaY")?,
                require(self.inertia_z, record(), "InertiaZ")?,
                require(self.polar_inertia, record(), "PolarInertia")?,
            )),
            Some(other) => Err(FrameError::UnknownSectionType(other.to_string())),
        }
    }
}

impl LinkRecord {
    fn direction(&self) -> FrameResult<Axis> {
        self.direction
            .as_deref()
            .ok_or_else(|| FrameError::MissingField {
                record: format!("Link at node {}", self.node),
                field: "Direction",
            })?
            .parse()
    }

    fn to_link(&self) -> FrameResult<Link> {
        match self.kind.as_deref() {
            Some("Mount") => Ok(Link::mount()),
            Some("Fixed Support") => Ok(Link::fixed_support()),
            Some("Support") => Ok(Link::support(self.direction()?)),
            Some("Ring") => Ok(Link::ring(self.direction()?)),
            None | Some("Generic") => {
                let vector = self.vector.as_ref().ok_or_else(|| FrameError::MissingField {
                    record: format!("Link at node {}", self.node),
                    field: "Vector",
                })?;
                Link::from_vector(vector)
            }
            Some(other) => Err(FrameError::UnknownLinkType(other.to_string())),
        }
    }
}

impl FrameDocument {
    fn build_nodes(&self) -> FrameResult<Vec<Node>> {
        let mut records: Vec<&NodeRecord> = self.nodes.iter().collect();
        records.sort_by_key(|r| r.id);

        for pair in records.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(FrameError::DuplicateId {
                    kind: "node",
                    id: pair[0].id,
                });
            }
        }
        for (i, record) in records.iter().enumerate() {
            if record.id != i {
                return Err(FrameError::NonContiguousNodes {
                    expected: i,
                    found: record.id,
                });
            }
        }

        Ok(records
            .into_iter()
            .map(|r| Node::new(r.id, r.x, r.y, r.z))
            .collect())
    }

    /// Validate the document and build the system it describes
    pub fn into_system(self) -> FrameResult<FrameSystem> {
        let mut materials = HashMap::new();
        for record in &self.materials {
            if !(record.e.is_finite() && record.e > 0.0) {
                return Err(FrameError::InvalidInput(format!(
                    "material '{}' needs a positive E",
                    record.name
                )));
            }
            if !(record.poisson > -1.0 && record.poisson <= 0.5) {
                return Err(FrameError::InvalidInput(format!(
                    "material '{}' needs a Poisson ratio in (-1, 0.5], got {}",
                    record.name, record.poisson
                )));
            }
            let material = Material::new(record.e, record.poisson);
            if materials.insert(record.name.clone(), material).is_some() {
                return Err(FrameError::InvalidInput(format!(
                    "duplicate material '{}'",
                    record.name
                )));
            }
        }

        let mut sections = HashMap::new();
        for record in &self.sections {
            let section = record.to_section()?;
            let values = [section.area, section.iy, section.iz, section.j];
            if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(FrameError::InvalidInput(format!(
                    "section {} needs finite, non-negative properties",
                    record.id
                )));
            }
            if sections.insert(record.id, section).is_some() {
                return Err(FrameError::DuplicateId {
                    kind: "section",
                    id: record.id,
                });
            }
        }

        let properties = |material: &str, section: usize| -> FrameResult<ElementProperties> {
            let material = materials
                .get(material)
                .ok_or_else(|| FrameError::MaterialNotFound(material.to_string()))?;
            let section = sections.get(&section).ok_or(FrameError::SectionNotFound(section))?;
            Ok(ElementProperties::new(material, section))
        };

        let mut nodes = self.build_nodes()?;
        let node_count = nodes.len();
        let check_node = |id: usize| -> FrameResult<usize> {
            if id < node_count {
                Ok(id)
            } else {
                Err(FrameError::NodeNotFound(id))
            }
        };

        let mut element_ids = HashSet::new();
        let mut claim_id = |id: usize| -> FrameResult<()> {
            if element_ids.insert(id) {
                Ok(())
            } else {
                Err(FrameError::DuplicateId { kind: "element", id })
            }
        };

        let mut beams: Vec<Beam> = Vec::with_capacity(self.beams.len());
        let mut beam_index = HashMap::new();
        for record in &self.beams {
            claim_id(record.id)?;
            let beam = Beam::new(
                record.id,
                check_node(record.start_node)?,
                check_node(record.end_node)?,
                properties(&record.material, record.section)?,
            )
            .with_hinges(BeamHinges {
                start: record.start_hinge,
                end: record.end_hinge,
            });
            beam_index.insert(record.id, beams.len());
            beams.push(beam);
        }

        let mut others: Vec<Element> = Vec::new();
        for record in &self.curved_beams {
            claim_id(record.id)?;
            others.push(
                CurvedBeam::new(
                    record.id,
                    check_node(record.start_node)?,
                    check_node(record.center_node)?,
                    check_node(record.end_node)?,
                    properties(&record.material, record.section)?,
                )
                .into(),
            );
        }
        for record in &self.releases {
            claim_id(record.id)?;
            let mut release = Release::new(
                record.id,
                check_node(record.start_node)?,
                check_node(record.end_node)?,
            );
            if let Some(stiffness) = record.stiffness {
                release = release.with_stiffness(stiffness);
            }
            others.push(release.into());
        }

        for record in &self.loads {
            let node = &mut nodes[check_node(record.node)?];
            let load = NodeLoad::new(
                record.forces[0],
                record.forces[1],
                record.forces[2],
                record.moments[0],
                record.moments[1],
                record.moments[2],
            );
            node.load = node.load.combined(&load);
        }

        for record in &self.distributed_loads {
            let moments = [record.start_moments, record.end_moments];
            if moments.iter().flatten().flatten().any(|&m| m != 0.0) {
                return Err(FrameError::Unsupported(format!(
                    "distributed moments on beam {}",
                    record.beam
                )));
            }
            let index = *beam_index
                .get(&record.beam)
                .ok_or(FrameError::ElementNotFound(record.beam))?;
            let beam = &mut beams[index];
            let load = match beam.load {
                Some(existing) => DistributedLoad::new(
                    std::array::from_fn(|i| existing.start[i] + record.start_vector[i]),
                    std::array::from_fn(|i| existing.end[i] + record.end_vector[i]),
                ),
                None => DistributedLoad::new(record.start_vector, record.end_vector),
            };
            beam.load = Some(load);
        }

        for record in &self.links {
            let node = &mut nodes[check_node(record.node)?];
            if node.link.is_supported() {
                warn!("Node {} has more than one link, keeping the last", record.node);
            }
            node.link = record.to_link()?;
        }

        for record in &self.hinges {
            let index = *beam_index
                .get(&record.beam)
                .ok_or(FrameError::ElementNotFound(record.beam))?;
            let beam = &mut beams[index];
            if record.node == beam.start_node() {
                beam.hinges.start = true;
            } else if record.node == beam.end_node() {
                beam.hinges.end = true;
            } else {
                return Err(FrameError::InvalidInput(format!(
                    "hinge node {} is not an end of beam {}",
                    record.node, record.beam
                )));
            }
        }

        for record in &self.forced_displacements {
            let node = &mut nodes[check_node(record.node)?];
            node.forced_displacements[..3].copy_from_slice(&record.displacements);
            node.forced_displacements[3..].copy_from_slice(&record.rotations);
        }

        let mut elements: Vec<Element> = beams.into_iter().map(Element::from).collect();
        elements.extend(others);

        debug!(
            "Loaded {} nodes and {} elements",
            nodes.len(),
            elements.len()
        );
        FrameSystem::new(nodes, elements)
    }
}

/// Parse a JSON document and build the system
pub fn load_system(json: &str) -> FrameResult<FrameSystem> {
    let document: FrameDocument = serde_json::from_str(json)?;
    document.into_system()
}

/// Read and parse a JSON model file
pub fn load_system_from_path(path: impl AsRef<Path>) -> FrameResult<FrameSystem> {
    let json = std::fs::read_to_string(path)?;
    load_system(&json)
}
