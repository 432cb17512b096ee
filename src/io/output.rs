//! JSON result report

use std::path::Path;

use serde::Serialize;

use crate::elements::{BeamResults, DiagramStation, ElementKind, FrameElement};
use crate::error::FrameResult;
use crate::results::AnalysisSummary;
use crate::system::FrameSystem;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NodeReport {
    #[serde(rename = "ID")]
    pub id: usize,
    pub position: [f64; 3],
    pub displacements: [f64; 6],
    pub end_forces: [f64; 6],
    pub reactions: [f64; 6],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BeamReport {
    #[serde(flatten)]
    pub results: BeamResults,
    pub diagrams: Vec<DiagramStation>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ElementReport {
    #[serde(rename = "Type")]
    pub kind: ElementKind,
    #[serde(rename = "ID")]
    pub id: usize,
    pub nodes: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<BeamReport>,
}

/// Everything written after a solve. Element matrices are left out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FrameReport {
    pub nodes: Vec<NodeReport>,
    pub elements: Vec<ElementReport>,
    pub summary: AnalysisSummary,
}

impl FrameReport {
    pub fn from_system(system: &FrameSystem) -> Self {
        let points = system.options().diagram_points;

        let nodes = system
            .nodes()
            .iter()
            .map(|node| NodeReport {
                id: node.id(),
                position: node.coords(),
                displacements: node.displacements(),
                end_forces: node.end_forces(),
                reactions: node.reactions(),
            })
            .collect();

        let elements = system
            .elements()
            .iter()
            .map(|element| ElementReport {
                kind: element.kind(),
                id: element.id(),
                nodes: element.node_indices(),
                results: element
                    .as_beam()
                    .and_then(|beam| beam.results())
                    .map(|results| BeamReport {
                        diagrams: results.diagrams(points),
                        results: results.clone(),
                    }),
            })
            .collect();

        Self {
            nodes,
            elements,
            summary: system.summary(),
        }
    }

    pub fn to_json(&self) -> FrameResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Pretty JSON report of a system
pub fn report_json(system: &FrameSystem) -> FrameResult<String> {
    FrameReport::from_system(system).to_json()
}

/// Write the report of a system to `path`
pub fn write_report(system: &FrameSystem, path: impl AsRef<Path>) -> FrameResult<()> {
    std::fs::write(path, report_json(system)?)?;
    Ok(())
}
