//! Error types for the frame solver

use thiserror::Error;

use crate::analysis::SolveStage;

/// Main error type for frame analysis
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Node {0} not found in system")]
    NodeNotFound(usize),

    #[error("Element {0} not found in system")]
    ElementNotFound(usize),

    #[error("Material '{0}' not found")]
    MaterialNotFound(String),

    #[error("Section {0} not found")]
    SectionNotFound(usize),

    #[error("Duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: usize },

    #[error("Node ids must be dense and zero based: expected {expected}, found {found}")]
    NonContiguousNodes { expected: usize, found: usize },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{record} is missing required field '{field}'")]
    MissingField { record: String, field: &'static str },

    #[error("Unknown link type '{0}'")]
    UnknownLinkType(String),

    #[error("Unknown section type '{0}'")]
    UnknownSectionType(String),

    #[error("Unknown direction '{0}', expected x, y or z")]
    UnknownDirection(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Element {0} matrices not computed - run compute_matrices() first")]
    MatricesNotComputed(usize),

    #[error("Solve step out of order: expected stage {expected:?}, system is at {found:?}")]
    OutOfOrder {
        expected: SolveStage,
        found: SolveStage,
    },

    #[error("Singular stiffness matrix - system may have insufficient restraints")]
    SingularMatrix,

    #[error("Stiffness matrix is not positive definite - system may have insufficient restraints")]
    NotPositiveDefinite,

    #[error("Non-finite values in the {0} of the linear system")]
    NonFinite(&'static str),

    #[error("Math error: {0}")]
    MathError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for frame analysis operations
pub type FrameResult<T> = Result<T, FrameError>;
