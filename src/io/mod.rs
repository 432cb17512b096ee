//! JSON input and output

pub mod input;
pub mod output;

pub use input::{load_system, load_system_from_path, FrameDocument};
pub use output::{report_json, write_report, FrameReport};
