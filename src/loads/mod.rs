//! Load types

mod distributed;
mod node_load;

pub use distributed::DistributedLoad;
pub use node_load::NodeLoad;
