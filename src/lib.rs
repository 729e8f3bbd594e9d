pub mod crowd;
pub mod systems;

pub use crowd::*;
