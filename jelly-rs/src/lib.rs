use thiserror::Error;

pub mod config;
pub mod mesh;
pub mod movement;
pub mod sim;

pub use config::{JellyConfig, SlideConfig};
pub use mesh::{DeformedMesh, RestMesh};
pub use movement::SlideController;
pub use sim::JellyBody;

#[derive(Error, Debug)]
pub enum JellyError {
    #[error("mesh has no vertices")]
    EmptyMesh,
    #[error("vertex count mismatch: mesh has {expected} vertices, got {actual}")]
    VertexCountMismatch { expected: usize, actual: usize },
}
