//! # sphere-paving: Paving Graphs for Spherical Quadrangle Tilings
//!
//! Builds a tiling of the sphere by spherical quadrangles one tile at a
//! time, tracking around every corner how much of the full turn is already
//! used.
//!
//! ## Design Principles
//!
//! 1. **Registries own everything**: vertices, sub-vertices and edges live in
//!    id-keyed arenas; relationships are plain ids
//! 2. **Clean DTOs**: `Vertex`, `SubVertex`, `Edge`, `Quadrangle` are pure data
//! 3. **Validate, then mutate**: a rejected attachment leaves the graph untouched
//! 4. **Backtracking by value**: a `PavingGraph` is `Clone`; copy it to explore
//!
//! ## Quick Start
//!
//! ```rust
//! use std::f64::consts::FRAC_PI_2;
//! use sphere_paving::{PavingGraph, Quadrangle, VertexId};
//!
//! # fn example() -> sphere_paving::Result<()> {
//! let mut graph = PavingGraph::seeded([FRAC_PI_2])?;
//! let square = Quadrangle::regular(FRAC_PI_2, FRAC_PI_2);
//!
//! let attached = graph.add_quad(&square, 0, VertexId(0))?;
//! assert_eq!(attached.created.len(), 3);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Vocabulary
//!
//! | Term | Meaning |
//! |------|---------|
//! | Vertex | a side of the tiling, shared by one or two quadrangles |
//! | Sub-vertex | one of the two endpoint occurrences of a vertex |
//! | Boundary-step edge | directed link around a quadrangle corner |
//! | Same-point edge | undirected link between the two ends of a vertex |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod storage;
pub mod paving;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Corner, Quadrangle,
    Vertex, VertexId, SubVertex, SubVertexId,
    Edge, EdgeColor, EdgeId,
};

// ============================================================================
// Re-exports: Storage
// ============================================================================

pub use storage::{Registry, Registered, SlotId};

// ============================================================================
// Re-exports: Paving graph
// ============================================================================

pub use paving::{
    PavingGraph, PavingConfig, Closure, CornerWalk, Link,
    AttachError, Attachment, FailureKind,
};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Attachment failed: {0}")]
    Attach(#[from] AttachError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid vertex length: {0}")]
    InvalidLength(f64),

    #[error("Corrupted graph: {0}")]
    Corrupted(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
