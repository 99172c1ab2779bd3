//! # Graph Storage
//!
//! Id-keyed registries that own every vertex, sub-vertex and edge of a
//! paving graph. Relationships between items are plain ids resolved
//! through the owning registry, never references.
//!
//! | Trait | Role |
//! |-------|------|
//! | `SlotId` | typed handle convertible to and from a slot index |
//! | `Registered` | item that remembers the id it was registered under |

pub mod registry;

use crate::model::*;

pub use registry::Registry;

// ============================================================================
// Traits
// ============================================================================

/// A typed handle backed by a slot index.
pub trait SlotId: Copy {
    fn from_index(index: usize) -> Self;
    fn index(self) -> usize;
}

/// An item that can live in a `Registry`.
///
/// Registration is side-effecting: the registry writes the assigned id
/// back into the item so it can be discovered from either direction.
pub trait Registered {
    type Id: SlotId;

    fn assign_id(&mut self, id: Self::Id);
}

// ============================================================================
// Model impls
// ============================================================================

impl SlotId for VertexId {
    fn from_index(index: usize) -> Self { VertexId(index) }
    fn index(self) -> usize { self.0 }
}

impl SlotId for SubVertexId {
    fn from_index(index: usize) -> Self { SubVertexId(index) }
    fn index(self) -> usize { self.0 }
}

impl SlotId for EdgeId {
    fn from_index(index: usize) -> Self { EdgeId(index) }
    fn index(self) -> usize { self.0 }
}

impl Registered for Vertex {
    type Id = VertexId;
    fn assign_id(&mut self, id: VertexId) { self.id = id; }
}

impl Registered for SubVertex {
    type Id = SubVertexId;
    fn assign_id(&mut self, id: SubVertexId) { self.id = id; }
}

impl Registered for Edge {
    type Id = EdgeId;
    fn assign_id(&mut self, id: EdgeId) { self.id = id; }
}
