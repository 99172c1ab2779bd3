//! Vertex of the paving graph: a real-life edge of the tiling.

use serde::{Deserialize, Serialize};
use super::{EdgeId, SubVertexId};

/// Opaque vertex identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub usize);

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A side of the tiling, shared by one or two quadrangles.
///
/// Its length is a spherical angle and never changes once set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    /// `[start, end]` endpoint occurrences, in the clockwise order of the
    /// quadrangle that created the vertex.
    pub sub_vertices: [SubVertexId; 2],
    pub length: f64,
    /// The same-point edge joining the two sub-vertices.
    pub link: Option<EdgeId>,
}

impl Vertex {
    pub fn new(id: VertexId, sub_vertices: [SubVertexId; 2], length: f64) -> Self {
        Self { id, sub_vertices, length, link: None }
    }

    pub fn start(&self) -> SubVertexId {
        self.sub_vertices[0]
    }

    pub fn end(&self) -> SubVertexId {
        self.sub_vertices[1]
    }

    /// The endpoint opposite `sub`, or None if `sub` is not one of ours.
    pub fn other_end(&self, sub: SubVertexId) -> Option<SubVertexId> {
        if sub == self.sub_vertices[0] { Some(self.sub_vertices[1]) }
        else if sub == self.sub_vertices[1] { Some(self.sub_vertices[0]) }
        else { None }
    }
}
