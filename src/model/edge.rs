//! Edge of the paving graph.

use serde::{Deserialize, Serialize};
use super::{SubVertexId, VertexId};

/// Opaque edge identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What an edge records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeColor {
    /// Both ends denote the same real-world element. Undirected in effect.
    SamePoint,
    /// Walking clockwise around a quadrangle corner from `from` lands on `to`.
    BoundaryStep,
}

/// A colored, weighted link between two sub-vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub color: EdgeColor,
    pub from: SubVertexId,
    pub to: SubVertexId,
    pub from_vertex: VertexId,
    pub to_vertex: VertexId,
    /// Interior angle of the corner this edge closes (zero for same-point edges).
    pub weight: f64,
}

impl Edge {
    pub fn same_point(id: EdgeId, vertex: VertexId, ends: [SubVertexId; 2]) -> Self {
        Self {
            id,
            color: EdgeColor::SamePoint,
            from: ends[0],
            to: ends[1],
            from_vertex: vertex,
            to_vertex: vertex,
            weight: 0.0,
        }
    }

    pub fn boundary_step(
        id: EdgeId,
        from: (SubVertexId, VertexId),
        to: (SubVertexId, VertexId),
        weight: f64,
    ) -> Self {
        Self {
            id,
            color: EdgeColor::BoundaryStep,
            from: from.0,
            to: to.0,
            from_vertex: from.1,
            to_vertex: to.1,
            weight,
        }
    }

    /// The "other" end of the edge from the given sub-vertex.
    pub fn other_end(&self, from: SubVertexId) -> Option<SubVertexId> {
        if from == self.from { Some(self.to) }
        else if from == self.to { Some(self.from) }
        else { None }
    }
}
