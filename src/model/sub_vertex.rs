//! Sub-vertex: one endpoint occurrence of a vertex.

use serde::{Deserialize, Serialize};
use super::{EdgeId, VertexId};

/// Opaque sub-vertex identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubVertexId(pub usize);

impl std::fmt::Display for SubVertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An endpoint of a vertex, as seen from the corners of the quadrangles
/// that meet there.
///
/// Each quadrangle using the parent vertex fills exactly one of the two
/// boundary-step slots, so a sub-vertex on the open boundary has at most
/// one of `incoming` / `outgoing` set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubVertex {
    pub id: SubVertexId,
    pub vertex: VertexId,
    /// Boundary-step edge ending here.
    pub incoming: Option<EdgeId>,
    /// Boundary-step edge starting here.
    pub outgoing: Option<EdgeId>,
    /// Same-point edge shared with the other end of the vertex.
    pub neighbour: Option<EdgeId>,
}

impl SubVertex {
    pub fn new(id: SubVertexId, vertex: VertexId) -> Self {
        Self {
            id,
            vertex,
            incoming: None,
            outgoing: None,
            neighbour: None,
        }
    }

    /// Both boundary-step slots are taken: two quadrangles meet here.
    pub fn is_saturated(&self) -> bool {
        self.incoming.is_some() && self.outgoing.is_some()
    }

    /// No boundary-step edge touches this sub-vertex yet.
    pub fn is_untouched(&self) -> bool {
        self.incoming.is_none() && self.outgoing.is_none()
    }
}
