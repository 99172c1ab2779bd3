//! # Paving Graph
//!
//! The combinatorial state of a partially built paving: three independent
//! registries (vertices, sub-vertices, edges) plus the operations that grow
//! them. Quadrangle attachment lives in [`attach`].
//!
//! ## Orientation
//!
//! A vertex is created by the quadrangle that first uses it, with its
//! sub-vertices stored `[start, end]` in that quadrangle's clockwise order.
//! Around a corner the boundary-step edges form a chain
//! `side@P -> next side@P -> ...`; the chain closes into a cycle exactly
//! when the angles around P sum to a full turn.
//!
//! ## Limitations
//!
//! - **Removal is shallow**: `remove_vertex()` frees the vertex id only. Its
//!   sub-vertices and edges stay registered.
//! - **Single-threaded**: the graph is a plain value. Explore alternatives by
//!   cloning it.

pub mod attach;

use std::f64::consts::{PI, TAU};

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::*;
use crate::storage::Registry;
use crate::{Error, Result};

pub use attach::{AttachError, Attachment, FailureKind};

// ============================================================================
// Configuration
// ============================================================================

/// Numerical tolerances used when comparing angles and lengths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PavingConfig {
    /// Absolute tolerance for an angle sum to count as a full turn.
    pub angle_tolerance: f64,
    /// Absolute tolerance for two side lengths to count as equal.
    pub length_tolerance: f64,
}

impl Default for PavingConfig {
    fn default() -> Self {
        Self {
            angle_tolerance: 1e-4,
            length_tolerance: 1e-4,
        }
    }
}

impl PavingConfig {
    /// Classify an accumulated angle against a full turn.
    pub fn closure(&self, sum: f64) -> Closure {
        if sum > TAU + self.angle_tolerance {
            Closure::OverClosed
        } else if (sum - TAU).abs() <= self.angle_tolerance {
            Closure::Closed
        } else {
            Closure::Open
        }
    }

    pub fn same_length(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.length_tolerance
    }
}

/// State of the angles around one physical corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closure {
    /// Less than a full turn: more quadrangles fit.
    Open,
    /// Exactly a full turn.
    Closed,
    /// More than a full turn: infeasible.
    OverClosed,
}

// ============================================================================
// Query results
// ============================================================================

/// Result of walking a corner fan from one sub-vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerWalk {
    /// Sum of the corner angles already placed around the point.
    pub angle: f64,
    /// Farthest sub-vertex reached.
    pub last: SubVertexId,
    /// Number of edges followed.
    pub steps: usize,
}

/// One edge of the adjacency, flattened for callers that draw or measure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub edge: EdgeId,
    pub color: EdgeColor,
    pub from: SubVertexId,
    pub to: SubVertexId,
    pub weight: f64,
}

// ============================================================================
// PavingGraph
// ============================================================================

/// Partially built paving of the sphere.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PavingGraph {
    config: PavingConfig,
    vertices: Registry<Vertex>,
    sub_vertices: Registry<SubVertex>,
    edges: Registry<Edge>,
    quad_count: usize,
    covered_area: f64,
}

impl PavingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PavingConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// Graph whose boundary is one standalone vertex per length.
    pub fn seeded(lengths: impl IntoIterator<Item = f64>) -> Result<Self> {
        let mut graph = Self::new();
        for length in lengths {
            graph.add_vertex(length)?;
        }
        Ok(graph)
    }

    pub fn config(&self) -> &PavingConfig {
        &self.config
    }

    // ========================================================================
    // Creation & registration
    // ========================================================================

    /// Create a standalone vertex, e.g. to seed the boundary.
    pub fn add_vertex(&mut self, length: f64) -> Result<VertexId> {
        if !length.is_finite() || length <= 0.0 {
            return Err(Error::InvalidLength(length));
        }
        Ok(self.create_vertex(length).0)
    }

    /// Register a vertex together with its two sub-vertices and its
    /// same-point edge.
    pub(crate) fn create_vertex(&mut self, length: f64) -> (VertexId, [SubVertexId; 2]) {
        let vertex_id = self.vertices.peek_id();
        let start = self.sub_vertices.register(SubVertex::new(SubVertexId(0), vertex_id));
        let end = self.sub_vertices.register(SubVertex::new(SubVertexId(0), vertex_id));
        let id = self.vertices.register(Vertex::new(vertex_id, [start, end], length));
        debug_assert_eq!(id, vertex_id);

        let link = self.register_edge(Edge::same_point(EdgeId(0), id, [start, end]));
        if let Some(vertex) = self.vertices.get_mut(id) {
            vertex.link = Some(link);
        }
        debug!(vertex = %id, length, "created vertex");
        (id, [start, end])
    }

    /// Register an edge and record its id on both endpoints.
    ///
    /// Panics if a boundary-step slot it needs is already taken.
    pub(crate) fn register_edge(&mut self, edge: Edge) -> EdgeId {
        let (color, from, to) = (edge.color, edge.from, edge.to);
        let id = self.edges.register(edge);
        match color {
            EdgeColor::SamePoint => {
                for end in [from, to] {
                    if let Some(sub) = self.sub_vertices.get_mut(end) {
                        sub.neighbour = Some(id);
                    }
                }
            }
            EdgeColor::BoundaryStep => {
                if let Some(origin) = self.sub_vertices.get_mut(from) {
                    assert!(origin.outgoing.is_none(), "sub-vertex {from} already has an outgoing edge");
                    origin.outgoing = Some(id);
                }
                if let Some(dest) = self.sub_vertices.get_mut(to) {
                    assert!(dest.incoming.is_none(), "sub-vertex {to} already has an incoming edge");
                    dest.incoming = Some(id);
                }
            }
        }
        id
    }

    /// Free a vertex id. Its sub-vertices and edges are left in place.
    pub fn remove_vertex(&mut self, id: VertexId) -> Result<Vertex> {
        self.vertices
            .release(id)
            .ok_or_else(|| Error::NotFound(format!("Vertex {id}")))
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    pub fn sub_vertex(&self, id: SubVertexId) -> Option<&SubVertex> {
        self.sub_vertices.get(id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn vertices(&self) -> &Registry<Vertex> {
        &self.vertices
    }

    pub fn sub_vertices(&self) -> &Registry<SubVertex> {
        &self.sub_vertices
    }

    pub fn edges(&self) -> &Registry<Edge> {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn sub_vertex_count(&self) -> usize {
        self.sub_vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // ========================================================================
    // Adjacency
    // ========================================================================

    /// Every edge as a flat link, in ascending edge id order.
    pub fn adjacency(&self) -> Vec<Link> {
        self.edges
            .values()
            .map(|e| Link {
                edge: e.id,
                color: e.color,
                from: e.from,
                to: e.to,
                weight: e.weight,
            })
            .collect()
    }

    /// Sub-vertex on the other side of the same-point edge.
    pub fn neighbour(&self, id: SubVertexId) -> Option<SubVertexId> {
        let edge = self.edges.get(self.sub_vertices.get(id)?.neighbour?)?;
        edge.other_end(id)
    }

    /// A vertex is interior once two quadrangles use it.
    pub fn is_interior(&self, id: VertexId) -> bool {
        self.vertices.get(id).is_some_and(|v| {
            v.sub_vertices
                .iter()
                .all(|s| self.sub_vertices.get(*s).is_some_and(SubVertex::is_saturated))
        })
    }

    /// Vertices still on the open boundary, ascending.
    pub fn exterior_vertices(&self) -> Vec<VertexId> {
        self.vertices.ids().filter(|id| !self.is_interior(*id)).collect()
    }

    /// True when the graph is non-empty and no boundary is left.
    pub fn is_closed(&self) -> bool {
        !self.vertices.is_empty() && self.vertices.ids().all(|id| self.is_interior(id))
    }

    // ========================================================================
    // Coverage
    // ========================================================================

    pub fn quad_count(&self) -> usize {
        self.quad_count
    }

    /// Sum of the spherical excess of every attached quadrangle.
    pub fn covered_area(&self) -> f64 {
        self.covered_area
    }

    /// Covered fraction of the unit sphere (area 4π).
    pub fn coverage(&self) -> f64 {
        self.covered_area / (4.0 * PI)
    }

    // ========================================================================
    // Boundary walk
    // ========================================================================

    /// Walk the corner fan through `start` to its farthest built sub-vertex.
    ///
    /// Follows incoming edges backward if `start` has one, otherwise
    /// outgoing edges forward, summing their angles.
    ///
    /// Panics if `start` has both boundary slots set.
    pub fn find_last_subvertex(&self, start: SubVertexId) -> Result<CornerWalk> {
        let origin = self
            .sub_vertices
            .get(start)
            .ok_or_else(|| Error::NotFound(format!("Sub-vertex {start}")))?;
        Ok(self.walk_fan(origin))
    }

    pub(crate) fn walk_fan(&self, origin: &SubVertex) -> CornerWalk {
        let start = origin.id;
        assert!(
            !origin.is_saturated(),
            "sub-vertex {start} has both an incoming and an outgoing edge"
        );
        let backward = origin.incoming.is_some();

        let mut walk = CornerWalk { angle: 0.0, last: start, steps: 0 };
        let limit = self.sub_vertices.len();
        while let Some(edge) = self.next_step(walk.last, backward) {
            assert!(walk.steps < limit, "corner fan through {start} does not terminate");
            walk.angle += edge.weight;
            walk.last = if backward { edge.from } else { edge.to };
            walk.steps += 1;
        }
        walk
    }

    fn next_step(&self, at: SubVertexId, backward: bool) -> Option<&Edge> {
        let sub = self.sub_vertices.get(at)?;
        let id = if backward { sub.incoming } else { sub.outgoing }?;
        self.edges.get(id)
    }

    // ========================================================================
    // Integrity
    // ========================================================================

    /// Check that every id stored anywhere resolves and that slots and
    /// edges agree with each other.
    pub fn validate(&self) -> Result<()> {
        let corrupted = |msg: String| Err(Error::Corrupted(msg));

        for (id, vertex) in self.vertices.iter() {
            for sub in vertex.sub_vertices {
                match self.sub_vertices.get(sub) {
                    Some(s) if s.vertex == id => {}
                    Some(s) => return corrupted(format!("sub-vertex {sub} of vertex {id} points to vertex {}", s.vertex)),
                    None => return corrupted(format!("vertex {id} owns missing sub-vertex {sub}")),
                }
            }
            let Some(link) = vertex.link.and_then(|l| self.edges.get(l)) else {
                return corrupted(format!("vertex {id} has no same-point edge"));
            };
            if link.color != EdgeColor::SamePoint || [link.from, link.to] != vertex.sub_vertices {
                return corrupted(format!("same-point edge {} does not join vertex {id}", link.id));
            }
        }

        let mut referenced = HashSet::new();
        for (id, sub) in self.sub_vertices.iter() {
            if !self.vertices.contains(sub.vertex) {
                return corrupted(format!("sub-vertex {id} belongs to missing vertex {}", sub.vertex));
            }
            let slots = [
                (sub.incoming, EdgeColor::BoundaryStep, false),
                (sub.outgoing, EdgeColor::BoundaryStep, true),
                (sub.neighbour, EdgeColor::SamePoint, true),
            ];
            for (slot, color, is_origin) in slots {
                let Some(edge_id) = slot else { continue };
                let Some(edge) = self.edges.get(edge_id) else {
                    return corrupted(format!("sub-vertex {id} refers to missing edge {edge_id}"));
                };
                let touches = match color {
                    EdgeColor::SamePoint => edge.other_end(id).is_some(),
                    EdgeColor::BoundaryStep if is_origin => edge.from == id,
                    EdgeColor::BoundaryStep => edge.to == id,
                };
                if edge.color != color || !touches {
                    return corrupted(format!("sub-vertex {id} slot disagrees with edge {edge_id}"));
                }
                referenced.insert(edge_id);
            }
        }

        for (id, edge) in self.edges.iter() {
            for (sub, vertex) in [(edge.from, edge.from_vertex), (edge.to, edge.to_vertex)] {
                match self.sub_vertices.get(sub) {
                    Some(s) if s.vertex == vertex => {}
                    _ => return corrupted(format!("edge {id} end {sub} is not on vertex {vertex}")),
                }
            }
            if !referenced.contains(&id) {
                return corrupted(format!("edge {id} is not recorded on its endpoints"));
            }
        }
        Ok(())
    }

    pub(crate) fn record_quad(&mut self, quad: &Quadrangle) {
        self.quad_count += 1;
        self.covered_area += quad.area();
    }
}

// ============================================================================
// Tests
// ============================================================================
