//! Quadrangle attachment.
//!
//! Attaching runs in two phases. `plan()` decides, without touching the
//! graph, which of the four sides of the quadrangle already exist (a corner
//! that closes to a full turn reuses the side that starts its fan) and fails
//! on any geometric inconsistency, including two of its corners extending
//! the same fan. `apply()` then creates the missing sides
//! and the four boundary-step edges. A failed attachment therefore leaves
//! the graph exactly as it was.
//!
//! Inside this module the quadrangle is rotated so that the glued side is
//! side 0. Corners are numbered clockwise A=0, B=1, C=2, D=3 and side `i`
//! runs from corner `i` to corner `i + 1`. Errors and results are reported
//! in the caller's labels.

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::model::*;
use super::{Closure, CornerWalk, PavingGraph};

// ============================================================================
// Outcome types
// ============================================================================

/// Why a quadrangle could not be attached.
///
/// All variants are ordinary outcomes of exploring candidate attachments;
/// the graph is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttachError {
    #[error("Unknown vertex {0}")]
    UnknownVertex(VertexId),

    #[error("Vertex {0} is interior: two quadrangles already share it")]
    InteriorVertex(VertexId),

    #[error("Side {side} has length {expected}, vertex {vertex} has length {found}")]
    LengthMismatch { side: usize, vertex: VertexId, expected: f64, found: f64 },

    #[error("Angle sum {sum} at corner {corner} exceeds a full turn")]
    OverClosure { corner: Corner, sum: f64 },

    #[error("Side {side} closes onto both vertex {first} and vertex {second}")]
    ConflictingClosure { side: usize, first: VertexId, second: VertexId },

    #[error("Vertex {vertex} would serve as both side {first} and side {second}")]
    DuplicateSide { vertex: VertexId, first: usize, second: usize },

    #[error("Corner {corner} joins two existing sides without closing")]
    OpenCorner { corner: Corner },
}

/// Coarse failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A side does not fit the vertex it would be glued or closed onto.
    GeometryMismatch,
    /// The angles around a corner would exceed a full turn.
    OverClosure,
}

impl AttachError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AttachError::OverClosure { .. } => FailureKind::OverClosure,
            _ => FailureKind::GeometryMismatch,
        }
    }
}

/// What a successful attachment changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// Vertices created for sides that did not exist yet, in side order.
    pub created: SmallVec<[VertexId; 4]>,
    /// Existing vertices the quadrangle was glued or closed onto, target first.
    pub reused: SmallVec<[VertexId; 4]>,
    /// Boundary-step edge registered at each corner, indexed by `Corner::index()`.
    pub steps: [EdgeId; 4],
    /// Corners whose angle sum reached a full turn.
    pub closed: SmallVec<[Corner; 4]>,
}

// ============================================================================
// Plan
// ============================================================================

/// A side of the quadrangle resolved to a vertex, oriented along the
/// quadrangle's clockwise traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SideEnds {
    vertex: VertexId,
    start: SubVertexId,
    end: SubVertexId,
}

#[derive(Debug)]
struct Plan {
    quad: Quadrangle,
    rotation: usize,
    sides: [Option<SideEnds>; 4],
    closed: [bool; 4],
}

impl Plan {
    fn side_label(&self, side: usize) -> usize {
        (side + self.rotation) % 4
    }

    fn corner_label(&self, corner: usize) -> Corner {
        Corner::from_index(corner + self.rotation)
    }
}

impl PavingGraph {
    /// Glue side `side` of `quad` onto the boundary vertex `target`.
    pub fn add_quad(
        &mut self,
        quad: &Quadrangle,
        side: usize,
        target: VertexId,
    ) -> Result<Attachment, AttachError> {
        match self.plan(quad, side, target) {
            Ok(plan) => Ok(self.apply(plan)),
            Err(err) => {
                debug!(vertex = %target, side, error = %err, "rejected quadrangle");
                Err(err)
            }
        }
    }

    fn plan(&self, quad: &Quadrangle, side: usize, target: VertexId) -> Result<Plan, AttachError> {
        let rotation = side % 4;
        let vertex = self.vertex(target).ok_or(AttachError::UnknownVertex(target))?;
        if self.is_interior(target) {
            return Err(AttachError::InteriorVertex(target));
        }

        let mut plan = Plan {
            quad: quad.rotate(rotation),
            rotation,
            sides: [None; 4],
            closed: [false; 4],
        };
        self.check_length(&plan, 0, target)?;
        plan.sides[0] = Some(self.glued_ends(vertex));

        self.propagate_forward(&mut plan)?;
        self.propagate_backward(&mut plan)?;

        for i in 0..4 {
            let Some(a) = plan.sides[i] else { continue };
            for j in (i + 1)..4 {
                if plan.sides[j].is_some_and(|b| b.vertex == a.vertex) {
                    return Err(AttachError::DuplicateSide {
                        vertex: a.vertex,
                        first: plan.side_label(i),
                        second: plan.side_label(j),
                    });
                }
            }
        }
        for corner in 0..4 {
            let both_exist = plan.sides[(corner + 3) % 4].is_some() && plan.sides[corner].is_some();
            if both_exist && !plan.closed[corner] {
                return Err(AttachError::OpenCorner { corner: plan.corner_label(corner) });
            }
        }
        self.check_shared_fans(&plan)?;
        Ok(plan)
    }

    /// Close corners B, C, D in turn, each walking back from the end of the
    /// side before it. Stops at the first corner that stays open.
    fn propagate_forward(&self, plan: &mut Plan) -> Result<(), AttachError> {
        for corner in 1..4 {
            let Some(prev) = plan.sides[corner - 1] else { break };
            let walk = self.fan(prev.end);
            let Some(head) = self.try_close(plan, corner, walk)? else { break };

            let ends = self.oriented_from_start(head);
            self.check_length(plan, corner, ends.vertex)?;
            trace!(corner = %plan.corner_label(corner), vertex = %ends.vertex, "corner closes forward");
            plan.sides[corner] = Some(ends);
            plan.closed[corner] = true;
        }
        Ok(())
    }

    /// Close corners A, D, C, B in turn, each walking forward from the start
    /// of the side after it. A side already fixed by the forward pass must
    /// name the same vertex.
    fn propagate_backward(&self, plan: &mut Plan) -> Result<(), AttachError> {
        for corner in [0, 3, 2, 1] {
            if plan.closed[corner] {
                break;
            }
            let Some(next) = plan.sides[corner] else { break };
            let walk = self.fan(next.start);
            let Some(tail) = self.try_close(plan, corner, walk)? else { break };
            plan.closed[corner] = true;

            let prev = (corner + 3) % 4;
            let ends = self.oriented_from_end(tail);
            if let Some(known) = plan.sides[prev] {
                if known.vertex != ends.vertex {
                    return Err(AttachError::ConflictingClosure {
                        side: plan.side_label(prev),
                        first: known.vertex,
                        second: ends.vertex,
                    });
                }
                break;
            }
            self.check_length(plan, prev, ends.vertex)?;
            trace!(corner = %plan.corner_label(corner), vertex = %ends.vertex, "corner closes backward");
            plan.sides[prev] = Some(ends);
        }
        Ok(())
    }

    /// Add the quadrangle's angle at `corner` to a walked fan. Returns the
    /// far end of the fan when the corner closes.
    fn try_close(&self, plan: &Plan, corner: usize, walk: CornerWalk) -> Result<Option<SubVertexId>, AttachError> {
        let sum = walk.angle + plan.quad.angles()[corner];
        match self.config().closure(sum) {
            Closure::Open => Ok(None),
            Closure::Closed if walk.steps > 0 => Ok(Some(walk.last)),
            Closure::Closed | Closure::OverClosed => Err(AttachError::OverClosure {
                corner: plan.corner_label(corner),
                sum,
            }),
        }
    }

    /// Two corners of one quadrangle cannot lie at the same point. Corners
    /// meet there when the fans they extend are one chain, identified by the
    /// sub-vertex it starts from. The angle that point would carry decides
    /// the error.
    fn check_shared_fans(&self, plan: &Plan) -> Result<(), AttachError> {
        let heads: [SmallVec<[SubVertexId; 2]>; 4] = std::array::from_fn(|corner| {
            let mut heads = SmallVec::new();
            if let Some(prev) = plan.sides[(corner + 3) % 4] {
                heads.push(self.fan(prev.end).last);
            }
            if let Some(next) = plan.sides[corner] {
                heads.push(next.start);
            }
            heads
        });

        for corner in 0..4 {
            let mut group = [false; 4];
            group[corner] = true;
            let mut shared: SmallVec<[SubVertexId; 8]> = heads[corner].iter().copied().collect();
            let mut grown = true;
            while grown {
                grown = false;
                for other in 0..4 {
                    if !group[other] && heads[other].iter().any(|h| shared.contains(h)) {
                        group[other] = true;
                        shared.extend(heads[other].iter().copied());
                        grown = true;
                    }
                }
            }
            if group.iter().filter(|g| **g).count() < 2 {
                continue;
            }

            shared.sort();
            shared.dedup();
            let existing: f64 = shared.iter().map(|h| self.fan(*h).angle).sum();
            let added: f64 = (0..4).filter(|c| group[*c]).map(|c| plan.quad.angles()[c]).sum();
            let sum = existing + added;
            let corner = plan.corner_label(corner);
            trace!(%corner, sum, "corners share a point");
            return Err(match self.config().closure(sum) {
                Closure::OverClosed => AttachError::OverClosure { corner, sum },
                Closure::Open | Closure::Closed => AttachError::OpenCorner { corner },
            });
        }
        Ok(())
    }

    fn check_length(&self, plan: &Plan, side: usize, vertex: VertexId) -> Result<(), AttachError> {
        let expected = plan.quad.side(side);
        let found = self.vertex(vertex).map_or(f64::NAN, |v| v.length);
        if self.config().same_length(expected, found) {
            Ok(())
        } else {
            Err(AttachError::LengthMismatch {
                side: plan.side_label(side),
                vertex,
                expected,
                found,
            })
        }
    }

    /// Orientation of the glued side as the new quadrangle traverses it:
    /// opposite to the quadrangle already using it, so its B end is the
    /// sub-vertex that already has an incoming step.
    fn glued_ends(&self, vertex: &Vertex) -> SideEnds {
        let [first, second] = vertex.sub_vertices;
        let reversed = self.sub_vertex(second).is_some_and(|s| s.incoming.is_some())
            || self.sub_vertex(first).is_some_and(|s| s.outgoing.is_some());
        let (start, end) = if reversed { (first, second) } else { (second, first) };
        SideEnds { vertex: vertex.id, start, end }
    }

    fn oriented_from_start(&self, start: SubVertexId) -> SideEnds {
        let (vertex, other) = self.owner(start);
        SideEnds { vertex, start, end: other }
    }

    fn oriented_from_end(&self, end: SubVertexId) -> SideEnds {
        let (vertex, other) = self.owner(end);
        SideEnds { vertex, start: other, end }
    }

    /// Walk the fan through a sub-vertex of a live side.
    fn fan(&self, sub: SubVertexId) -> CornerWalk {
        match self.sub_vertex(sub) {
            Some(origin) => self.walk_fan(origin),
            None => panic!("sub-vertex {sub} is not attached to a live vertex"),
        }
    }

    /// Parent vertex of `sub` and the vertex's other sub-vertex.
    fn owner(&self, sub: SubVertexId) -> (VertexId, SubVertexId) {
        let vertex = self.sub_vertex(sub).map(|s| s.vertex);
        let other = vertex.and_then(|v| self.vertex(v)).and_then(|v| v.other_end(sub));
        match (vertex, other) {
            (Some(vertex), Some(other)) => (vertex, other),
            _ => panic!("sub-vertex {sub} is not attached to a live vertex"),
        }
    }

    // ========================================================================
    // Apply
    // ========================================================================

    fn apply(&mut self, plan: Plan) -> Attachment {
        let mut created: SmallVec<[VertexId; 4]> = SmallVec::new();
        let reused = plan.sides.iter().flatten().map(|s| s.vertex).collect();

        let ends: [SideEnds; 4] = std::array::from_fn(|side| {
            plan.sides[side].unwrap_or_else(|| {
                let (vertex, [start, end]) = self.create_vertex(plan.quad.side(side));
                created.push(vertex);
                SideEnds { vertex, start, end }
            })
        });

        let mut steps = [EdgeId(0); 4];
        for corner in 0..4 {
            let from = ends[(corner + 3) % 4];
            let to = ends[corner];
            let edge = Edge::boundary_step(
                EdgeId(0),
                (from.end, from.vertex),
                (to.start, to.vertex),
                plan.quad.angles()[corner],
            );
            steps[plan.corner_label(corner).index()] = self.register_edge(edge);
        }

        let closed = (0..4)
            .filter(|c| plan.closed[*c])
            .map(|c| plan.corner_label(c))
            .collect();
        self.record_quad(&plan.quad);

        debug!(
            vertex = %ends[0].vertex,
            created = created.len(),
            quads = self.quad_count(),
            "attached quadrangle"
        );
        Attachment { created, reused, steps, closed }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    fn square() -> Quadrangle {
        Quadrangle::regular(FRAC_PI_2, FRAC_PI_2)
    }

    #[test]
    fn test_single_square_on_seed() {
        let mut graph = PavingGraph::seeded([FRAC_PI_2]).unwrap();
        let seed = VertexId(0);

        let att = graph.add_quad(&square(), 0, seed).unwrap();

        assert_eq!(att.created.len(), 3);
        assert_eq!(att.reused.as_slice(), &[seed]);
        assert!(att.closed.is_empty());
        assert_eq!(graph.vertex_count(), 4);
        // four same-point edges + four boundary steps
        assert_eq!(graph.edge_count(), 8);
        for id in &att.created {
            assert_eq!(graph.vertex(*id).unwrap().length, FRAC_PI_2);
        }
        for step in att.steps {
            let edge = graph.edge(step).unwrap();
            assert_eq!(edge.color, EdgeColor::BoundaryStep);
            assert_eq!(edge.weight, FRAC_PI_2);
        }
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_corner_sum_after_one_square() {
        let mut graph = PavingGraph::seeded([FRAC_PI_2]).unwrap();
        graph.add_quad(&square(), 0, VertexId(0)).unwrap();

        let seed = graph.vertex(VertexId(0)).unwrap();
        for sub in seed.sub_vertices {
            let walk = graph.find_last_subvertex(sub).unwrap();
            assert_eq!(walk.steps, 1);
            assert!((walk.angle - FRAC_PI_2).abs() < 1e-12);
        }
    }

    #[test]
    fn test_glued_side_uses_rotation() {
        let quad = Quadrangle::new([1.0, 0.5, 1.0, 0.5], [FRAC_PI_2; 4]);
        let mut graph = PavingGraph::seeded([0.5]).unwrap();

        assert!(matches!(
            graph.clone().add_quad(&quad, 0, VertexId(0)),
            Err(AttachError::LengthMismatch { side: 0, .. })
        ));
        let att = graph.add_quad(&quad, 1, VertexId(0)).unwrap();
        let lengths: Vec<f64> = att.created.iter().map(|v| graph.vertex(*v).unwrap().length).collect();
        assert_eq!(lengths, vec![1.0, 0.5, 1.0]);
    }

    #[test]
    fn test_length_mismatch_leaves_graph_unchanged() {
        let mut graph = PavingGraph::seeded([1.0]).unwrap();
        let before = graph.clone();

        let err = graph.add_quad(&square(), 0, VertexId(0)).unwrap_err();
        assert_eq!(err.kind(), FailureKind::GeometryMismatch);
        assert_eq!(graph, before);
    }

    #[test]
    fn test_unknown_and_interior_targets() {
        let mut graph = PavingGraph::seeded([FRAC_PI_2]).unwrap();
        assert_eq!(
            graph.add_quad(&square(), 0, VertexId(7)),
            Err(AttachError::UnknownVertex(VertexId(7)))
        );

        graph.add_quad(&square(), 0, VertexId(0)).unwrap();
        graph.add_quad(&square(), 0, VertexId(0)).unwrap();
        assert!(graph.is_interior(VertexId(0)));
        assert_eq!(
            graph.add_quad(&square(), 0, VertexId(0)),
            Err(AttachError::InteriorVertex(VertexId(0)))
        );
    }

    #[test]
    fn test_over_closure_is_reported_with_caller_corner() {
        // `wide` puts 3π/2 at one end of the seed; 2π/3 more overshoots.
        let wide = Quadrangle::new([1.0; 4], [3.0 * FRAC_PI_2, 0.3, 0.3, 0.3]);
        let narrow = Quadrangle::new([1.0; 4], [TAU / 3.0, 0.3, 0.3, 0.3]);
        let mut graph = PavingGraph::seeded([1.0]).unwrap();
        graph.add_quad(&wide, 3, VertexId(0)).unwrap();
        let before = graph.clone();

        let err = graph.add_quad(&narrow, 0, VertexId(0)).unwrap_err();
        assert_eq!(err.kind(), FailureKind::OverClosure);
        assert!(matches!(err, AttachError::OverClosure { corner: Corner::Alpha, .. }));
        assert_eq!(graph, before);
    }

    #[test]
    fn test_full_turn_from_single_corner_is_over_closure() {
        let quad = Quadrangle::new([1.0; 4], [TAU, PI, PI, PI]);
        let mut graph = PavingGraph::seeded([1.0]).unwrap();
        let err = graph.add_quad(&quad, 0, VertexId(0)).unwrap_err();
        assert!(matches!(err, AttachError::OverClosure { corner: Corner::Alpha, .. }));
    }

    #[test]
    fn test_error_messages() {
        let err = AttachError::OverClosure { corner: Corner::Beta, sum: 7.0 };
        assert_eq!(err.to_string(), "Angle sum 7 at corner beta exceeds a full turn");
        assert_eq!(AttachError::InteriorVertex(VertexId(3)).to_string(),
            "Vertex 3 is interior: two quadrangles already share it");
    }
}
