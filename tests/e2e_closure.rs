//! End-to-end tests for corners that close to a full turn.
//!
//! Covers the fan of four squares around one point, the follow-on side check
//! a closing corner forces, failures further along the propagation, and a
//! complete spherical cube.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use pretty_assertions::assert_eq;
use sphere_paving::{AttachError, Corner, PavingGraph, Quadrangle, VertexId};

fn square() -> Quadrangle {
    Quadrangle::regular(FRAC_PI_2, FRAC_PI_2)
}

/// Quadrangle with a π/2 vertex on sides 0 and 2 and unit sides between.
fn oblong(angles: [f64; 4]) -> Quadrangle {
    Quadrangle::new([FRAC_PI_2, 1.0, FRAC_PI_2, 1.0], angles)
}

/// Quadrangle with π/2 sides a, b and unit sides c, d.
fn kite(angles: [f64; 4]) -> Quadrangle {
    Quadrangle::new([FRAC_PI_2, FRAC_PI_2, 1.0, 1.0], angles)
}

/// Face of the cube inscribed in the unit sphere: angles 2π/3, sides arccos(1/3).
fn cube_face() -> Quadrangle {
    Quadrangle::regular((1.0f64 / 3.0).acos(), TAU / 3.0)
}

/// Three squares fanned around the B end of the seed. Returns the graph and
/// the last radial vertex, which still has a free side.
fn three_squares_around_a_point() -> (PavingGraph, VertexId) {
    let mut graph = PavingGraph::seeded([FRAC_PI_2]).unwrap();
    let mut target = VertexId(0);
    for _ in 0..3 {
        let att = graph.add_quad(&square(), 0, target).unwrap();
        // The first created vertex is side b, the next radial side.
        target = att.created[0];
    }
    (graph, target)
}

// ============================================================================
// 1. Four squares around one point
// ============================================================================

#[test]
fn test_fourth_square_closes_the_corner() {
    let (mut graph, target) = three_squares_around_a_point();
    assert_eq!(target, VertexId(7));

    let walk = graph.find_last_subvertex(graph.vertex(target).unwrap().start()).unwrap();
    assert_eq!(walk.steps, 3);
    assert!((walk.angle - 3.0 * FRAC_PI_2).abs() < 1e-12);

    let att = graph.add_quad(&square(), 0, target).unwrap();

    assert_eq!(att.closed.as_slice(), &[Corner::Beta]);
    assert_eq!(att.reused.as_slice(), &[VertexId(7), VertexId(0)]);
    assert_eq!(att.created.len(), 2);
    assert_eq!(graph.vertex_count(), 12);

    // The four radial sides are now shared by two squares each.
    for radial in [0, 1, 4, 7] {
        assert!(graph.is_interior(VertexId(radial)), "vertex {radial}");
    }
    assert_eq!(graph.exterior_vertices().len(), 8);
    assert!(graph.validate().is_ok());
}

#[test]
fn test_closed_fan_is_a_cycle() {
    let (mut graph, target) = three_squares_around_a_point();
    graph.add_quad(&square(), 0, target).unwrap();

    // Follow outgoing steps from the seed's centre end: four quarter turns
    // bring us back.
    let centre = graph.vertex(VertexId(0)).unwrap().start();
    let mut at = centre;
    let mut total = 0.0;
    for _ in 0..4 {
        let edge = graph.edge(graph.sub_vertex(at).unwrap().outgoing.unwrap()).unwrap();
        total += edge.weight;
        at = edge.to;
    }
    assert_eq!(at, centre);
    assert!((total - TAU).abs() < 1e-12);
}

#[test]
fn test_closing_corner_checks_following_side() {
    let (mut graph, target) = three_squares_around_a_point();
    let before = graph.clone();

    // Side b must land on the seed (length π/2) once corner B closes.
    let long_b = Quadrangle::new([FRAC_PI_2, 1.0, FRAC_PI_2, FRAC_PI_2], [FRAC_PI_2; 4]);
    let err = graph.add_quad(&long_b, 0, target).unwrap_err();

    assert_eq!(
        err,
        AttachError::LengthMismatch {
            side: 1,
            vertex: VertexId(0),
            expected: 1.0,
            found: FRAC_PI_2,
        }
    );
    assert_eq!(graph, before);
}

#[test]
fn test_almost_full_turn_counts_as_closed() {
    let (mut graph, target) = three_squares_around_a_point();
    let mut angles = [FRAC_PI_2; 4];
    angles[1] += 5e-5;
    let nudged = Quadrangle::new([FRAC_PI_2; 4], angles);

    let att = graph.add_quad(&nudged, 0, target).unwrap();
    assert_eq!(att.closed.as_slice(), &[Corner::Beta]);
}

// ============================================================================
// 2. Failures past the first corner
// ============================================================================

#[test]
fn test_over_closure_after_first_corner_closes() {
    let q = FRAC_PI_4;
    let mut graph = PavingGraph::seeded([FRAC_PI_2]).unwrap();
    let first = Quadrangle::new([FRAC_PI_2; 4], [3.0 * q, 5.0 * q, 3.0 * q, 5.0 * q]);
    graph.add_quad(&first, 1, VertexId(0)).unwrap();
    let before = graph.clone();

    // The first corner walked closes at 5π/4 + 3π/4; the next one adds π
    // to a fan of 5π/4 and overshoots.
    let second = Quadrangle::new([FRAC_PI_2; 4], [5.0 * q, PI, 5.0 * q, PI]);
    let err = graph.add_quad(&second, 1, VertexId(1)).unwrap_err();

    let AttachError::OverClosure { corner, sum } = err.clone() else {
        panic!("expected over-closure, got {err:?}");
    };
    assert_eq!(corner, Corner::Delta);
    assert!((sum - 9.0 * q).abs() < 1e-9);
    assert_eq!(graph, before);
}

#[test]
fn test_over_closure_at_last_forward_corner() {
    let q = FRAC_PI_4;
    let tile = oblong([5.0 * q, 5.0 * q, PI, PI]);
    let mut graph = PavingGraph::seeded([FRAC_PI_2]).unwrap();
    graph.add_quad(&tile, 2, VertexId(0)).unwrap();
    let before = graph.clone();

    let err = graph.add_quad(&tile, 1, VertexId(1)).unwrap_err();

    let AttachError::OverClosure { corner, sum } = err.clone() else {
        panic!("expected over-closure, got {err:?}");
    };
    assert_eq!(corner, Corner::Alpha);
    assert!((sum - 10.0 * q).abs() < 1e-9);
    assert_eq!(graph, before);
}

#[test]
fn test_backward_closure_disagrees_with_forward_side() {
    let q = FRAC_PI_4;
    let mut graph = PavingGraph::seeded([FRAC_PI_2]).unwrap();
    graph.add_quad(&oblong([5.0 * q, 5.0 * q, q, q]), 0, VertexId(0)).unwrap();
    graph.add_quad(&square(), 1, VertexId(2)).unwrap();
    let before = graph.clone();

    // Closing forward fixes side c on one vertex, closing backward on another.
    let err = graph
        .add_quad(&oblong([3.0 * q, 3.0 * q, 5.0 * q, 5.0 * q]), 3, VertexId(1))
        .unwrap_err();

    assert_eq!(
        err,
        AttachError::ConflictingClosure {
            side: 2,
            first: VertexId(6),
            second: VertexId(4),
        }
    );
    assert_eq!(graph, before);
}

#[test]
fn test_one_vertex_cannot_fill_two_sides() {
    let mut graph = PavingGraph::seeded([FRAC_PI_2]).unwrap();
    graph.add_quad(&kite([PI; 4]), 1, VertexId(0)).unwrap();
    graph.add_quad(&kite([PI, PI / 3.0, PI / 3.0, PI]), 2, VertexId(2)).unwrap();
    let before = graph.clone();

    let err = graph
        .add_quad(&Quadrangle::regular(FRAC_PI_2, TAU / 3.0), 0, VertexId(3))
        .unwrap_err();

    assert_eq!(
        err,
        AttachError::DuplicateSide {
            vertex: VertexId(3),
            first: 0,
            second: 2,
        }
    );
    assert_eq!(graph, before);
    assert!(graph.validate().is_ok());
}

// ============================================================================
// 3. A whole sphere
// ============================================================================

#[test]
fn test_cube_closes_the_sphere() {
    let face = cube_face();
    let mut graph = PavingGraph::seeded([face.a()]).unwrap();
    let mut created = Vec::new();

    while let Some(target) = graph.exterior_vertices().first().copied() {
        let att = graph.add_quad(&face, 0, target).unwrap();
        created.push(att.created.len());
        assert!(graph.quad_count() <= 6, "cube did not close");

        // No boundary walk loops or revisits.
        for sub in graph.sub_vertices().values() {
            if !sub.is_saturated() {
                let walk = graph.find_last_subvertex(sub.id).unwrap();
                assert!(walk.steps < graph.sub_vertex_count());
                assert!(walk.angle < TAU);
            }
        }
    }

    assert_eq!(created, vec![3, 3, 2, 2, 1, 0]);
    assert!(graph.is_closed());
    assert_eq!(graph.vertex_count(), 12);
    assert_eq!(graph.sub_vertex_count(), 24);
    assert_eq!(graph.edge_count(), 36);
    assert!((graph.coverage() - 1.0).abs() < 1e-9);
    assert!(graph.validate().is_ok());

    let ids: Vec<VertexId> = graph.vertices().ids().collect();
    for id in ids {
        assert_eq!(
            graph.add_quad(&face, 0, id),
            Err(AttachError::InteriorVertex(id))
        );
    }
}

#[test]
fn test_last_cube_face_closes_every_corner() {
    let face = cube_face();
    let mut graph = PavingGraph::seeded([face.a()]).unwrap();
    let mut last = None;
    while let Some(target) = graph.exterior_vertices().first().copied() {
        last = Some(graph.add_quad(&face, 0, target).unwrap());
    }

    let last = last.unwrap();
    assert!(last.created.is_empty());
    assert_eq!(last.reused.len(), 4);
    assert_eq!(last.closed.len(), 4);
}
