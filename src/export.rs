//! Graph export for external viewers and plotters.
//!
//! Two text formats, both write-only:
//!
//! ```text
//! PavingGraph → export_dot()            → Graphviz digraph (dot -Tsvg)
//! PavingGraph → export_adjacency_json() → JSON snapshot for a sphere plotter
//! ```
//!
//! In the DOT output, same-point edges are blue and undirected, boundary-step
//! edges are red and labeled with their angle.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use crate::model::*;
use crate::paving::{Link, PavingGraph};
use crate::Result;

/// Write the graph as a Graphviz digraph.
///
/// Sub-vertices become nodes named `s<id>`, clustered by their vertex.
pub fn export_dot(graph: &PavingGraph, writer: &mut dyn Write) -> Result<()> {
    writeln!(writer, "digraph paving {{")?;
    writeln!(writer, "    // vertices: {}", graph.vertex_count())?;
    writeln!(writer, "    // quadrangles: {}", graph.quad_count())?;
    writeln!(writer, "    node [shape=point];")?;

    for vertex in graph.vertices().values() {
        let interior = graph.is_interior(vertex.id);
        writeln!(writer, "    subgraph cluster_v{} {{", vertex.id)?;
        writeln!(
            writer,
            "        label=\"v{} ({})\"; style={};",
            vertex.id,
            format_angle(vertex.length),
            if interior { "solid" } else { "dashed" },
        )?;
        for sub in vertex.sub_vertices {
            writeln!(writer, "        s{sub};")?;
        }
        writeln!(writer, "    }}")?;
    }

    for link in graph.adjacency() {
        writeln!(writer, "    {}", format_link(&link))?;
    }
    writeln!(writer, "}}")?;
    Ok(())
}

/// JSON view of one vertex.
#[derive(Debug, Serialize)]
struct VertexRecord {
    id: VertexId,
    length: f64,
    sub_vertices: [SubVertexId; 2],
    interior: bool,
}

/// JSON view of the whole graph.
#[derive(Debug, Serialize)]
struct Snapshot {
    quad_count: usize,
    covered_area: f64,
    vertices: Vec<VertexRecord>,
    links: Vec<Link>,
    /// Angle already swept around each open boundary sub-vertex, by id.
    open_fans: BTreeMap<SubVertexId, f64>,
}

/// Write a JSON snapshot of vertices and links.
pub fn export_adjacency_json(graph: &PavingGraph, writer: &mut dyn Write) -> Result<()> {
    let vertices = graph
        .vertices()
        .values()
        .map(|v| VertexRecord {
            id: v.id,
            length: v.length,
            sub_vertices: v.sub_vertices,
            interior: graph.is_interior(v.id),
        })
        .collect();

    let open_fans = graph
        .sub_vertices()
        .values()
        .filter(|s| !s.is_saturated() && !s.is_untouched())
        .map(|s| (s.id, graph.walk_fan(s).angle))
        .collect();

    let snapshot = Snapshot {
        quad_count: graph.quad_count(),
        covered_area: graph.covered_area(),
        vertices,
        links: graph.adjacency(),
        open_fans,
    };
    serde_json::to_writer_pretty(&mut *writer, &snapshot)?;
    writeln!(writer)?;
    Ok(())
}

/// Format one link as a DOT edge statement.
fn format_link(link: &Link) -> String {
    match link.color {
        EdgeColor::SamePoint => format!(
            "s{} -> s{} [color=blue, dir=none];",
            link.from, link.to
        ),
        EdgeColor::BoundaryStep => format!(
            "s{} -> s{} [color=red, label=\"{}\"];",
            link.from,
            link.to,
            format_angle(link.weight)
        ),
    }
}

/// Format an angle in radians with four decimals.
fn format_angle(radians: f64) -> String {
    format!("{radians:.4}")
}
