//! # Paving Graph Model
//!
//! Plain DTOs for the paving graph and the quadrangle tile.
//! Ids are non-owning handles into the registries of a `PavingGraph`.
//!
//! Design rule: no registry or graph logic here. This module is pure data.

pub mod quadrangle;
pub mod vertex;
pub mod sub_vertex;
pub mod edge;

pub use quadrangle::{Corner, Quadrangle};
pub use vertex::{Vertex, VertexId};
pub use sub_vertex::{SubVertex, SubVertexId};
pub use edge::{Edge, EdgeColor, EdgeId};
