//! Boundary with the meshing collaborator.
//!
//! The organism only ever emits vertices, edges and quad faces through a
//! [`MeshSink`]. [`MeshBuffers`] is the in-memory sink used by the viewer
//! and the tests.

use crate::types::Vector3;

/// Receiver of mesh primitives.
pub trait MeshSink {
    type Vertex: Copy;

    fn new_vertex(&mut self, position: Vector3) -> Self::Vertex;
    fn new_edge(&mut self, a: Self::Vertex, b: Self::Vertex);
    /// A quad, wound consistently across the whole surface.
    fn new_face(&mut self, quad: [Self::Vertex; 4]);
}

/// Index of a vertex in [`MeshBuffers::vertices`].
pub type VertexId = usize;

/// Flat vertex/edge/face lists.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeshBuffers {
    pub vertices: Vec<Vector3>,
    pub edges: Vec<[VertexId; 2]>,
    pub faces: Vec<[VertexId; 4]>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.faces.clear();
    }
}

impl MeshSink for MeshBuffers {
    type Vertex = VertexId;

    fn new_vertex(&mut self, position: Vector3) -> VertexId {
        let id = self.vertices.len();
        self.vertices.push(position);
        id
    }

    fn new_edge(&mut self, a: VertexId, b: VertexId) {
        self.edges.push([a, b]);
    }

    fn new_face(&mut self, quad: [VertexId; 4]) {
        self.faces.push(quad);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_handles_are_sequential_indices() {
        let mut m = MeshBuffers::new();
        let a = m.new_vertex(Vector3::ZERO);
        let b = m.new_vertex(Vector3::X);
        m.new_edge(a, b);
        assert_eq!((a, b), (0, 1));
        assert_eq!(m.edges, vec![[0, 1]]);
    }

    #[test]
    fn clear_empties_all_lists() {
        let mut m = MeshBuffers::new();
        let v: Vec<_> = (0..4).map(|i| m.new_vertex(Vector3::splat(i as f64))).collect();
        m.new_face([v[0], v[1], v[2], v[3]]);
        m.clear();
        assert_eq!(m, MeshBuffers::default());
    }
}
