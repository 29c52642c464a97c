use std::collections::HashMap;

use crate::mesh::Vertex;

/// Raw bit patterns of every vertex component.
///
/// Two vertices share a key only if they are bitwise identical, so `0.0` and
/// `-0.0` stay apart and a NaN matches the same NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct VertexKey {
    position: [u64; 3],
    normal: [u64; 3],
    texture: [u64; 3],
    color: [u8; 4],
}

impl From<&Vertex> for VertexKey {
    fn from(v: &Vertex) -> Self {
        Self {
            position: v.position.map(f64::to_bits),
            normal: v.normal.map(f64::to_bits),
            texture: v.texture.map(f64::to_bits),
            color: v.color,
        }
    }
}

/// Assigns sequential indices to vertices in order of first appearance.
#[derive(Debug, Default)]
pub(crate) struct VertexInterner {
    indices: HashMap<VertexKey, u32>,
    vertices: Vec<Vertex>,
}

impl VertexInterner {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: HashMap::with_capacity(capacity),
            vertices: Vec::with_capacity(capacity),
        }
    }

    /// Returns the index of `vertex`, inserting it if it was not seen before.
    pub(crate) fn intern(&mut self, vertex: Vertex) -> u32 {
        let next = self.vertices.len() as u32;
        let index = *self.indices.entry(VertexKey::from(&vertex)).or_insert(next);
        if index == next {
            self.vertices.push(vertex);
        }
        index
    }

    pub(crate) fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Vertices ordered by their assigned index.
    pub(crate) fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn vertex(x: f64) -> Vertex {
        Vertex::new([x, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0])
    }

    #[test]
    fn test_first_occurrence_order() {
        let mut interner = VertexInterner::default();
        assert_eq!(interner.intern(vertex(3.0)), 0);
        assert_eq!(interner.intern(vertex(1.0)), 1);
        assert_eq!(interner.intern(vertex(3.0)), 0);
        assert_eq!(interner.intern(vertex(2.0)), 2);
        assert_eq!(interner.len(), 3);

        let xs: Vec<f64> = interner
            .into_vertices()
            .iter()
            .map(|v| v.position[0])
            .collect();
        assert_eq!(xs, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_bitwise_equality() {
        let mut interner = VertexInterner::default();
        assert_eq!(interner.intern(vertex(0.0)), 0);
        assert_eq!(interner.intern(vertex(-0.0)), 1);
        assert_eq!(interner.intern(vertex(f64::NAN)), 2);
        assert_eq!(interner.intern(vertex(f64::NAN)), 2);
        // no tolerance
        assert_eq!(interner.intern(vertex(1.0)), 3);
        assert_eq!(interner.intern(vertex(1.0 + f64::EPSILON)), 4);
    }
}
