//! Binary format `version 2.00`.
//!
//! All values are little endian.
//!
//! # Layout
//! ```text
//! 0x00: header_size u16 (always 12)
//! 0x02: vertex_size u8 (36, or 40 with color)
//! 0x03: face_size u8 (always 12)
//! 0x04: vertex_count u32
//! 0x08: face_count u32
//! 0x0C: vertex_data (vertex_count * vertex_size)
//! var:  face_data (face_count * face_size)
//! ```
//!
//! A vertex record is position, normal and texture as three `f32` each,
//! followed by RGBA bytes if the vertex size says so. A face record is three
//! `u32` indices.

use std::io::{Read, Write};

use log::{debug, trace};

use crate::{
    error::FormatError,
    mesh::{Face, Mesh, Vertex, MAX_PREALLOC},
    version::Version,
};

pub const HEADER_SIZE: usize = 2 + 1 + 1 + 4 + 4;
pub const VERTEX_SIZE: usize = (4 + 4 + 4) + (4 + 4 + 4) + (4 + 4 + 4);
pub const COLOR_VERTEX_SIZE: usize = VERTEX_SIZE + (1 + 1 + 1 + 1);
pub const FACE_SIZE: usize = 4 + 4 + 4;

/// Binary header (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    vertex_size: u8,
    face_size: u8,
    vertex_count: u32,
    face_count: u32,
}

impl Header {
    fn to_bytes(self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..2].copy_from_slice(&(HEADER_SIZE as u16).to_le_bytes());
        bytes[2] = self.vertex_size;
        bytes[3] = self.face_size;
        bytes[4..8].copy_from_slice(&self.vertex_count.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.face_count.to_le_bytes());
        bytes
    }

    /// Reads and validates the header. Reading stops at the first field that
    /// does not match.
    fn read<R: Read>(reader: &mut R) -> Result<Self, FormatError> {
        let mut size = [0u8; 2];
        reader.read_exact(&mut size)?;
        let header_size = u16::from_le_bytes(size);
        if header_size as usize != HEADER_SIZE {
            return Err(FormatError::UnexpectedHeaderSize(header_size));
        }

        let mut bytes = [0u8; HEADER_SIZE];
        reader.read_exact(&mut bytes[2..])?;

        let vertex_size = bytes[2];
        if !matches!(vertex_size as usize, VERTEX_SIZE | COLOR_VERTEX_SIZE) {
            return Err(FormatError::UnexpectedVertexSize(vertex_size));
        }
        let face_size = bytes[3];
        if face_size as usize != FACE_SIZE {
            return Err(FormatError::UnexpectedFaceSize(face_size));
        }

        Ok(Self {
            vertex_size,
            face_size,
            vertex_count: u32_at(&bytes, 4),
            face_count: u32_at(&bytes, 8),
        })
    }

    fn has_color(&self) -> bool {
        self.vertex_size as usize == COLOR_VERTEX_SIZE
    }
}

fn u32_at(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn f32_at(bytes: &[u8], at: usize) -> f64 {
    f32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]) as f64
}

fn vec_at(bytes: &[u8], at: usize) -> [f64; 3] {
    [f32_at(bytes, at), f32_at(bytes, at + 4), f32_at(bytes, at + 8)]
}

fn put_vec(bytes: &mut [u8], at: usize, v: [f64; 3]) {
    for (i, c) in v.iter().enumerate() {
        let at = at + i * 4;
        bytes[at..at + 4].copy_from_slice(&(*c as f32).to_le_bytes());
    }
}

pub(crate) fn decode<R: Read>(reader: &mut R) -> Result<Mesh, FormatError> {
    let header = Header::read(reader)?;
    let has_color = header.has_color();
    debug!(
        "Reading {} vertices ({} bytes each), {} faces",
        header.vertex_count, header.vertex_size, header.face_count
    );

    let mut buf = [0u8; COLOR_VERTEX_SIZE];
    let record = &mut buf[..header.vertex_size as usize];

    let mut vertices = Vec::with_capacity((header.vertex_count as usize).min(MAX_PREALLOC));
    for _ in 0..header.vertex_count {
        reader.read_exact(record)?;
        let mut vertex = Vertex::new(vec_at(record, 0), vec_at(record, 12), vec_at(record, 24));
        if has_color {
            vertex.color = [record[36], record[37], record[38], record[39]];
        }
        trace!("Vertex {:?}", vertex);
        vertices.push(vertex);
    }

    let mut record = [0u8; FACE_SIZE];
    let mut faces = Vec::with_capacity((header.face_count as usize).min(MAX_PREALLOC));
    for _ in 0..header.face_count {
        reader.read_exact(&mut record)?;
        faces.push(Face::new(
            u32_at(&record, 0),
            u32_at(&record, 4),
            u32_at(&record, 8),
        ));
    }

    Ok(Mesh {
        version: Version::V2_00,
        has_color,
        vertices,
        faces,
    })
}

/// Writes header, vertices and faces. Face indices are written as they are.
pub(crate) fn encode<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<(), FormatError> {
    let count = |len: usize| u32::try_from(len).map_err(|_| FormatError::TooManyElements(len));
    let vertex_size = if mesh.has_color {
        COLOR_VERTEX_SIZE
    } else {
        VERTEX_SIZE
    };
    let header = Header {
        vertex_size: vertex_size as u8,
        face_size: FACE_SIZE as u8,
        vertex_count: count(mesh.vertices.len())?,
        face_count: count(mesh.faces.len())?,
    };
    writer.write_all(&header.to_bytes())?;

    let mut buf = [0u8; COLOR_VERTEX_SIZE];
    let record = &mut buf[..vertex_size];
    for vertex in &mesh.vertices {
        put_vec(record, 0, vertex.position);
        put_vec(record, 12, vertex.normal);
        put_vec(record, 24, vertex.texture);
        if mesh.has_color {
            record[36..40].copy_from_slice(&vertex.color);
        }
        writer.write_all(record)?;
    }

    let mut record = [0u8; FACE_SIZE];
    for face in &mesh.faces {
        for (i, index) in face.indices.iter().enumerate() {
            record[i * 4..i * 4 + 4].copy_from_slice(&index.to_le_bytes());
        }
        writer.write_all(&record)?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use std::io;

    use super::*;

    fn header(header_size: u16, vertex_size: u8, face_size: u8) -> Vec<u8> {
        let mut bytes = header_size.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[vertex_size, face_size]);
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes
    }

    #[test]
    fn test_layout_constants() {
        assert_eq!(HEADER_SIZE, 12);
        assert_eq!(VERTEX_SIZE, 36);
        assert_eq!(COLOR_VERTEX_SIZE, 40);
        assert_eq!(FACE_SIZE, 12);
    }

    #[test]
    fn test_encode_layout() -> Result<(), FormatError> {
        let mut mesh = Mesh::new(Version::V2_00, true);
        mesh.vertices.push(
            Vertex::new([1.0, 2.0, 3.0], [0.0, 0.0, -1.0], [0.5, 0.25, 0.0])
                .with_color([10, 20, 30, 255]),
        );
        mesh.faces.push(Face::new(0, 0, 7));

        let mut out = Vec::new();
        encode(&mesh, &mut out)?;
        assert_eq!(out.len(), HEADER_SIZE + COLOR_VERTEX_SIZE + FACE_SIZE);
        assert_eq!(&out[..12], &[12, 0, 40, 12, 1, 0, 0, 0, 1, 0, 0, 0]);
        assert_eq!(&out[12..16], &1.0f32.to_le_bytes());
        assert_eq!(&out[32..36], &(-1.0f32).to_le_bytes());
        assert_eq!(&out[40..44], &0.25f32.to_le_bytes());
        assert_eq!(&out[48..52], &[10, 20, 30, 255]);
        // unchecked index is written verbatim
        assert_eq!(&out[60..64], &7u32.to_le_bytes());
        Ok(())
    }

    #[test]
    fn test_decode_without_color() -> Result<(), FormatError> {
        let mut mesh = Mesh::new(Version::V2_00, false);
        mesh.vertices.push(
            Vertex::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.5, 0.5, 0.0])
                .with_color([1, 2, 3, 4]),
        );
        mesh.faces.push(Face::new(0, 0, 0));

        let mut out = Vec::new();
        encode(&mesh, &mut out)?;
        assert_eq!(out.len(), HEADER_SIZE + VERTEX_SIZE + FACE_SIZE);

        let decoded = decode(&mut &out[..])?;
        assert!(!decoded.has_color);
        assert_eq!(decoded.vertices[0].color, [0, 0, 0, 0]);
        assert_eq!(decoded.vertices[0].position, [1.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn test_rejects_header_size() {
        let bytes = header(14, 36, 12);
        assert!(matches!(
            decode(&mut &bytes[..]),
            Err(FormatError::UnexpectedHeaderSize(14))
        ));
    }

    #[test]
    fn test_rejects_vertex_size() {
        let bytes = header(12, 37, 12);
        assert!(matches!(
            decode(&mut &bytes[..]),
            Err(FormatError::UnexpectedVertexSize(37))
        ));
    }

    #[test]
    fn test_rejects_face_size() {
        let bytes = header(12, 40, 6);
        assert!(matches!(
            decode(&mut &bytes[..]),
            Err(FormatError::UnexpectedFaceSize(6))
        ));
    }

    #[test]
    fn test_truncated_records() {
        let mut bytes = header(12, 36, 12);
        bytes[4] = 2;
        bytes.extend_from_slice(&[0u8; VERTEX_SIZE + 3]);
        match decode(&mut &bytes[..]) {
            Err(FormatError::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_indices_not_validated_on_decode() -> Result<(), FormatError> {
        let mut bytes = header(12, 36, 12);
        bytes[8] = 1;
        for index in [5u32, 6, 7] {
            bytes.extend_from_slice(&index.to_le_bytes());
        }
        let mesh = decode(&mut &bytes[..])?;
        assert!(mesh.vertices.is_empty());
        assert_eq!(mesh.faces, vec![Face::new(5, 6, 7)]);
        Ok(())
    }
}
