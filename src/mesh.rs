use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Read, Write},
    path::Path,
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    binary,
    counter::{CountingReader, CountingWriter},
    error::{CodecError, FormatError, Result},
    text,
    version::Version,
};

/// Upper bound for allocations sized by counts read from a stream.
pub(crate) const MAX_PREALLOC: usize = 1 << 16;

/// A single vertex of a [`Mesh`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: [f64; 3],
    pub normal: [f64; 3],
    /// U, V, W. No format stores W, it is kept in memory only.
    pub texture: [f64; 3],
    /// R, G, B, A. Ignored unless [`Mesh::has_color`] is set.
    pub color: [u8; 4],
}

impl Vertex {
    pub fn new(position: [f64; 3], normal: [f64; 3], texture: [f64; 3]) -> Self {
        Self {
            position,
            normal,
            texture,
            color: [0; 4],
        }
    }

    pub fn with_color(self, color: [u8; 4]) -> Self {
        Self { color, ..self }
    }
}

/// A triangle, given as three indices into [`Mesh::vertices`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Face {
    pub indices: [u32; 3],
}

impl Face {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self { indices: [a, b, c] }
    }

    pub fn indices(&self) -> [u32; 3] {
        self.indices
    }
}

/// Contents of a mesh file.
///
/// Decoding fills in every field from the stream. Encoding writes every field
/// in the format selected by [`Mesh::version`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub version: Version,
    /// Whether vertices carry color. Only the binary format can store it.
    pub has_color: bool,
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new(version: Version, has_color: bool) -> Self {
        Self {
            version,
            has_color,
            ..Default::default()
        }
    }

    /// Decodes a mesh from `reader`, returning it with the number of bytes
    /// consumed.
    ///
    /// The reader is buffered internally, so bytes past the end of the mesh may
    /// be pulled from it. They are not part of the returned count.
    pub fn read_from<R: Read>(reader: R) -> Result<(Self, u64)> {
        let mut reader = CountingReader::new(BufReader::new(reader));
        match Self::decode(&mut reader) {
            Ok(mesh) => Ok((mesh, reader.bytes_read())),
            Err(err) => Err(CodecError::new(err, reader.bytes_read())),
        }
    }

    /// Encodes the mesh into `writer` and returns the number of bytes written.
    ///
    /// On failure the error carries the number of bytes written before it.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<u64> {
        let mut writer = CountingWriter::new(writer);
        match self.encode(&mut writer) {
            Ok(()) => Ok(writer.bytes_written()),
            Err(err) => Err(CodecError::new(err, writer.bytes_written())),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read_from(bytes).map(|(mesh, _)| mesh)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| CodecError::new(e.into(), 0))?;
        Self::read_from(file).map(|(mesh, _)| mesh)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn to_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| CodecError::new(e.into(), 0))?;
        let mut writer = BufWriter::new(file);
        let n = self.write_to(&mut writer)?;
        writer.flush().map_err(|e| CodecError::new(e.into(), n))
    }

    /// Checks that every face index points at an existing vertex.
    ///
    /// Text encoding performs this check on its own, binary encoding does not.
    pub fn validate_indices(&self) -> std::result::Result<(), FormatError> {
        for face in &self.faces {
            self.resolve(face)?;
        }
        Ok(())
    }

    pub(crate) fn resolve(&self, face: &Face) -> std::result::Result<[&Vertex; 3], FormatError> {
        let get = |index: u32| {
            self.vertices
                .get(index as usize)
                .ok_or(FormatError::IndexOutOfRange {
                    index,
                    len: self.vertices.len(),
                })
        };
        let [a, b, c] = face.indices;
        Ok([get(a)?, get(b)?, get(c)?])
    }

    fn decode<R: BufRead>(reader: &mut R) -> std::result::Result<Self, FormatError> {
        let version = match text::read_line(reader)? {
            Some(line) => std::str::from_utf8(&line)
                .map(Version::from_signature)
                .unwrap_or(Version::Unknown),
            None => Version::Unknown,
        };
        debug!("Decoding mesh: {}", version);

        match version {
            Version::V1_00 | Version::V1_01 => text::decode(reader, version),
            Version::V2_00 => binary::decode(reader),
            Version::Unknown => Err(FormatError::UnknownVersion),
        }
    }

    fn encode<W: Write>(&self, writer: &mut W) -> std::result::Result<(), FormatError> {
        if self.version == Version::Unknown {
            return Err(FormatError::UnknownVersion);
        }
        debug!(
            "Encoding mesh: {} ({} vertices, {} faces)",
            self.version,
            self.vertices.len(),
            self.faces.len()
        );

        writer.write_all(self.version.signature().as_bytes())?;
        writer.write_all(b"\n")?;

        match self.version {
            Version::V1_00 | Version::V1_01 => text::encode(self, writer),
            Version::V2_00 => binary::encode(self, writer),
            Version::Unknown => Err(FormatError::UnknownVersion),
        }
    }
}
