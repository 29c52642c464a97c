//! # rbxmesh
//!
//! Decoder and encoder for mesh files in three versions:
//!
//! - `version 1.00`: text, positions stored at twice their size
//! - `version 1.01`: text
//! - `version 2.00`: binary, optionally with vertex colors
//!
//! Every file starts with its version signature on a line of its own. Decoding
//! picks the format from that line, encoding from [`Mesh::version`].
//!
//! ## Example
//!
//! ```rust
//! use rbxmesh::{Face, Mesh, Version, Vertex};
//!
//! let mut mesh = Mesh::new(Version::V2_00, false);
//! mesh.vertices.push(Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0]));
//! mesh.vertices.push(Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]));
//! mesh.vertices.push(Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]));
//! mesh.faces.push(Face::new(0, 1, 2));
//!
//! let mut bytes = Vec::new();
//! let written = mesh.write_to(&mut bytes).unwrap();
//!
//! let (decoded, read) = Mesh::read_from(&bytes[..]).unwrap();
//! assert_eq!(written, read);
//! assert_eq!(decoded, mesh);
//! ```

pub mod binary;
mod counter;
pub mod error;
mod intern;
pub mod mesh;
mod text;
pub mod version;

pub use error::{CodecError, FormatError, Result};
pub use mesh::{Face, Mesh, Vertex};
pub use version::Version;
