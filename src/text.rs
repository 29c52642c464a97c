//! Text formats `version 1.00` and `version 1.01`.
//!
//! ```text
//! version 1.01
//! <face count>
//! [px,py,pz][nx,ny,nz][tu,tv,tw][px,py,pz][nx,ny,nz][tu,tv,tw]...
//! ```
//!
//! Each face is three corners, each corner is three bracketed triples with no
//! separators. There is no vertex table: identical corners are merged again
//! when decoding. The V texture axis is flipped on disk and `version 1.00`
//! stores positions at twice their size.

use std::io::{self, BufRead, Read, Write};

use log::{debug, trace, warn};

use crate::{
    error::FormatError,
    intern::VertexInterner,
    mesh::{Face, Mesh, Vertex, MAX_PREALLOC},
    version::Version,
};

/// Longest signature or face count line accepted, terminator included.
pub(crate) const MAX_LINE_LEN: u64 = 256;

/// Reads one line and strips its `\n` or `\r\n` terminator.
///
/// A last line without terminator is accepted, an exhausted reader is an
/// `UnexpectedEof` error. Returns `None` if no terminator shows up within
/// [`MAX_LINE_LEN`] bytes; those bytes are consumed.
pub(crate) fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<Vec<u8>>, FormatError> {
    let mut line = Vec::new();
    let n = reader
        .by_ref()
        .take(MAX_LINE_LEN)
        .read_until(b'\n', &mut line)?;
    if n == 0 {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    } else if n as u64 == MAX_LINE_LEN {
        return Ok(None);
    }
    Ok(Some(line))
}

pub(crate) fn decode<R: BufRead>(reader: &mut R, version: Version) -> Result<Mesh, FormatError> {
    let face_count = match read_line(reader)? {
        Some(line) => parse_face_count(&line)?,
        None => {
            return Err(FormatError::InvalidFaceCount(format!(
                "line longer than {} bytes",
                MAX_LINE_LEN
            )))
        }
    };
    debug!("Reading {} faces", face_count);

    let capacity = face_count.min(MAX_PREALLOC);
    let mut interner = VertexInterner::with_capacity(capacity);
    let mut faces = Vec::with_capacity(capacity);

    for _ in 0..face_count {
        let mut indices = [0u32; 3];
        for index in &mut indices {
            let mut vertex = read_corner(reader)?;
            vertex.texture[1] = 1.0 - vertex.texture[1];
            if version == Version::V1_00 {
                let scale = version.position_scale();
                vertex.position = vertex.position.map(|p| p * scale);
            }
            *index = interner.intern(vertex);
        }
        faces.push(Face { indices });
    }

    debug!(
        "Merged {} corners into {} vertices",
        face_count.saturating_mul(3),
        interner.len()
    );

    Ok(Mesh {
        version,
        has_color: false,
        vertices: interner.into_vertices(),
        faces,
    })
}

pub(crate) fn encode<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<(), FormatError> {
    writeln!(writer, "{}", mesh.faces.len())?;

    let scale = 1.0 / mesh.version.position_scale();
    for face in &mesh.faces {
        // resolve the whole face first so nothing of it is written on failure
        let corners = mesh.resolve(face)?;

        let mut buf = String::with_capacity(3 * 3 * 36);
        for v in corners {
            let position = if mesh.version == Version::V1_00 {
                v.position.map(|p| p * scale)
            } else {
                v.position
            };
            let texture = [v.texture[0], 1.0 - v.texture[1], v.texture[2]];

            buf.push_str(&format_triple(position));
            buf.push_str(&format_triple(v.normal));
            buf.push_str(&format_triple(texture));
        }
        writer.write_all(buf.as_bytes())?;
    }

    Ok(())
}

/// Leading digits of the line. Anything after them is ignored.
fn parse_face_count(line: &[u8]) -> Result<usize, FormatError> {
    let digits = line.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits < line.len() {
        warn!(
            "Ignoring trailing data after face count: {:?}",
            String::from_utf8_lossy(&line[digits..])
        );
    }
    if digits == 0 {
        return Ok(0);
    }

    let count = String::from_utf8_lossy(&line[..digits]);
    count
        .parse()
        .map_err(|_| FormatError::InvalidFaceCount(count.into_owned()))
}

fn format_triple(v: [f64; 3]) -> String {
    format!("[{:.6},{:.6},{:.6}]", v[0] as f32, v[1] as f32, v[2] as f32)
}

fn read_corner<R: BufRead>(reader: &mut R) -> Result<Vertex, FormatError> {
    let position = read_triple(reader)?;
    let normal = read_triple(reader)?;
    let texture = read_triple(reader)?;
    trace!("Corner {:?} {:?} {:?}", position, normal, texture);
    Ok(Vertex::new(position, normal, texture))
}

fn read_triple<R: BufRead>(reader: &mut R) -> Result<[f64; 3], FormatError> {
    expect(reader, b'[')?;
    let x = read_float(reader)?;
    expect(reader, b',')?;
    let y = read_float(reader)?;
    expect(reader, b',')?;
    let z = read_float(reader)?;
    expect(reader, b']')?;
    Ok([x, y, z])
}

fn peek<R: BufRead>(reader: &mut R) -> io::Result<Option<u8>> {
    Ok(reader.fill_buf()?.first().copied())
}

fn expect<R: BufRead>(reader: &mut R, expected: u8) -> Result<(), FormatError> {
    match peek(reader)? {
        Some(found) if found == expected => {
            reader.consume(1);
            Ok(())
        }
        Some(found) => Err(FormatError::UnexpectedChar {
            expected: expected as char,
            found: found as char,
        }),
        None => Err(io::Error::from(io::ErrorKind::UnexpectedEof).into()),
    }
}

/// Reads a number, skipping spaces and tabs in front of it.
fn read_float<R: BufRead>(reader: &mut R) -> Result<f64, FormatError> {
    while let Some(b' ' | b'\t') = peek(reader)? {
        reader.consume(1);
    }

    let mut token = String::new();
    while let Some(b) = peek(reader)? {
        if !(b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.')) {
            break;
        }
        token.push(b as char);
        reader.consume(1);
    }

    if token.is_empty() && peek(reader)?.is_none() {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    Ok(token.parse()?)
}
