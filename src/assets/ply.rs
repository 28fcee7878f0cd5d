//! PLY Decoding
//!
//! Hand-rolled decoder for the polygon file format, covering all three
//! encodings the format defines: `ascii`, `binary_little_endian` and
//! `binary_big_endian`, version 1.0.
//!
//! Only the `vertex` and `face` elements are interpreted; other elements
//! are decoded and discarded. Positions (`x y z`) are required. Normals
//! (`nx ny nz`) and colors (`red green blue`, integer or float) are picked
//! up when every component property is declared. Faces with more than
//! three corners are fan-triangulated; a file without faces decodes to a
//! point cloud.

use glam::Vec3;

use crate::errors::{Result, ViewerError};
use crate::resources::geometry::Geometry;

// Upper bound for pre-allocation; declared counts above this grow lazily so
// a hostile header cannot force a huge allocation up front.
const RESERVE_LIMIT: usize = 1 << 20;

// ============================================================================
// Header Model
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlyFormat {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarType {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Float,
    Double,
}

impl ScalarType {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "char" | "int8" => Some(Self::Char),
            "uchar" | "uint8" => Some(Self::UChar),
            "short" | "int16" => Some(Self::Short),
            "ushort" | "uint16" => Some(Self::UShort),
            "int" | "int32" => Some(Self::Int),
            "uint" | "uint32" => Some(Self::UInt),
            "float" | "float32" => Some(Self::Float),
            "double" | "float64" => Some(Self::Double),
            _ => None,
        }
    }

    fn size(self) -> usize {
        match self {
            Self::Char | Self::UChar => 1,
            Self::Short | Self::UShort => 2,
            Self::Int | Self::UInt | Self::Float => 4,
            Self::Double => 8,
        }
    }

    /// Scale factor mapping color values of this type into 0.0..=1.0.
    /// Integer colors span their full positive range; float colors are
    /// already normalized.
    fn color_scale(self) -> f64 {
        match self {
            Self::Char => 1.0 / 127.0,
            Self::UChar => 1.0 / 255.0,
            Self::Short => 1.0 / 32_767.0,
            Self::UShort => 1.0 / 65_535.0,
            Self::Int => 1.0 / 2_147_483_647.0,
            Self::UInt => 1.0 / 4_294_967_295.0,
            Self::Float | Self::Double => 1.0,
        }
    }
}

#[derive(Debug, Clone)]
enum Property {
    Scalar {
        name: String,
        ty: ScalarType,
    },
    List {
        name: String,
        count_ty: ScalarType,
        item_ty: ScalarType,
    },
}

impl Property {
    fn name(&self) -> &str {
        match self {
            Self::Scalar { name, .. } | Self::List { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone)]
struct Element {
    name: String,
    count: usize,
    properties: Vec<Property>,
}

#[derive(Debug)]
struct Header {
    format: PlyFormat,
    elements: Vec<Element>,
    /// Byte offset of the first body byte, right after the `end_header`
    /// newline.
    body_start: usize,
}

fn parse_header(bytes: &[u8]) -> Result<Header> {
    // The header is ASCII text terminated by an `end_header` line; the body
    // (possibly binary) begins on the byte after its newline.
    let mut line_start = 0;
    let mut body_start = None;
    while line_start < bytes.len() {
        let Some(rel) = bytes[line_start..].iter().position(|&b| b == b'\n') else {
            break;
        };
        let line_end = line_start + rel;
        let mut line = &bytes[line_start..line_end];
        if line.ends_with(b"\r") {
            line = &line[..line.len() - 1];
        }
        if line == b"end_header" {
            body_start = Some(line_end + 1);
            break;
        }
        line_start = line_end + 1;
    }
    let Some(body_start) = body_start else {
        return Err(ViewerError::ParseError(
            "missing end_header line".to_string(),
        ));
    };

    let text = std::str::from_utf8(&bytes[..body_start])
        .map_err(|e| ViewerError::ParseError(format!("header is not valid UTF-8: {e}")))?;

    let mut lines = text.lines();
    if lines.next().map(str::trim) != Some("ply") {
        return Err(ViewerError::ParseError(
            "not a PLY file (bad magic)".to_string(),
        ));
    }

    let mut format = None;
    let mut elements: Vec<Element> = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() || line.starts_with("comment") || line.starts_with("obj_info") {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "format" => {
                if parts.len() != 3 {
                    return Err(ViewerError::ParseError(format!(
                        "malformed format line: {line:?}"
                    )));
                }
                if parts[2] != "1.0" {
                    return Err(ViewerError::ParseError(format!(
                        "unsupported PLY version: {}",
                        parts[2]
                    )));
                }
                format = Some(match parts[1] {
                    "ascii" => PlyFormat::Ascii,
                    "binary_little_endian" => PlyFormat::BinaryLittleEndian,
                    "binary_big_endian" => PlyFormat::BinaryBigEndian,
                    other => {
                        return Err(ViewerError::ParseError(format!(
                            "unsupported PLY format: {other}"
                        )));
                    }
                });
            }
            "element" => {
                if parts.len() != 3 {
                    return Err(ViewerError::ParseError(format!(
                        "malformed element line: {line:?}"
                    )));
                }
                let count = parts[2].parse::<usize>().map_err(|_| {
                    ViewerError::ParseError(format!("invalid element count: {}", parts[2]))
                })?;
                elements.push(Element {
                    name: parts[1].to_string(),
                    count,
                    properties: Vec::new(),
                });
            }
            "property" => {
                let Some(element) = elements.last_mut() else {
                    return Err(ViewerError::ParseError(
                        "property declared before any element".to_string(),
                    ));
                };
                let property = if parts.get(1) == Some(&"list") {
                    if parts.len() != 5 {
                        return Err(ViewerError::ParseError(format!(
                            "malformed list property: {line:?}"
                        )));
                    }
                    let count_ty = ScalarType::from_name(parts[2]).ok_or_else(|| {
                        ViewerError::ParseError(format!("unsupported property type: {}", parts[2]))
                    })?;
                    let item_ty = ScalarType::from_name(parts[3]).ok_or_else(|| {
                        ViewerError::ParseError(format!("unsupported property type: {}", parts[3]))
                    })?;
                    Property::List {
                        name: parts[4].to_string(),
                        count_ty,
                        item_ty,
                    }
                } else {
                    if parts.len() != 3 {
                        return Err(ViewerError::ParseError(format!(
                            "malformed property line: {line:?}"
                        )));
                    }
                    let ty = ScalarType::from_name(parts[1]).ok_or_else(|| {
                        ViewerError::ParseError(format!("unsupported property type: {}", parts[1]))
                    })?;
                    Property::Scalar {
                        name: parts[2].to_string(),
                        ty,
                    }
                };
                element.properties.push(property);
            }
            "end_header" => break,
            other => {
                log::warn!("Ignoring unknown PLY header keyword: {other}");
            }
        }
    }

    let Some(format) = format else {
        return Err(ViewerError::ParseError(
            "header has no format line".to_string(),
        ));
    };

    Ok(Header {
        format,
        elements,
        body_start,
    })
}

// ============================================================================
// Body Reading
// ============================================================================

/// Pulls scalars off the body one at a time, in header declaration order.
/// ASCII bodies are tokenized on whitespace; binary bodies are walked with
/// a byte cursor.
enum BodyReader<'a> {
    Ascii(std::str::SplitAsciiWhitespace<'a>),
    Binary {
        bytes: &'a [u8],
        offset: usize,
        little_endian: bool,
    },
}

impl<'a> BodyReader<'a> {
    fn new(bytes: &'a [u8], header: &Header) -> Result<Self> {
        match header.format {
            PlyFormat::Ascii => {
                let text = std::str::from_utf8(&bytes[header.body_start..]).map_err(|e| {
                    ViewerError::ParseError(format!("ascii body is not valid UTF-8: {e}"))
                })?;
                Ok(Self::Ascii(text.split_ascii_whitespace()))
            }
            PlyFormat::BinaryLittleEndian => Ok(Self::Binary {
                bytes,
                offset: header.body_start,
                little_endian: true,
            }),
            PlyFormat::BinaryBigEndian => Ok(Self::Binary {
                bytes,
                offset: header.body_start,
                little_endian: false,
            }),
        }
    }

    fn read_scalar(&mut self, ty: ScalarType) -> Result<f64> {
        match self {
            Self::Ascii(tokens) => {
                let token = tokens.next().ok_or_else(|| {
                    ViewerError::ParseError("body ended before all declared values".to_string())
                })?;
                token
                    .parse::<f64>()
                    .map_err(|_| ViewerError::ParseError(format!("invalid number: {token:?}")))
            }
            Self::Binary {
                bytes,
                offset,
                little_endian,
            } => {
                let end = *offset + ty.size();
                let s = bytes.get(*offset..end).ok_or_else(|| {
                    ViewerError::ParseError("body ended before all declared values".to_string())
                })?;
                *offset = end;

                let le = *little_endian;
                let value = match ty {
                    ScalarType::Char => f64::from(s[0] as i8),
                    ScalarType::UChar => f64::from(s[0]),
                    ScalarType::Short => {
                        let raw = [s[0], s[1]];
                        f64::from(if le {
                            i16::from_le_bytes(raw)
                        } else {
                            i16::from_be_bytes(raw)
                        })
                    }
                    ScalarType::UShort => {
                        let raw = [s[0], s[1]];
                        f64::from(if le {
                            u16::from_le_bytes(raw)
                        } else {
                            u16::from_be_bytes(raw)
                        })
                    }
                    ScalarType::Int => {
                        let raw = [s[0], s[1], s[2], s[3]];
                        f64::from(if le {
                            i32::from_le_bytes(raw)
                        } else {
                            i32::from_be_bytes(raw)
                        })
                    }
                    ScalarType::UInt => {
                        let raw = [s[0], s[1], s[2], s[3]];
                        f64::from(if le {
                            u32::from_le_bytes(raw)
                        } else {
                            u32::from_be_bytes(raw)
                        })
                    }
                    ScalarType::Float => {
                        let raw = [s[0], s[1], s[2], s[3]];
                        f64::from(if le {
                            f32::from_le_bytes(raw)
                        } else {
                            f32::from_be_bytes(raw)
                        })
                    }
                    ScalarType::Double => {
                        let raw = [s[0], s[1], s[2], s[3], s[4], s[5], s[6], s[7]];
                        if le {
                            f64::from_le_bytes(raw)
                        } else {
                            f64::from_be_bytes(raw)
                        }
                    }
                };
                Ok(value)
            }
        }
    }

    /// Reads a list property (count followed by items) and discards it.
    fn skip_list(&mut self, count_ty: ScalarType, item_ty: ScalarType) -> Result<()> {
        let n = self.read_scalar(count_ty)? as usize;
        for _ in 0..n {
            self.read_scalar(item_ty)?;
        }
        Ok(())
    }
}

// ============================================================================
// Element Decoding
// ============================================================================

/// Where a vertex property's value lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VertexSlot {
    X,
    Y,
    Z,
    Nx,
    Ny,
    Nz,
    Red,
    Green,
    Blue,
    Skip,
}

fn vertex_slot(name: &str) -> VertexSlot {
    match name {
        "x" => VertexSlot::X,
        "y" => VertexSlot::Y,
        "z" => VertexSlot::Z,
        "nx" => VertexSlot::Nx,
        "ny" => VertexSlot::Ny,
        "nz" => VertexSlot::Nz,
        "red" => VertexSlot::Red,
        "green" => VertexSlot::Green,
        "blue" => VertexSlot::Blue,
        _ => VertexSlot::Skip,
    }
}

struct VertexData {
    positions: Vec<Vec3>,
    normals: Option<Vec<Vec3>>,
    colors: Option<Vec<Vec3>>,
}

fn decode_vertices(reader: &mut BodyReader<'_>, element: &Element) -> Result<VertexData> {
    let slots: Vec<VertexSlot> = element
        .properties
        .iter()
        .map(|p| match p {
            Property::Scalar { name, .. } => vertex_slot(name),
            Property::List { .. } => VertexSlot::Skip,
        })
        .collect();

    let has_slot = |slot| slots.contains(&slot);
    if !(has_slot(VertexSlot::X) && has_slot(VertexSlot::Y) && has_slot(VertexSlot::Z)) {
        return Err(ViewerError::ParseError(
            "vertex element is missing x/y/z properties".to_string(),
        ));
    }
    let has_normals =
        has_slot(VertexSlot::Nx) && has_slot(VertexSlot::Ny) && has_slot(VertexSlot::Nz);
    let has_colors =
        has_slot(VertexSlot::Red) && has_slot(VertexSlot::Green) && has_slot(VertexSlot::Blue);

    let reserve = element.count.min(RESERVE_LIMIT);
    let mut positions = Vec::with_capacity(reserve);
    let mut normals = has_normals.then(|| Vec::with_capacity(reserve));
    let mut colors = has_colors.then(|| Vec::with_capacity(reserve));

    for _ in 0..element.count {
        let mut position = Vec3::ZERO;
        let mut normal = Vec3::ZERO;
        let mut color = Vec3::ZERO;

        for (property, slot) in element.properties.iter().zip(&slots) {
            match property {
                Property::Scalar { ty, .. } => {
                    let value = reader.read_scalar(*ty)?;
                    match slot {
                        VertexSlot::X => position.x = value as f32,
                        VertexSlot::Y => position.y = value as f32,
                        VertexSlot::Z => position.z = value as f32,
                        VertexSlot::Nx => normal.x = value as f32,
                        VertexSlot::Ny => normal.y = value as f32,
                        VertexSlot::Nz => normal.z = value as f32,
                        VertexSlot::Red => color.x = (value * ty.color_scale()) as f32,
                        VertexSlot::Green => color.y = (value * ty.color_scale()) as f32,
                        VertexSlot::Blue => color.z = (value * ty.color_scale()) as f32,
                        VertexSlot::Skip => {}
                    }
                }
                Property::List {
                    count_ty, item_ty, ..
                } => reader.skip_list(*count_ty, *item_ty)?,
            }
        }

        positions.push(position);
        if let Some(normals) = &mut normals {
            normals.push(normal);
        }
        if let Some(colors) = &mut colors {
            colors.push(color);
        }
    }

    Ok(VertexData {
        positions,
        normals,
        colors,
    })
}

fn decode_faces(reader: &mut BodyReader<'_>, element: &Element) -> Result<Vec<u32>> {
    let mut indices = Vec::with_capacity(element.count.saturating_mul(3).min(RESERVE_LIMIT));
    let mut corners: Vec<u32> = Vec::new();

    for _ in 0..element.count {
        for property in &element.properties {
            match property {
                Property::Scalar { ty, .. } => {
                    reader.read_scalar(*ty)?;
                }
                Property::List {
                    name,
                    count_ty,
                    item_ty,
                } if name == "vertex_indices" || name == "vertex_index" => {
                    let corner_count = reader.read_scalar(*count_ty)? as usize;
                    corners.clear();
                    for _ in 0..corner_count {
                        let value = reader.read_scalar(*item_ty)?;
                        if !(0.0..=f64::from(u32::MAX)).contains(&value) {
                            return Err(ViewerError::ParseError(format!(
                                "face index out of range: {value}"
                            )));
                        }
                        corners.push(value as u32);
                    }
                    // Fan-triangulate; polygons with fewer than three
                    // corners carry no surface and are dropped.
                    for i in 1..corners.len().saturating_sub(1) {
                        indices.push(corners[0]);
                        indices.push(corners[i]);
                        indices.push(corners[i + 1]);
                    }
                }
                Property::List {
                    count_ty, item_ty, ..
                } => reader.skip_list(*count_ty, *item_ty)?,
            }
        }
    }

    Ok(indices)
}

fn skip_element(reader: &mut BodyReader<'_>, element: &Element) -> Result<()> {
    for _ in 0..element.count {
        for property in &element.properties {
            match property {
                Property::Scalar { ty, .. } => {
                    reader.read_scalar(*ty)?;
                }
                Property::List {
                    count_ty, item_ty, ..
                } => reader.skip_list(*count_ty, *item_ty)?,
            }
        }
    }
    Ok(())
}

// ============================================================================
// Entry Point
// ============================================================================

/// Decodes a PLY byte stream into a [`Geometry`].
///
/// The returned geometry carries indices only when the file declared at
/// least one face; a face-free file is a point cloud. Normals and colors
/// are present only when the vertex element declared the full attribute.
pub fn parse_ply(bytes: &[u8]) -> Result<Geometry> {
    let header = parse_header(bytes)?;
    let mut reader = BodyReader::new(bytes, &header)?;

    let mut vertex_data: Option<VertexData> = None;
    let mut face_indices: Option<Vec<u32>> = None;

    for element in &header.elements {
        match element.name.as_str() {
            "vertex" if vertex_data.is_none() => {
                vertex_data = Some(decode_vertices(&mut reader, element)?);
            }
            "face" if face_indices.is_none() => {
                face_indices = Some(decode_faces(&mut reader, element)?);
            }
            _ => skip_element(&mut reader, element)?,
        }
    }

    let Some(vertex_data) = vertex_data else {
        return Err(ViewerError::ParseError(
            "file has no vertex element".to_string(),
        ));
    };

    let mut geometry = Geometry::new(vertex_data.positions);
    geometry.normals = vertex_data.normals;
    geometry.colors = vertex_data.colors;

    // Indices are validated against the final vertex count so that header
    // element order does not matter. A face element with zero usable
    // triangles degrades to a point cloud.
    if let Some(indices) = face_indices
        && !indices.is_empty()
    {
        let vertex_count = geometry.positions.len();
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(ViewerError::ParseError(format!(
                "face references vertex {bad} but the file has only {vertex_count} vertices"
            )));
        }
        geometry.indices = Some(indices);
    }

    log::debug!(
        "Decoded PLY: {} vertices, {} triangles, normals: {}, colors: {}",
        geometry.vertex_count(),
        geometry.triangle_count(),
        geometry.normals.is_some(),
        geometry.colors.is_some(),
    );

    Ok(geometry)
}
