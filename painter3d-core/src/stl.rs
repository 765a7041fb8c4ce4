/// STL import (binary and ASCII) into an indexed, single-color model
use log::debug;
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};

use crate::error::StlError;
use crate::geometry::{Color, Model, Triangle, Vertex};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Facet corners in file order; normals are read past but not kept
type Facet = [Vertex; 3];

fn to_model(facets: Vec<Facet>, color: &Color) -> Model {
    let mut model = Model::default();
    model.vertices.reserve(facets.len() * 3);
    model.triangles.reserve(facets.len());

    for facet in facets {
        let base = model.vertices.len();
        model.vertices.extend(facet);
        model
            .triangles
            .push(Triangle::new(base, base + 1, base + 2, color.clone()));
    }
    model
}

fn read_f32(bytes: &[u8]) -> f32 {
    f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8], color: &Color) -> Result<Model, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooSmall(data.len()));
    }

    // Skip 80-byte header
    let data = &data[HEADER_LEN..];
    let triangle_count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
    let body = &data[4..];

    let expected = triangle_count * FACET_LEN;
    if body.len() < expected {
        return Err(StlError::Truncated {
            expected: HEADER_LEN + 4 + expected,
            actual: HEADER_LEN + 4 + body.len(),
        });
    }

    let facets = body
        .chunks_exact(FACET_LEN)
        .take(triangle_count)
        .map(|chunk| {
            // 12 bytes of normal, then three corners, then 2 attribute bytes
            let corner = |n: usize| {
                let at = 12 + n * 12;
                Vertex::new(
                    read_f32(&chunk[at..]) as f64,
                    read_f32(&chunk[at + 4..]) as f64,
                    read_f32(&chunk[at + 8..]) as f64,
                )
            };
            [corner(0), corner(1), corner(2)]
        })
        .collect();

    Ok(to_model(facets, color))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str, color: &Color) -> Result<Model, StlError> {
    match parse_ascii_stl_impl(input) {
        Ok((_, facets)) => Ok(to_model(facets, color)),
        Err(e) => Err(StlError::Ascii(format!("{:?}", e))),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Vec<Facet>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?; // Optional name
    let (input, facets) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _) = not_line_ending(input)?;

    Ok((input, facets))
}

fn parse_facet(input: &str) -> IResult<&str, Facet> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input)?;
    let (input, v2) = parse_vertex(input)?;
    let (input, v3) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, [v1, v2, v3]))
}

fn parse_vertex(input: &str) -> IResult<&str, Vertex> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    let (input, (x, y, z)) = parse_vector3(input)?;
    Ok((input, Vertex::new(x as f64, y as f64, z as f64)))
}

fn parse_vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, (x, y, z)))
}

/// Detect and parse an STL file (binary or ASCII), coloring every triangle
/// with `color`
pub fn parse_stl(data: &[u8], color: &Color) -> Result<Model, StlError> {
    // Binary files may also start with "solid", so fall back on failure
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(model) = parse_ascii_stl(text, color) {
                debug!("parsed ASCII STL: {} triangles", model.triangles.len());
                return Ok(model);
            }
        }
    }

    let model = parse_binary_stl(data, color)?;
    debug!("parsed binary STL: {} triangles", model.triangles.len());
    Ok(model)
}
