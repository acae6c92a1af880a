// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshframe Inc.

//! Wavefront OBJ importer
//!
//! Honors a subset of the format: `v` records (position, optionally
//! followed by a non-standard inline RGB color) and `f` records
//! (1-based vertex indices, triangle-fanned for polygons). Everything
//! else is ignored. Imported normals are never trusted; full normal
//! recalculation runs after every import.
//!
//! Malformed lines and unresolvable faces are skipped with a recorded
//! diagnostic, never aborting the rest of the file.

use crate::diagnostics::Diagnostics;
use crate::geometry::{Edge, Mesh, Triangle, Vertex};
use anyhow::{Context, Result};
use nalgebra::{Point3, Vector3};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that abort an OBJ import entirely (as opposed to the
/// per-line/per-face skips recorded in [`Diagnostics`]).
#[derive(Debug, Error)]
pub enum ObjError {
    /// The path's extension does not match the configured one.
    #[error("unsupported extension for {path}: expected .{expected}")]
    UnsupportedExtension {
        /// Offending path.
        path: String,
        /// Extension the importer was configured to accept.
        expected: String,
    },
}

/// Importer configuration, passed explicitly instead of living in
/// process-wide state.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// File extension (without dot) the importer accepts.
    pub extension: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            extension: "obj".to_string(),
        }
    }
}

/// Result of an OBJ import: the constructed mesh plus everything that
/// was skipped along the way.
#[derive(Debug)]
pub struct ObjImport {
    pub mesh: Mesh,
    pub diagnostics: Diagnostics,
}

/// Import an OBJ file from disk.
///
/// Rejects paths whose extension differs from the configured one; reads
/// the whole file and delegates to [`parse_obj`].
pub fn import_obj_file(path: impl AsRef<Path>, config: &ImportConfig) -> Result<ObjImport> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if !extension.eq_ignore_ascii_case(&config.extension) {
        return Err(ObjError::UnsupportedExtension {
            path: path.display().to_string(),
            expected: config.extension.clone(),
        }
        .into());
    }

    let source = fs::read_to_string(path)
        .context(format!("Failed to read OBJ file: {}", path.display()))?;

    Ok(parse_obj(&source))
}

/// Parse OBJ text into a mesh.
///
/// Never fails: malformed records are skipped and recorded in the
/// returned diagnostics, and an input with no valid records yields an
/// empty mesh.
pub fn parse_obj(source: &str) -> ObjImport {
    let mut diagnostics = Diagnostics::new();
    let mut positions: Vec<Point3<f32>> = Vec::new();
    let mut colors: Vec<Option<Vector3<f32>>> = Vec::new();
    let mut triangles: Vec<Triangle> = Vec::new();

    for (line_number, line) in source.lines().enumerate() {
        let line_number = line_number + 1;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => match parse_vertex_record(tokens.collect::<Vec<_>>().as_slice()) {
                Some((position, color)) => {
                    positions.push(position);
                    colors.push(color);
                }
                None => diagnostics.info(format!(
                    "skipping malformed vertex record on line {line_number}: {line:?}"
                )),
            },
            Some("f") => {
                match parse_face_record(
                    tokens.collect::<Vec<_>>().as_slice(),
                    positions.len(),
                ) {
                    Some(indices) => {
                        // Triangle-fan polygons with more than 3 corners.
                        for i in 1..indices.len() - 1 {
                            triangles.push(Triangle::new([
                                indices[0],
                                indices[i],
                                indices[i + 1],
                            ]));
                        }
                    }
                    None => diagnostics.warn(format!(
                        "skipping unresolvable face on line {line_number}: {line:?}"
                    )),
                }
            }
            _ => {} // other record types ignored
        }
    }

    let vertices: Vec<Vertex> = positions
        .iter()
        .zip(&colors)
        .map(|(position, color)| Vertex {
            position: *position,
            color: color.unwrap_or_else(|| Vector3::new(1.0, 1.0, 1.0)),
            ..Vertex::default()
        })
        .collect();

    let edges = perimeter_edges(&triangles);

    let (mut mesh, build_diags) = Mesh::from_buffers(vertices, edges, triangles);
    diagnostics.merge(build_diags);
    mesh.recalculate_normals();

    ObjImport { mesh, diagnostics }
}

/// `v x y z [r g b]`; any malformed numeric token rejects the record.
fn parse_vertex_record(tokens: &[&str]) -> Option<(Point3<f32>, Option<Vector3<f32>>)> {
    if tokens.len() < 3 {
        return None;
    }
    let mut values = Vec::with_capacity(tokens.len());
    for token in tokens {
        values.push(token.parse::<f32>().ok()?);
    }
    let position = Point3::new(values[0], values[1], values[2]);
    let color = if values.len() >= 6 {
        Some(Vector3::new(values[3], values[4], values[5]))
    } else {
        None
    };
    Some((position, color))
}

/// `f i j k [l ...]` with 1-based indices; `i/t/n` tokens resolve to the
/// vertex index. Any unresolvable or out-of-range index rejects the face.
fn parse_face_record(tokens: &[&str], vertex_count: usize) -> Option<Vec<u32>> {
    if tokens.len() < 3 {
        return None;
    }
    let mut indices = Vec::with_capacity(tokens.len());
    for token in tokens {
        let vertex_field = token.split('/').next()?;
        let one_based = vertex_field.parse::<usize>().ok()?;
        if one_based == 0 || one_based > vertex_count {
            return None;
        }
        indices.push((one_based - 1) as u32);
    }
    Some(indices)
}

/// Unique undirected edges over all triangle perimeters, in first-seen
/// order with first-seen direction.
fn perimeter_edges(triangles: &[Triangle]) -> Vec<Edge> {
    let mut seen: HashSet<(u32, u32)> = HashSet::new();
    let mut edges = Vec::new();
    for tri in triangles {
        let [a, b, c] = tri.indices;
        for (start, end) in [(a, b), (b, c), (c, a)] {
            let key = (start.min(end), start.max(end));
            if seen.insert(key) {
                edges.push(Edge::new(start, end));
            }
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_record_with_color() {
        let (p, c) = parse_vertex_record(&["1", "2", "3", "0.5", "0.25", "0.125"]).unwrap();
        assert_eq!(p, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(c, Some(Vector3::new(0.5, 0.25, 0.125)));
    }

    #[test]
    fn test_vertex_record_rejects_bad_token() {
        assert!(parse_vertex_record(&["0", "0", "abc"]).is_none());
        assert!(parse_vertex_record(&["0", "0"]).is_none());
    }

    #[test]
    fn test_face_record_slash_forms() {
        let indices = parse_face_record(&["1/1/1", "2//2", "3"], 3).unwrap();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_face_record_rejects_out_of_range() {
        assert!(parse_face_record(&["1", "2", "4"], 3).is_none());
        assert!(parse_face_record(&["0", "1", "2"], 3).is_none());
    }

    #[test]
    fn test_perimeter_edges_deduplicate_shared() {
        let tris = [Triangle::new([0, 1, 2]), Triangle::new([0, 2, 3])];
        let edges = perimeter_edges(&tris);
        // Shared diagonal (0,2) appears once: 3 + 3 - 1.
        assert_eq!(edges.len(), 5);
    }
}
