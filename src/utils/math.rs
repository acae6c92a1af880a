// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshframe Inc.

//! Math utilities

use nalgebra::{Point3, Vector3};

/// Calculate the outward normal of a triangle given three vertices.
///
/// Indices in counter-clockwise order (viewed from outside) produce the
/// outward-facing normal. Returns the zero vector for degenerate
/// (zero-area or colinear) triangles so callers can filter them out.
pub fn face_normal(p0: &Point3<f32>, p1: &Point3<f32>, p2: &Point3<f32>) -> Vector3<f32> {
    let cross = (p1 - p0).cross(&(p2 - p0));
    let len = cross.norm();
    if len > f32::EPSILON {
        cross / len
    } else {
        Vector3::zeros()
    }
}

/// Check if two floats are approximately equal
pub fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Wrap a texture coordinate into `[0, 1]`.
///
/// Values already in range (including exactly 1.0) pass through.
pub fn wrap_unit(x: f32) -> f32 {
    if (0.0..=1.0).contains(&x) {
        x
    } else {
        x.rem_euclid(1.0)
    }
}
