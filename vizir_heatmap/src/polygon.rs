// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The polygon annotation: an ordered list of vertices in bin space.

extern crate alloc;

use alloc::vec::Vec;

use crate::grid::Bin;

/// An editable, ordered list of polygon vertices.
///
/// Edits that would have no effect (out-of-range indices, moving the first vertex
/// up or the last one down) return `false` and leave the polygon unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Polygon {
    vertices: Vec<Bin>,
}

impl Polygon {
    /// An empty polygon.
    pub fn new() -> Self {
        Self::default()
    }

    /// The vertices, in drawing order.
    pub fn vertices(&self) -> &[Bin] {
        &self.vertices
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the polygon has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Whether there are enough vertices to draw an outline.
    pub fn is_drawable(&self) -> bool {
        self.vertices.len() >= 2
    }

    /// Appends a vertex.
    pub fn push(&mut self, bin: Bin) {
        self.vertices.push(bin);
    }

    /// Removes the vertex at `index`.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.vertices.len() {
            return false;
        }
        self.vertices.remove(index);
        true
    }

    /// Swaps the vertex at `index` with its predecessor.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.vertices.len() {
            return false;
        }
        self.vertices.swap(index - 1, index);
        true
    }

    /// Swaps the vertex at `index` with its successor.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index >= self.vertices.len().saturating_sub(1) {
            return false;
        }
        self.vertices.swap(index, index + 1);
        true
    }

    /// Replaces the vertex at `index`.
    pub fn set(&mut self, index: usize, bin: Bin) -> bool {
        match self.vertices.get_mut(index) {
            Some(v) => {
                *v = bin;
                true
            }
            None => false,
        }
    }

    /// Removes every vertex. Returns `false` if the polygon was already empty.
    pub fn clear(&mut self) -> bool {
        let had_vertices = !self.vertices.is_empty();
        self.vertices.clear();
        had_vertices
    }

    /// The vertices as `[x, y]` pairs, the shape handed to polygon callbacks.
    pub fn to_pairs(&self) -> Vec<[i64; 2]> {
        self.vertices.iter().map(|b| [b.x, b.y]).collect()
    }
}
