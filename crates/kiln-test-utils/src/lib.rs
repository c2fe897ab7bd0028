//! Test utilities for Kiln development.
//!
//! [`TileMap`] builds row-major `(material, temperature)` tiles for
//! `Engine::load_tiles`, and the helpers below count and locate materials
//! in a committed buffer. Fixture passes live in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use kiln_core::{MaterialId, AMBIENT_TEMPERATURE_C};
use kiln_grid::CellBuffer;

/// Builder for whole-grid tile layouts.
///
/// Starts as empty space at ambient temperature. Later calls overwrite
/// earlier ones; coordinates outside the map are ignored.
#[derive(Clone, Debug)]
pub struct TileMap {
    width: u32,
    height: u32,
    tiles: Vec<(MaterialId, f32)>,
}

impl TileMap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![(MaterialId::EMPTY, AMBIENT_TEMPERATURE_C); (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Set one cell.
    pub fn set(&mut self, x: u32, y: u32, mat: MaterialId, temp: f32) -> &mut Self {
        if x < self.width && y < self.height {
            self.tiles[(y * self.width + x) as usize] = (mat, temp);
        }
        self
    }

    /// Fill the inclusive rectangle `(x0, y0)..=(x1, y1)`.
    pub fn rect(
        &mut self,
        (x0, y0): (u32, u32),
        (x1, y1): (u32, u32),
        mat: MaterialId,
        temp: f32,
    ) -> &mut Self {
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.set(x, y, mat, temp);
            }
        }
        self
    }

    /// Set the 1-cell border ring.
    pub fn border(&mut self, mat: MaterialId) -> &mut Self {
        let (w, h) = (self.width, self.height);
        for x in 0..w {
            self.set(x, 0, mat, AMBIENT_TEMPERATURE_C);
            self.set(x, h - 1, mat, AMBIENT_TEMPERATURE_C);
        }
        for y in 0..h {
            self.set(0, y, mat, AMBIENT_TEMPERATURE_C);
            self.set(w - 1, y, mat, AMBIENT_TEMPERATURE_C);
        }
        self
    }

    /// An open-topped box of `wall` with inner floor at row `floor_y`,
    /// inner columns `x0..=x1`, and walls rising to row `top_y`.
    pub fn tank(
        &mut self,
        (x0, x1): (u32, u32),
        top_y: u32,
        floor_y: u32,
        wall: MaterialId,
    ) -> &mut Self {
        let t = AMBIENT_TEMPERATURE_C;
        self.rect((x0 - 1, floor_y + 1), (x1 + 1, floor_y + 1), wall, t);
        self.rect((x0 - 1, top_y), (x0 - 1, floor_y), wall, t);
        self.rect((x1 + 1, top_y), (x1 + 1, floor_y), wall, t);
        self
    }

    /// The finished tiles, row-major.
    pub fn tiles(&self) -> &[(MaterialId, f32)] {
        &self.tiles
    }
}

/// Number of cells holding `mat`.
pub fn count(buf: &CellBuffer, mat: MaterialId) -> usize {
    buf.mat.iter().filter(|&&m| m == mat).count()
}

/// `(x, y)` of every cell holding `mat`, row-major.
pub fn cells_of(buf: &CellBuffer, width: u32, mat: MaterialId) -> Vec<(u32, u32)> {
    buf.mat
        .iter()
        .enumerate()
        .filter(|&(_, &m)| m == mat)
        .map(|(i, _)| (i as u32 % width, i as u32 / width))
        .collect()
}

/// Mean temperature of the cells holding `mat`, or `None` if there are none.
pub fn mean_temp(buf: &CellBuffer, mat: MaterialId) -> Option<f32> {
    let (sum, n) = buf
        .mat
        .iter()
        .zip(&buf.temp)
        .filter(|&(&m, _)| m == mat)
        .fold((0.0f64, 0usize), |(s, n), (_, &t)| (s + t as f64, n + 1));
    (n > 0).then(|| (sum / n as f64) as f32)
}
