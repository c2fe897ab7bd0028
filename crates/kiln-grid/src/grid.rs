//! The double-buffered grid.
//!
//! Per step:
//! 1. [`Grid::begin_step`] seeds the back buffer from the front and lends
//!    out `(&front, &mut back)` as [`StepBuffers`].
//! 2. Passes read the front and write the back.
//! 3. [`Grid::swap`] flips which buffer is the front. No data is copied.
//!
//! If a step fails, skipping `swap()` leaves the front untouched.

use kiln_core::MaterialId;

use crate::buffer::CellBuffer;
use crate::error::GridError;

/// Borrowed buffers for one step: the committed front and the in-progress
/// back.
#[must_use]
pub struct StepBuffers<'a> {
    /// Last committed state. Read-only for the whole step.
    pub read: &'a CellBuffer,
    /// Next state, seeded from `read`.
    pub write: &'a mut CellBuffer,
}

/// Two same-shaped cell buffers with an O(1) front/back flip.
#[derive(Clone, Debug)]
pub struct Grid {
    width: u32,
    height: u32,
    buffer_a: CellBuffer,
    buffer_b: CellBuffer,
    front_is_a: bool,
}

impl Grid {
    /// Allocate two zero-filled buffers.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroDimension { width, height });
        }
        let cells = cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            buffer_a: CellBuffer::new(cells),
            buffer_b: CellBuffer::new(cells),
            front_is_a: true,
        })
    }

    /// Columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `width * height`.
    pub fn len(&self) -> usize {
        self.buffer_a.len()
    }

    /// Always false; grids have at least one cell.
    pub fn is_empty(&self) -> bool {
        self.buffer_a.is_empty()
    }

    /// Flat index of `(x, y)`, or `None` when out of bounds.
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Whether the front buffer is currently buffer A.
    pub fn front_is_a(&self) -> bool {
        self.front_is_a
    }

    /// The committed buffer.
    pub fn front(&self) -> &CellBuffer {
        if self.front_is_a {
            &self.buffer_a
        } else {
            &self.buffer_b
        }
    }

    /// The committed buffer, for edits between steps.
    pub fn front_mut(&mut self) -> &mut CellBuffer {
        if self.front_is_a {
            &mut self.buffer_a
        } else {
            &mut self.buffer_b
        }
    }

    /// The in-progress buffer.
    pub fn back(&self) -> &CellBuffer {
        if self.front_is_a {
            &self.buffer_b
        } else {
            &self.buffer_a
        }
    }

    /// Seed back from front (clearing flags) and borrow both for a step.
    pub fn begin_step(&mut self) -> StepBuffers<'_> {
        let (read, write) = if self.front_is_a {
            (&self.buffer_a, &mut self.buffer_b)
        } else {
            (&self.buffer_b, &mut self.buffer_a)
        };
        write.seed_from(read);
        StepBuffers { read, write }
    }

    /// Publish the back buffer as the new front.
    pub fn swap(&mut self) {
        self.front_is_a = !self.front_is_a;
    }

    /// Reset both buffers to empty material at `temp`.
    pub fn reset(&mut self, temp: f32) {
        self.buffer_a.fill_empty(temp);
        self.buffer_b.fill_empty(temp);
    }

    /// Replace both buffers with `(material, temperature)` tiles in row-major
    /// order. Every other field is reset to zero.
    ///
    /// Nothing is modified if the tile count is wrong.
    pub fn load(&mut self, tiles: &[(MaterialId, f32)]) -> Result<(), GridError> {
        if tiles.len() != self.len() {
            return Err(GridError::SizeMismatch {
                expected: self.len(),
                got: tiles.len(),
            });
        }
        for buf in [&mut self.buffer_a, &mut self.buffer_b] {
            buf.fill_empty(0.0);
            for (i, &(mat, temp)) in tiles.iter().enumerate() {
                buf.mat[i] = mat;
                buf.temp[i] = temp;
            }
        }
        Ok(())
    }

    /// Grow to `new_width` columns, keeping existing columns row by row.
    ///
    /// New columns are zero-filled. Returns `false` and does nothing when
    /// `new_width <= width` or the new size would overflow.
    pub fn expand_width(&mut self, new_width: u32) -> bool {
        if new_width <= self.width || cell_count(new_width, self.height).is_err() {
            return false;
        }
        let (w, h, nw) = (
            self.width as usize,
            self.height as usize,
            new_width as usize,
        );
        let a = self.buffer_a.widened(w, h, nw);
        let b = self.buffer_b.widened(w, h, nw);
        self.buffer_a = a;
        self.buffer_b = b;
        self.width = new_width;
        true
    }
}

fn cell_count(width: u32, height: u32) -> Result<usize, GridError> {
    width
        .checked_mul(height)
        .map(|n| n as usize)
        .ok_or(GridError::CellCountOverflow { width, height })
}
