//! Shared grid-topology and cell-ownership helpers.
//!
//! Every pass walks only the interior of the grid; the 1-cell border is
//! never updated and never used as a move destination, so it behaves as
//! a wall.

use kiln_core::{FuelOrigin, MaterialId};
use kiln_grid::{CellBuffer, DirtyChunks};
use kiln_pass::StepInfo;
use smallvec::SmallVec;

/// Grid dimensions plus interior tests.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Area {
    pub w: usize,
    pub h: usize,
}

impl Area {
    pub fn of(info: StepInfo) -> Self {
        Self {
            w: info.width as usize,
            h: info.height as usize,
        }
    }

    /// Whether there is any interior to update.
    pub fn has_interior(&self) -> bool {
        self.w >= 3 && self.h >= 3
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    #[inline]
    pub fn interior(&self, i: usize) -> bool {
        let (x, y) = (i % self.w, i / self.w);
        x >= 1 && y >= 1 && x + 1 < self.w && y + 1 < self.h
    }

    /// Up, down, left, right of an interior cell. Always in bounds.
    #[inline]
    pub fn neighbours(&self, i: usize) -> [usize; 4] {
        [i - self.w, i + self.w, i - 1, i + 1]
    }

    /// Interior neighbours only.
    pub fn interior_neighbours(&self, i: usize) -> SmallVec<[usize; 4]> {
        self.neighbours(i)
            .into_iter()
            .filter(|&j| self.interior(j))
            .collect()
    }

    /// Interior rows, top to bottom.
    pub fn rows_down(&self) -> std::ops::Range<usize> {
        1..self.h - 1
    }

    /// Interior rows, bottom to top.
    pub fn rows_up(&self) -> std::iter::Rev<std::ops::Range<usize>> {
        (1..self.h - 1).rev()
    }

    /// Interior columns in the given direction.
    pub fn columns(&self, left_to_right: bool) -> Columns {
        Columns {
            next: if left_to_right { 1 } else { self.w - 2 },
            remaining: self.w - 2,
            forward: left_to_right,
        }
    }
}

/// Interior column iterator running either way.
pub(crate) struct Columns {
    next: usize,
    remaining: usize,
    forward: bool,
}

impl Iterator for Columns {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let x = self.next;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.next = if self.forward { x + 1 } else { x - 1 };
        }
        Some(x)
    }
}

/// Whether `i` is still exactly as committed: unclaimed and holding its
/// front-buffer material.
#[inline]
pub(crate) fn can_write(read: &CellBuffer, write: &CellBuffer, i: usize) -> bool {
    !write.is_claimed(i) && write.mat[i] == read.mat[i]
}

/// Swap two cells in the write buffer and mark both dirty.
#[inline]
pub(crate) fn swap(
    write: &mut CellBuffer,
    dirty: &mut DirtyChunks,
    area: Area,
    a: usize,
    b: usize,
) {
    write.swap_cells(a, b);
    dirty.mark_index(a, area.w as u32);
    dirty.mark_index(b, area.w as u32);
}

/// Change the material at `i`, resetting its scratch fields, and mark it
/// dirty.
#[inline]
pub(crate) fn transmute(
    write: &mut CellBuffer,
    dirty: &mut DirtyChunks,
    area: Area,
    i: usize,
    to: MaterialId,
) {
    write.transmute(i, to);
    dirty.mark_index(i, area.w as u32);
}

/// Turn `i` into fire tagged with `origin`.
pub(crate) fn ignite(
    write: &mut CellBuffer,
    dirty: &mut DirtyChunks,
    area: Area,
    i: usize,
    fire: MaterialId,
    origin: FuelOrigin,
) {
    transmute(write, dirty, area, i, fire);
    write.vel_x[i] = origin.code();
}

/// Saturate an `i32` into the `i16` storage range.
#[inline]
pub(crate) fn clamp16(v: i32) -> i16 {
    v.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

/// Move one unit toward zero.
#[inline]
pub(crate) fn step_toward_zero(v: i32) -> i32 {
    v - v.signum()
}
