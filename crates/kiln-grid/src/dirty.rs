//! Chunk-granularity change tracking for incremental redraw.

use indexmap::IndexSet;
use kiln_core::ChunkKey;

/// Set of chunks touched since the last [`clear`](DirtyChunks::clear).
///
/// Iteration order is insertion order, so two identical runs report
/// chunks identically.
#[derive(Clone, Debug)]
pub struct DirtyChunks {
    chunk_size: u32,
    keys: IndexSet<ChunkKey>,
}

impl DirtyChunks {
    /// Tracker with square chunks of `chunk_size` cells (minimum 1).
    pub fn new(chunk_size: u32) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            keys: IndexSet::new(),
        }
    }

    /// Side length of a chunk in cells.
    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Mark the chunk containing cell `(x, y)`.
    #[inline]
    pub fn mark(&mut self, x: u32, y: u32) {
        self.keys
            .insert(ChunkKey::new(x / self.chunk_size, y / self.chunk_size));
    }

    /// Mark the chunk containing flat index `i` of a `width`-wide grid.
    #[inline]
    pub fn mark_index(&mut self, i: usize, width: u32) {
        let w = width as usize;
        self.mark((i % w) as u32, (i / w) as u32);
    }

    /// Mark every chunk of a `width x height` grid.
    pub fn mark_all(&mut self, width: u32, height: u32) {
        let cols = width.div_ceil(self.chunk_size);
        let rows = height.div_ceil(self.chunk_size);
        for cy in 0..rows {
            for cx in 0..cols {
                self.keys.insert(ChunkKey::new(cx, cy));
            }
        }
    }

    /// Forget all marks.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Whether `key` is marked.
    pub fn contains(&self, key: ChunkKey) -> bool {
        self.keys.contains(&key)
    }

    /// Number of marked chunks.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether nothing is marked.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Marked chunks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = ChunkKey> + '_ {
        self.keys.iter().copied()
    }
}
