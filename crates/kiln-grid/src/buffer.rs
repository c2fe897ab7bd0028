//! Structure-of-arrays storage for one generation of cells.

use kiln_core::MaterialId;

/// `flags` bit set on both ends of a move or swap within the current step.
pub const FLAG_CLAIMED: u8 = 1;

/// One full generation of per-cell fields, indexed by `y * width + x`.
///
/// All arrays always have the same length. Fields are public so passes
/// can borrow several of them disjointly inside tight loops.
#[derive(Clone, Debug, PartialEq)]
pub struct CellBuffer {
    /// Material ids.
    pub mat: Vec<MaterialId>,
    /// Temperatures in °C.
    pub temp: Vec<f32>,
    /// Horizontal velocity hints; fire cells store their fuel origin here.
    pub vel_x: Vec<i8>,
    /// Vertical velocity hints.
    pub vel_y: Vec<i8>,
    /// Per-step scratch flags, cleared whenever the back buffer is seeded.
    pub flags: Vec<u8>,
    /// Static pressure.
    pub pressure: Vec<i16>,
    /// Transient impulse.
    pub impulse: Vec<i16>,
    /// Material-dependent counter.
    pub aux: Vec<u16>,
    /// Wetness.
    pub humidity: Vec<u8>,
    /// Latent-heat accumulator.
    pub phase: Vec<f32>,
}

impl CellBuffer {
    /// A zero-filled buffer: empty material at 0 °C.
    pub fn new(cells: usize) -> Self {
        Self {
            mat: vec![MaterialId::EMPTY; cells],
            temp: vec![0.0; cells],
            vel_x: vec![0; cells],
            vel_y: vec![0; cells],
            flags: vec![0; cells],
            pressure: vec![0; cells],
            impulse: vec![0; cells],
            aux: vec![0; cells],
            humidity: vec![0; cells],
            phase: vec![0.0; cells],
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.mat.len()
    }

    /// Whether the buffer holds no cells.
    pub fn is_empty(&self) -> bool {
        self.mat.is_empty()
    }

    /// Overwrite every field with `src`, except `flags`, which are cleared.
    pub fn seed_from(&mut self, src: &CellBuffer) {
        self.mat.copy_from_slice(&src.mat);
        self.temp.copy_from_slice(&src.temp);
        self.vel_x.copy_from_slice(&src.vel_x);
        self.vel_y.copy_from_slice(&src.vel_y);
        self.flags.fill(0);
        self.pressure.copy_from_slice(&src.pressure);
        self.impulse.copy_from_slice(&src.impulse);
        self.aux.copy_from_slice(&src.aux);
        self.humidity.copy_from_slice(&src.humidity);
        self.phase.copy_from_slice(&src.phase);
    }

    /// Reset every cell to empty material at `temp`, all other fields zero.
    pub fn fill_empty(&mut self, temp: f32) {
        self.mat.fill(MaterialId::EMPTY);
        self.temp.fill(temp);
        self.vel_x.fill(0);
        self.vel_y.fill(0);
        self.flags.fill(0);
        self.pressure.fill(0);
        self.impulse.fill(0);
        self.aux.fill(0);
        self.humidity.fill(0);
        self.phase.fill(0.0);
    }

    /// Exchange the material payload of two cells and claim both.
    ///
    /// Material, temperature, velocity hints, aux, humidity and phase travel
    /// with the material. Pressure and impulse belong to the location and
    /// stay put.
    pub fn swap_cells(&mut self, a: usize, b: usize) {
        self.mat.swap(a, b);
        self.temp.swap(a, b);
        self.vel_x.swap(a, b);
        self.vel_y.swap(a, b);
        self.aux.swap(a, b);
        self.humidity.swap(a, b);
        self.phase.swap(a, b);
        self.flags[a] |= FLAG_CLAIMED;
        self.flags[b] |= FLAG_CLAIMED;
    }

    /// Replace the material at `i`, clearing its material-specific scratch
    /// (`aux`, `phase`, velocity hints) and claiming the cell.
    pub fn transmute(&mut self, i: usize, to: MaterialId) {
        self.mat[i] = to;
        self.aux[i] = 0;
        self.phase[i] = 0.0;
        self.vel_x[i] = 0;
        self.vel_y[i] = 0;
        self.flags[i] |= FLAG_CLAIMED;
    }

    /// Whether the cell was claimed earlier in this step.
    #[inline]
    pub fn is_claimed(&self, i: usize) -> bool {
        self.flags[i] & FLAG_CLAIMED != 0
    }

    /// Copy of this buffer re-laid out at `new_width` columns.
    ///
    /// Existing columns keep their values row by row; new columns are
    /// zero-filled.
    pub(crate) fn widened(&self, width: usize, height: usize, new_width: usize) -> Self {
        let mut out = CellBuffer::new(new_width * height);
        for y in 0..height {
            let src = y * width..(y + 1) * width;
            let dst = y * new_width..y * new_width + width;
            out.mat[dst.clone()].copy_from_slice(&self.mat[src.clone()]);
            out.temp[dst.clone()].copy_from_slice(&self.temp[src.clone()]);
            out.vel_x[dst.clone()].copy_from_slice(&self.vel_x[src.clone()]);
            out.vel_y[dst.clone()].copy_from_slice(&self.vel_y[src.clone()]);
            out.flags[dst.clone()].copy_from_slice(&self.flags[src.clone()]);
            out.pressure[dst.clone()].copy_from_slice(&self.pressure[src.clone()]);
            out.impulse[dst.clone()].copy_from_slice(&self.impulse[src.clone()]);
            out.aux[dst.clone()].copy_from_slice(&self.aux[src.clone()]);
            out.humidity[dst.clone()].copy_from_slice(&self.humidity[src.clone()]);
            out.phase[dst].copy_from_slice(&self.phase[src]);
        }
        out
    }
}
