//! Snapshot hashing for determinism checks.
//!
//! FNV-1a over raw little-endian field bytes. Fast and deterministic, not
//! cryptographically secure: two engines fed the same seed and edits must
//! produce equal hashes after every step.

use kiln_core::CellField;
use kiln_grid::CellBuffer;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash = (hash ^ b as u64).wrapping_mul(FNV_PRIME);
    }
    hash
}

#[inline]
fn fnv1a_u32(hash: u64, v: u32) -> u64 {
    fnv1a_bytes(hash, &v.to_le_bytes())
}

#[inline]
fn fnv1a_u64(hash: u64, v: u64) -> u64 {
    fnv1a_bytes(hash, &v.to_le_bytes())
}

/// Fold one field's array into `hash`.
fn hash_field(mut hash: u64, buf: &CellBuffer, field: CellField) -> u64 {
    match field {
        CellField::Mat => {
            for m in &buf.mat {
                hash = fnv1a_bytes(hash, &m.0.to_le_bytes());
            }
        }
        CellField::Temp => {
            for t in &buf.temp {
                hash = fnv1a_u32(hash, t.to_bits());
            }
        }
        CellField::VelX => {
            for v in &buf.vel_x {
                hash = fnv1a_bytes(hash, &v.to_le_bytes());
            }
        }
        CellField::VelY => {
            for v in &buf.vel_y {
                hash = fnv1a_bytes(hash, &v.to_le_bytes());
            }
        }
        CellField::Flags => hash = fnv1a_bytes(hash, &buf.flags),
        CellField::Pressure => {
            for p in &buf.pressure {
                hash = fnv1a_bytes(hash, &p.to_le_bytes());
            }
        }
        CellField::Impulse => {
            for p in &buf.impulse {
                hash = fnv1a_bytes(hash, &p.to_le_bytes());
            }
        }
        CellField::Aux => {
            for a in &buf.aux {
                hash = fnv1a_bytes(hash, &a.to_le_bytes());
            }
        }
        CellField::Humidity => hash = fnv1a_bytes(hash, &buf.humidity),
        CellField::Phase => {
            for p in &buf.phase {
                hash = fnv1a_u32(hash, p.to_bits());
            }
        }
    }
    hash
}

/// Hash every field of `buf` in [`CellField::ALL`] order.
///
/// The field index is folded in at each boundary so that moving data
/// between fields changes the hash.
pub fn snapshot_hash(buf: &CellBuffer) -> u64 {
    let mut hash = fnv1a_u64(FNV_OFFSET, buf.len() as u64);
    for (idx, &field) in CellField::ALL.iter().enumerate() {
        hash = fnv1a_u32(hash, idx as u32);
        hash = hash_field(hash, buf, field);
    }
    hash
}

/// Hash the material array alone.
pub fn material_hash(buf: &CellBuffer) -> u64 {
    hash_field(FNV_OFFSET, buf, CellField::Mat)
}

/// Hash the scalars that must agree before two runs can be compared.
pub fn config_hash(width: u32, height: u32, seed: u64, dt: f64) -> u64 {
    let mut hash = FNV_OFFSET;
    hash = fnv1a_u32(hash, width);
    hash = fnv1a_u32(hash, height);
    hash = fnv1a_u64(hash, seed);
    fnv1a_u64(hash, dt.to_bits())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::MaterialId;

    #[test]
    fn empty_material_array_hashes_to_offset() {
        assert_eq!(material_hash(&CellBuffer::new(0)), FNV_OFFSET);
    }

    #[test]
    fn known_fnv1a_vector() {
        // FNV-1a 64 of "a".
        assert_eq!(fnv1a_bytes(FNV_OFFSET, b"a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn every_field_contributes() {
        let base = CellBuffer::new(4);
        let h0 = snapshot_hash(&base);

        let mut b = base.clone();
        b.mat[2] = MaterialId(5);
        assert_ne!(snapshot_hash(&b), h0);
        assert_ne!(material_hash(&b), material_hash(&base));

        let mut b = base.clone();
        b.phase[0] = 1.0;
        assert_ne!(snapshot_hash(&b), h0);
        assert_eq!(material_hash(&b), material_hash(&base));

        let mut b = base.clone();
        b.humidity[3] = 1;
        assert_ne!(snapshot_hash(&b), h0);
    }

    #[test]
    fn same_bytes_in_different_fields_differ() {
        let mut a = CellBuffer::new(2);
        a.aux[0] = 1;
        let mut b = CellBuffer::new(2);
        b.pressure[0] = 1;
        assert_ne!(snapshot_hash(&a), snapshot_hash(&b));
    }

    #[test]
    fn config_hash_sensitive_to_each_input() {
        let h = config_hash(64, 64, 42, 1.0 / 60.0);
        assert_eq!(h, config_hash(64, 64, 42, 1.0 / 60.0));
        assert_ne!(h, config_hash(64, 64, 43, 1.0 / 60.0));
        assert_ne!(h, config_hash(65, 64, 42, 1.0 / 60.0));
        assert_ne!(h, config_hash(64, 64, 42, 1.0 / 30.0));
    }
}
