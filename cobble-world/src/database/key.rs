//! Packing of block positions into the single integer key every backend
//! stores blocks under.
//!
//! Each axis gets 12 bits, so the supported range is `[-2048, 2047]` per
//! axis. The key is `z * 2^24 + y * 2^12 + x` in signed arithmetic; the
//! persistent backends keep the same value as a signed 64-bit column, here it
//! is carried as the `u64` with the same bits.

use cobble_util::math::position::BlockPos;

/// Smallest coordinate the key can represent on any axis.
pub const BLOCK_KEY_MIN: i16 = -2048;
/// Largest coordinate the key can represent on any axis.
pub const BLOCK_KEY_MAX: i16 = 2047;

const AXIS_RANGE: i64 = 4096;
const AXIS_MAX_POSITIVE: i64 = 2048;

/// Whether `pos` survives [`block_as_key`] / [`key_as_block`] unchanged.
pub fn is_valid_key_pos(pos: BlockPos) -> bool {
    let range = BLOCK_KEY_MIN..=BLOCK_KEY_MAX;
    range.contains(&pos.0.x) && range.contains(&pos.0.y) && range.contains(&pos.0.z)
}

#[inline]
pub const fn block_as_key(pos: BlockPos) -> u64 {
    let key =
        pos.0.z as i64 * AXIS_RANGE * AXIS_RANGE + pos.0.y as i64 * AXIS_RANGE + pos.0.x as i64;
    key as u64
}

/// Inverse of [`block_as_key`]. Only meaningful for keys it produced.
pub fn key_as_block(key: u64) -> BlockPos {
    let mut key = key as i64;
    let x = unsigned_to_signed(key.rem_euclid(AXIS_RANGE));
    key = (key - x) / AXIS_RANGE;
    let y = unsigned_to_signed(key.rem_euclid(AXIS_RANGE));
    key = (key - y) / AXIS_RANGE;
    let z = unsigned_to_signed(key.rem_euclid(AXIS_RANGE));
    BlockPos::new(x as i16, y as i16, z as i16)
}

#[inline]
const fn unsigned_to_signed(value: i64) -> i64 {
    if value < AXIS_MAX_POSITIVE {
        value
    } else {
        value - AXIS_RANGE
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use cobble_util::math::position::BlockPos;

    use super::{BLOCK_KEY_MAX, BLOCK_KEY_MIN, block_as_key, is_valid_key_pos, key_as_block};

    #[test]
    fn known_keys() {
        assert_eq!(block_as_key(BlockPos::new(0, 0, 0)), 0);
        assert_eq!(block_as_key(BlockPos::new(1, 0, 0)), 1);
        assert_eq!(block_as_key(BlockPos::new(0, 1, 0)), 0x1000);
        assert_eq!(block_as_key(BlockPos::new(0, 0, 1)), 0x100_0000);
        assert_eq!(block_as_key(BlockPos::new(-1, 0, 0)), u64::MAX);
        assert_eq!(
            block_as_key(BlockPos::new(1, 2, 3)) as i64,
            3 * 0x100_0000 + 2 * 0x1000 + 1
        );
        assert_eq!(
            block_as_key(BlockPos::new(-5, 10, -5)) as i64,
            -5 * 0x100_0000 + 10 * 0x1000 - 5
        );
    }

    #[test]
    fn axis_sweep_round_trips() {
        for v in BLOCK_KEY_MIN..=BLOCK_KEY_MAX {
            for pos in [
                BlockPos::new(v, 0, 0),
                BlockPos::new(0, v, 0),
                BlockPos::new(0, 0, v),
                BlockPos::new(v, -v.saturating_add(1), v / 2),
            ] {
                assert_eq!(key_as_block(block_as_key(pos)), pos, "{pos}");
            }
        }
    }

    #[test]
    fn corners_round_trip() {
        let edges = [
            BLOCK_KEY_MIN,
            BLOCK_KEY_MIN + 1,
            -1,
            0,
            1,
            BLOCK_KEY_MAX - 1,
            BLOCK_KEY_MAX,
        ];
        for x in edges {
            for y in edges {
                for z in edges {
                    let pos = BlockPos::new(x, y, z);
                    assert!(is_valid_key_pos(pos));
                    assert_eq!(key_as_block(block_as_key(pos)), pos, "{pos}");
                }
            }
        }
    }

    #[test]
    fn keys_are_unique() {
        let mut seen = HashSet::new();
        for x in -20..20 {
            for y in -20..20 {
                for z in -20..20 {
                    assert!(seen.insert(block_as_key(BlockPos::new(x, y, z))));
                }
            }
        }

        // Neighbours across the axis boundaries must not collide either
        let boundary = [
            BlockPos::new(BLOCK_KEY_MAX, 0, 0),
            BlockPos::new(BLOCK_KEY_MIN, 1, 0),
            BlockPos::new(BLOCK_KEY_MIN, 0, 0),
            BlockPos::new(BLOCK_KEY_MAX, -1, 0),
            BlockPos::new(0, BLOCK_KEY_MAX, 0),
            BlockPos::new(0, BLOCK_KEY_MIN, 1),
        ];
        let keys = boundary.map(block_as_key).into_iter().collect::<HashSet<_>>();
        assert_eq!(keys.len(), boundary.len());
    }

    #[test]
    fn out_of_range_positions() {
        assert!(!is_valid_key_pos(BlockPos::new(2048, 0, 0)));
        assert!(!is_valid_key_pos(BlockPos::new(0, -2049, 0)));
        assert!(!is_valid_key_pos(BlockPos::new(0, 0, i16::MAX)));
    }
}
