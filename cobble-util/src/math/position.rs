use std::fmt;

use num_traits::Euclid;

use super::{vector2::Vector2, vector3::Vector3};

/// Position of a block on the world grid, in block units (not nodes).
///
/// `x` and `z` pick the sector (the vertical column), `y` is the index of
/// the block inside that column.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct BlockPos(pub Vector3<i16>);

impl BlockPos {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// The horizontal coordinate of the sector owning this block.
    pub const fn sector_pos(&self) -> Vector2<i16> {
        Vector2::new(self.0.x, self.0.z)
    }

    pub const fn y(&self) -> i16 {
        self.0.y
    }

    pub const fn from_sector(sector: Vector2<i16>, y: i16) -> Self {
        Self::new(sector.x, y, sector.z)
    }

    /// Splits a node coordinate into the block containing it and the node's
    /// offset inside that block.
    pub fn block_and_relative_position(
        node: Vector3<i16>,
        block_size: i16,
    ) -> (BlockPos, Vector3<i16>) {
        let (x_block, x_rem) = node.x.div_rem_euclid(&block_size);
        let (y_block, y_rem) = node.y.div_rem_euclid(&block_size);
        let (z_block, z_rem) = node.z.div_rem_euclid(&block_size);

        (
            BlockPos::new(x_block, y_block, z_block),
            Vector3::new(x_rem, y_rem, z_rem),
        )
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.0.x, self.0.y, self.0.z)
    }
}
