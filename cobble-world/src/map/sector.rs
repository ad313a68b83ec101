use std::collections::BTreeSet;

use cobble_util::math::vector2::Vector2;

/// A vertical column of blocks sharing the same horizontal position.
///
/// The sector doesn't own its blocks, it only indexes which `y` levels are
/// present; the blocks themselves live in the [`Map`](super::Map).
#[derive(Debug, Clone)]
pub struct MapSector {
    pos: Vector2<i16>,
    block_ys: BTreeSet<i16>,
}

impl MapSector {
    pub(crate) fn new(pos: Vector2<i16>) -> Self {
        Self {
            pos,
            block_ys: BTreeSet::new(),
        }
    }

    pub fn pos(&self) -> Vector2<i16> {
        self.pos
    }

    pub fn contains(&self, y: i16) -> bool {
        self.block_ys.contains(&y)
    }

    /// Vertical indices of the blocks in this column, bottom to top.
    pub fn block_ys(&self) -> impl Iterator<Item = i16> + '_ {
        self.block_ys.iter().copied()
    }

    pub(crate) fn add_block(&mut self, y: i16) -> bool {
        self.block_ys.insert(y)
    }
}
