use cobble_util::math::{position::BlockPos, vector3::Vector3};

use super::{Dirtiable, MAP_BLOCKSIZE};

pub const NODES_PER_BLOCK: usize = (MAP_BLOCKSIZE as usize).pow(3);

/// Content id of a node whose content is not known; blank blocks are full of it.
pub const CONTENT_IGNORE: u16 = 127;
pub const CONTENT_AIR: u16 = 126;

pub const BLOCK_TIMESTAMP_UNDEFINED: u32 = u32::MAX;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct MapNode {
    /// Content id
    pub param0: u16,
    /// Usually light
    pub param1: u8,
    /// Content specific (rotation, level, ...)
    pub param2: u8,
}

impl MapNode {
    pub const IGNORE: Self = Self::new(CONTENT_IGNORE);
    pub const AIR: Self = Self::new(CONTENT_AIR);

    pub const fn new(content: u16) -> Self {
        Self {
            param0: content,
            param1: 0,
            param2: 0,
        }
    }

    pub const fn with_params(content: u16, param1: u8, param2: u8) -> Self {
        Self {
            param0: content,
            param1,
            param2,
        }
    }
}

/// A 16x16x16 cube of nodes.
///
/// A *dummy* block has no node data at all. It only marks a position and is
/// never persisted.
#[derive(Clone, Debug)]
pub struct MapBlock {
    pos: BlockPos,
    /// Ordering: zyx (z being the most significant)
    pub(crate) data: Option<Box<[MapNode]>>,
    pub(crate) is_underground: bool,
    pub(crate) day_night_differs: bool,
    pub(crate) lighting_expired: bool,
    pub(crate) generated: bool,
    pub(crate) timestamp: u32,
    dirty: bool,
}

impl MapBlock {
    /// A block without any node data.
    pub fn dummy(pos: BlockPos) -> Self {
        Self {
            pos,
            data: None,
            is_underground: false,
            day_night_differs: false,
            lighting_expired: true,
            generated: false,
            timestamp: BLOCK_TIMESTAMP_UNDEFINED,
            dirty: true,
        }
    }

    /// A block filled with [`CONTENT_IGNORE`] that is not part of any map
    /// yet. Populate it, then hand it to [`Map::insert_block`](super::Map::insert_block).
    pub fn blank(pos: BlockPos) -> Self {
        Self {
            data: Some(vec![MapNode::IGNORE; NODES_PER_BLOCK].into_boxed_slice()),
            ..Self::dummy(pos)
        }
    }

    pub fn pos(&self) -> BlockPos {
        self.pos
    }

    pub fn is_dummy(&self) -> bool {
        self.data.is_none()
    }

    /// Marks the block as matching its persisted copy.
    #[inline]
    pub fn reset_modified(&mut self) {
        self.mark_dirty(false);
    }

    pub fn get_node(&self, relative: Vector3<i16>) -> Option<MapNode> {
        let data = self.data.as_ref()?;
        node_index(relative).map(|index| data[index])
    }

    /// Sets a node and returns the previous one. Does nothing on dummy
    /// blocks or positions outside the block.
    pub fn set_node(&mut self, relative: Vector3<i16>, node: MapNode) -> Option<MapNode> {
        let index = node_index(relative)?;
        let data = self.data.as_mut()?;
        let old = std::mem::replace(&mut data[index], node);
        self.dirty = true;
        Some(old)
    }

    /// Fills every node; turns a dummy into a real block.
    pub fn fill(&mut self, node: MapNode) {
        self.data = Some(vec![node; NODES_PER_BLOCK].into_boxed_slice());
        self.dirty = true;
    }

    pub fn is_underground(&self) -> bool {
        self.is_underground
    }

    pub fn set_is_underground(&mut self, is_underground: bool) {
        self.is_underground = is_underground;
        self.dirty = true;
    }

    pub fn day_night_differs(&self) -> bool {
        self.day_night_differs
    }

    pub fn set_day_night_differs(&mut self, differs: bool) {
        self.day_night_differs = differs;
        self.dirty = true;
    }

    pub fn lighting_expired(&self) -> bool {
        self.lighting_expired
    }

    pub fn set_lighting_expired(&mut self, expired: bool) {
        self.lighting_expired = expired;
        self.dirty = true;
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn set_generated(&mut self, generated: bool) {
        self.generated = generated;
        self.dirty = true;
    }

    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: u32) {
        self.timestamp = timestamp;
        self.dirty = true;
    }
}

/// Content equality; the dirty flag isn't part of a block's content.
impl PartialEq for MapBlock {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
            && self.data == other.data
            && self.is_underground == other.is_underground
            && self.day_night_differs == other.day_night_differs
            && self.lighting_expired == other.lighting_expired
            && self.generated == other.generated
            && self.timestamp == other.timestamp
    }
}

impl Dirtiable for MapBlock {
    #[inline]
    fn mark_dirty(&mut self, flag: bool) {
        self.dirty = flag;
    }

    #[inline]
    fn is_dirty(&self) -> bool {
        self.dirty
    }
}

fn node_index(relative: Vector3<i16>) -> Option<usize> {
    let range = 0..MAP_BLOCKSIZE;
    if !range.contains(&relative.x) || !range.contains(&relative.y) || !range.contains(&relative.z)
    {
        return None;
    }
    let size = MAP_BLOCKSIZE as usize;
    Some(relative.z as usize * size * size + relative.y as usize * size + relative.x as usize)
}
