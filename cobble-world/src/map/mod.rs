use std::collections::{HashMap, hash_map::Entry};

use cobble_util::math::{position::BlockPos, vector2::Vector2, vector3::Vector3};
use thiserror::Error;

pub mod block;
pub mod sector;
pub mod serialization;

pub use block::{MapBlock, MapNode};
pub use sector::MapSector;

/// Side length of a block, in nodes.
pub const MAP_BLOCKSIZE: i16 = 16;

pub trait Dirtiable {
    fn is_dirty(&self) -> bool;
    fn mark_dirty(&mut self, flag: bool);
}

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Block {0} already exists")]
    BlockAlreadyExists(BlockPos),
    #[error("Sector {0} does not exist, can't insert block {1}")]
    SectorNotFound(Vector2<i16>, BlockPos),
}

/// The live world: every loaded block lives in one arena keyed by position,
/// sectors only remember which vertical indices of their column are present.
#[derive(Default)]
pub struct Map {
    sectors: HashMap<Vector2<i16>, MapSector>,
    blocks: HashMap<BlockPos, MapBlock>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sector at `pos`, creating an empty one if needed.
    pub fn create_sector(&mut self, pos: Vector2<i16>) -> &mut MapSector {
        self.sectors
            .entry(pos)
            .or_insert_with(|| MapSector::new(pos))
    }

    pub fn get_sector(&self, pos: Vector2<i16>) -> Option<&MapSector> {
        self.sectors.get(&pos)
    }

    pub fn sectors(&self) -> impl Iterator<Item = &MapSector> {
        self.sectors.values()
    }

    pub fn get_block_no_create(&self, pos: BlockPos) -> Option<&MapBlock> {
        self.blocks.get(&pos)
    }

    pub fn get_block_no_create_mut(&mut self, pos: BlockPos) -> Option<&mut MapBlock> {
        self.blocks.get_mut(&pos)
    }

    /// Publishes a block that was built outside the map. Its sector has to
    /// exist already and the position must still be free.
    pub fn insert_block(&mut self, block: MapBlock) -> Result<&mut MapBlock, MapError> {
        let pos = block.pos();
        let sector = self
            .sectors
            .get_mut(&pos.sector_pos())
            .ok_or(MapError::SectorNotFound(pos.sector_pos(), pos))?;

        match self.blocks.entry(pos) {
            Entry::Occupied(_) => Err(MapError::BlockAlreadyExists(pos)),
            Entry::Vacant(entry) => {
                sector.add_block(pos.y());
                Ok(entry.insert(block))
            }
        }
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Positions of all blocks, grouped by sector.
    pub fn positions(&self) -> Vec<BlockPos> {
        self.sectors
            .values()
            .flat_map(|sector| {
                sector
                    .block_ys()
                    .map(move |y| BlockPos::from_sector(sector.pos(), y))
            })
            .collect()
    }

    /// Reads a node by world node coordinate. `None` if its block isn't
    /// loaded or is a dummy.
    pub fn get_node(&self, node_pos: Vector3<i16>) -> Option<MapNode> {
        let (block_pos, relative) = BlockPos::block_and_relative_position(node_pos, MAP_BLOCKSIZE);
        self.blocks.get(&block_pos)?.get_node(relative)
    }

    /// Writes a node by world node coordinate and returns the previous one.
    pub fn set_node(&mut self, node_pos: Vector3<i16>, node: MapNode) -> Option<MapNode> {
        let (block_pos, relative) = BlockPos::block_and_relative_position(node_pos, MAP_BLOCKSIZE);
        self.blocks.get_mut(&block_pos)?.set_node(relative, node)
    }
}

#[cfg(test)]
mod tests {
    use cobble_util::math::{position::BlockPos, vector2::Vector2, vector3::Vector3};

    use super::{Dirtiable, Map, MapBlock, MapError, MapNode};

    #[test]
    fn create_sector_is_idempotent() {
        let mut map = Map::new();
        map.create_sector(Vector2::new(1, 2));
        map.create_sector(Vector2::new(1, 2));
        assert_eq!(map.sectors().count(), 1);
        assert!(map.get_sector(Vector2::new(1, 2)).is_some());
        assert!(map.get_sector(Vector2::new(2, 1)).is_none());
    }

    #[test]
    fn insert_needs_sector() {
        let mut map = Map::new();
        let pos = BlockPos::new(0, 3, 0);

        let result = map.insert_block(MapBlock::blank(pos));
        assert!(matches!(result, Err(MapError::SectorNotFound(_, p)) if p == pos));
        assert_eq!(map.block_count(), 0);

        map.create_sector(pos.sector_pos());
        map.insert_block(MapBlock::blank(pos)).unwrap();
        assert!(map.get_block_no_create(pos).is_some());
        assert!(map.get_sector(pos.sector_pos()).unwrap().contains(3));
    }

    #[test]
    fn insert_rejects_duplicate() {
        let mut map = Map::new();
        let pos = BlockPos::new(-1, 0, 7);
        map.create_sector(pos.sector_pos());
        map.insert_block(MapBlock::blank(pos)).unwrap();

        let result = map.insert_block(MapBlock::blank(pos));
        assert!(matches!(result, Err(MapError::BlockAlreadyExists(p)) if p == pos));
        assert_eq!(map.block_count(), 1);
    }

    #[test]
    fn positions_lists_every_block() {
        let mut map = Map::new();
        let positions = [
            BlockPos::new(0, 0, 0),
            BlockPos::new(0, 1, 0),
            BlockPos::new(5, -2, 5),
        ];
        for pos in positions {
            map.create_sector(pos.sector_pos());
            map.insert_block(MapBlock::blank(pos)).unwrap();
        }

        let mut listed = map.positions();
        listed.sort();
        let mut expected = positions.to_vec();
        expected.sort();
        assert_eq!(listed, expected);
    }

    #[test]
    fn nodes_by_world_coordinate() {
        let mut map = Map::new();
        let pos = BlockPos::new(-1, 0, 0);
        map.create_sector(pos.sector_pos());
        map.insert_block(MapBlock::blank(pos)).unwrap();
        map.get_block_no_create_mut(pos).unwrap().mark_dirty(false);

        let node_pos = Vector3::new(-1, 4, 15);
        assert!(map.set_node(node_pos, MapNode::new(9)).is_some());
        assert_eq!(map.get_node(node_pos), Some(MapNode::new(9)));
        assert!(map.get_block_no_create(pos).unwrap().is_dirty());

        // Neighbouring block isn't loaded
        assert_eq!(map.get_node(Vector3::new(0, 4, 15)), None);
    }
}
