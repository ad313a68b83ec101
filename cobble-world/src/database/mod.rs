use cobble_config::{DatabaseBackend, StorageConfig};
use cobble_util::math::position::BlockPos;
use log::debug;
use thiserror::Error;

use crate::map::{
    Dirtiable, Map, MapBlock, MapError,
    serialization::{BlockParsingError, BlockSerializingError},
};

pub mod dummy;
pub mod key;
pub mod payload;
pub mod shared;
pub mod store;

pub use dummy::DummyDatabase;
pub use shared::SharedDatabase;

#[derive(Error, Debug)]
pub enum BlockReadingError {
    #[error("Stored data of block {0} is too short to contain a version")]
    TruncatedPayload(BlockPos),
    #[error("Invalid block data for block {pos}: {source}")]
    CorruptBlockData {
        pos: BlockPos,
        source: BlockParsingError,
    },
    #[error(transparent)]
    Map(#[from] MapError),
}

impl BlockReadingError {
    /// Whether the stored data itself is bad, as opposed to the live map
    /// rejecting the loaded block.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::TruncatedPayload(_) | Self::CorruptBlockData { .. }
        )
    }
}

#[derive(Error, Debug)]
pub enum BlockWritingError {
    #[error("Block {0} is outside the range storable by the database")]
    PositionOutOfRange(BlockPos),
    #[error("Block serializing error: {0}")]
    Serializing(#[from] BlockSerializingError),
}

/// Storage backend for map blocks.
///
/// Blocks are keyed by [`key::block_as_key`] and stored in the layout of
/// [`payload`], so backends are interchangeable.
pub trait Database {
    /// Called before a batch of [`Database::save_block`] calls.
    fn begin_save(&mut self);

    /// Called after a batch of [`Database::save_block`] calls.
    fn end_save(&mut self);

    /// Stores the block and clears its modified flag. Dummy blocks are
    /// skipped; blocks outside [`key::is_valid_key_pos`] are rejected.
    fn save_block(&mut self, block: &mut MapBlock) -> Result<(), BlockWritingError>;

    /// Loads the block at `pos` into `map`, returning the live block.
    ///
    /// `Ok(None)` means nothing is stored for `pos`, which is always the case
    /// outside [`key::is_valid_key_pos`].
    fn load_block<'a>(
        &mut self,
        map: &'a mut Map,
        pos: BlockPos,
    ) -> Result<Option<&'a mut MapBlock>, BlockReadingError>;

    /// Positions of every stored block, in no particular order.
    fn list_all_loadable_blocks(&self) -> Vec<BlockPos>;

    fn initialized(&self) -> bool;
}

/// Opens the backend selected by the config.
pub fn open_database(config: &StorageConfig) -> Box<dyn Database + Send> {
    match config.backend {
        DatabaseBackend::Dummy => Box::new(DummyDatabase::new(config.clone())),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveMode {
    /// Only blocks that changed since they were last saved or loaded
    Modified,
    All,
}

/// Saves the blocks of `map` in one batch and returns how many were written.
pub fn save_map<D: Database + ?Sized>(
    db: &mut D,
    map: &mut Map,
    mode: SaveMode,
) -> Result<usize, BlockWritingError> {
    db.begin_save();

    let mut saved = 0;
    let mut result = Ok(());
    for pos in map.positions() {
        let Some(block) = map.get_block_no_create_mut(pos) else {
            continue;
        };
        if block.is_dummy() || (mode == SaveMode::Modified && !block.is_dirty()) {
            continue;
        }
        if let Err(err) = db.save_block(block) {
            result = Err(err);
            break;
        }
        saved += 1;
    }

    db.end_save();
    result?;

    debug!("Saved {saved} blocks ({mode:?})");
    Ok(saved)
}
