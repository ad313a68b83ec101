use cobble_config::StorageConfig;
use cobble_util::math::position::BlockPos;
use log::{debug, error, trace};

use super::{
    BlockReadingError, BlockWritingError, Database,
    key::{block_as_key, is_valid_key_pos, key_as_block},
    payload::{decode_payload, encode_payload},
    store::BlockStore,
};
use crate::map::{
    Map, MapBlock,
    serialization::{BlockParsingError, SerializationVersion},
};

/// Keeps saved blocks in memory for the lifetime of the database. Useful for
/// throwaway worlds and tests; uses the same keys and payload layout as the
/// persistent backends.
pub struct DummyDatabase {
    store: BlockStore,
    config: StorageConfig,
}

impl DummyDatabase {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            store: BlockStore::new(),
            config,
        }
    }

    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    /// Raw access to the stored payloads, bypassing serialization.
    pub fn store_mut(&mut self) -> &mut BlockStore {
        &mut self.store
    }

    /// Decodes `payload` into the live block at `pos`, or into a new block
    /// that only gets inserted into `map` once it's fully read.
    fn read_block(map: &mut Map, pos: BlockPos, payload: &[u8]) -> Result<(), BlockReadingError> {
        let (version, content) =
            decode_payload(payload).map_err(|_| BlockReadingError::TruncatedPayload(pos))?;
        let corrupt = |source: BlockParsingError| BlockReadingError::CorruptBlockData { pos, source };

        if let Some(block) = map.get_block_no_create_mut(pos) {
            block.deserialize(content, version, true).map_err(corrupt)?;
            // We just loaded it, so it's up-to-date
            block.reset_modified();
            return Ok(());
        }

        let mut block = MapBlock::blank(pos);
        block.deserialize(content, version, true).map_err(corrupt)?;
        block.reset_modified();

        map.create_sector(pos.sector_pos());
        map.insert_block(block)?;
        Ok(())
    }
}

impl Database for DummyDatabase {
    fn begin_save(&mut self) {}

    fn end_save(&mut self) {}

    fn save_block(&mut self, block: &mut MapBlock) -> Result<(), BlockWritingError> {
        // Dummy blocks are not written
        if block.is_dummy() {
            return Ok(());
        }
        // Would alias the key of another block
        if !is_valid_key_pos(block.pos()) {
            return Err(BlockWritingError::PositionOutOfRange(block.pos()));
        }

        let version = SerializationVersion::HIGHEST;
        let content = block.serialize(version, true)?;
        trace!("Saving block {} ({} bytes)", block.pos(), content.len() + 1);

        self.store
            .put(block_as_key(block.pos()), encode_payload(version, &content));

        // We just wrote it, so clear the modified flag
        block.reset_modified();
        Ok(())
    }

    fn load_block<'a>(
        &mut self,
        map: &'a mut Map,
        pos: BlockPos,
    ) -> Result<Option<&'a mut MapBlock>, BlockReadingError> {
        if !is_valid_key_pos(pos) {
            return Ok(None);
        }
        let Some(payload) = self.store.get(block_as_key(pos)) else {
            return Ok(None);
        };

        match Self::read_block(map, pos, &payload) {
            Ok(()) => Ok(map.get_block_no_create_mut(pos)),
            Err(err) if err.is_corruption() => {
                error!("Invalid block data in database {pos}: {err}");
                if self.config.ignore_world_load_errors {
                    error!("Ignoring block load error (ignore_world_load_errors)");
                    Ok(None)
                } else {
                    Err(err)
                }
            }
            Err(err) => Err(err),
        }
    }

    fn list_all_loadable_blocks(&self) -> Vec<BlockPos> {
        self.store.all_keys().map(key_as_block).collect()
    }

    fn initialized(&self) -> bool {
        true
    }
}

impl Drop for DummyDatabase {
    fn drop(&mut self) {
        debug!("Discarding {} blocks of the dummy database", self.store.len());
        self.store.clear();
    }
}
