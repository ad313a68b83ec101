use std::sync::Arc;

use cobble_util::math::position::BlockPos;
use parking_lot::{Mutex, MutexGuard};

use super::{BlockReadingError, BlockWritingError, Database};
use crate::map::{Map, MapBlock};

/// A database that can be handed to several threads.
///
/// Clones share the same backend. Every call holds the lock for the whole
/// operation, so nobody sees a block between being stored and being usable.
pub struct SharedDatabase<D> {
    inner: Arc<Mutex<D>>,
}

impl<D> Clone for SharedDatabase<D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<D: Database> SharedDatabase<D> {
    pub fn new(database: D) -> Self {
        Self {
            inner: Arc::new(Mutex::new(database)),
        }
    }

    /// Locks the backend for a sequence of calls that must not interleave
    /// with other threads.
    pub fn lock(&self) -> MutexGuard<'_, D> {
        self.inner.lock()
    }
}

impl<D: Database> Database for SharedDatabase<D> {
    fn begin_save(&mut self) {
        self.inner.lock().begin_save();
    }

    fn end_save(&mut self) {
        self.inner.lock().end_save();
    }

    fn save_block(&mut self, block: &mut MapBlock) -> Result<(), BlockWritingError> {
        self.inner.lock().save_block(block)
    }

    fn load_block<'a>(
        &mut self,
        map: &'a mut Map,
        pos: BlockPos,
    ) -> Result<Option<&'a mut MapBlock>, BlockReadingError> {
        self.inner.lock().load_block(map, pos)
    }

    fn list_all_loadable_blocks(&self) -> Vec<BlockPos> {
        self.inner.lock().list_all_loadable_blocks()
    }

    fn initialized(&self) -> bool {
        self.inner.lock().initialized()
    }
}
