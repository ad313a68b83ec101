//! Live map blocks and their storage.
//!
//! [`map`] holds the in-memory world: sectors, blocks and the block content
//! format. [`database`] maps block positions to stored bytes and turns them
//! back into live blocks.

pub mod database;
pub mod map;

pub use database::{
    BlockReadingError, BlockWritingError, Database, DummyDatabase, SaveMode, SharedDatabase,
    open_database, save_map,
};
pub use map::{Map, MapBlock, MapNode, MapSector};
