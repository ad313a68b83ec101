use std::fmt;
use std::io::Read;

use bytes::{Buf, BufMut};
use cobble_util::math::position::BlockPos;
use flate2::{bufread::ZlibDecoder, read::ZlibEncoder};
use thiserror::Error;

use super::block::{MapBlock, MapNode, NODES_PER_BLOCK};

/// Revision of the block content layout. Stored as the first byte of every
/// persisted block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SerializationVersion(pub u8);

impl SerializationVersion {
    /// Never written; means "no valid version present".
    pub const INVALID: Self = Self(255);
    pub const LOWEST_READ: Self = Self(24);
    pub const HIGHEST_READ: Self = Self(25);
    pub const LOWEST_WRITE: Self = Self(24);
    pub const HIGHEST_WRITE: Self = Self(25);
    /// The version used for saving.
    pub const HIGHEST: Self = Self::HIGHEST_WRITE;

    /// Since this version the disk format carries the block timestamp.
    const WITH_TIMESTAMP: Self = Self(25);

    pub fn is_readable(self) -> bool {
        (Self::LOWEST_READ..=Self::HIGHEST_READ).contains(&self)
    }

    pub fn is_writable(self) -> bool {
        (Self::LOWEST_WRITE..=Self::HIGHEST_WRITE).contains(&self)
    }
}

impl From<u8> for SerializationVersion {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<SerializationVersion> for u8 {
    fn from(value: SerializationVersion) -> Self {
        value.0
    }
}

impl fmt::Display for SerializationVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug)]
pub enum BlockParsingError {
    #[error("Unsupported serialization version {0}")]
    UnsupportedVersion(SerializationVersion),
    #[error("Unexpected end of data while reading {0}")]
    UnexpectedEnd(&'static str),
    #[error("Bad node data widths: content {content}, params {params}")]
    BadWidths { content: u8, params: u8 },
    #[error("Expected {expected} bytes of node data but got {actual}")]
    BadNodeDataLength { expected: usize, actual: usize },
    #[error("Error while decompressing node data: {0}")]
    Decompression(std::io::Error),
    #[error("{0} unexpected bytes after the block data")]
    TrailingData(usize),
}

#[derive(Error, Debug)]
pub enum BlockSerializingError {
    #[error("Tried to serialize dummy block {0}")]
    DummyBlock(BlockPos),
    #[error("Can't write serialization version {0}")]
    UnsupportedVersion(SerializationVersion),
    #[error("Error while compressing node data: {0}")]
    Compression(std::io::Error),
}

const FLAG_UNDERGROUND: u8 = 0x01;
const FLAG_DAY_NIGHT_DIFFERS: u8 = 0x02;
const FLAG_LIGHTING_EXPIRED: u8 = 0x04;
const FLAG_NOT_GENERATED: u8 = 0x08;

const CONTENT_WIDTH: u8 = 2;
const PARAMS_WIDTH: u8 = 2;

/// Bytes per node once uncompressed: `param0` (u16) + `param1` + `param2`.
const NODE_DATA_LENGTH: usize = NODES_PER_BLOCK * 4;

const COMPRESSION_LEVEL: u32 = 6;

impl MapBlock {
    /// Serializes the node data and flags of the block.
    ///
    /// Layout:
    /// - `u8` flags
    /// - `u8` content width, `u8` params width
    /// - zlib: every `param0` as big-endian `u16`, then every `param1`, then every `param2`
    /// - `u32` timestamp (only with `disk` and version 25+)
    pub fn serialize(
        &self,
        version: SerializationVersion,
        disk: bool,
    ) -> Result<Vec<u8>, BlockSerializingError> {
        if !version.is_writable() {
            return Err(BlockSerializingError::UnsupportedVersion(version));
        }
        let Some(nodes) = &self.data else {
            return Err(BlockSerializingError::DummyBlock(self.pos()));
        };

        let mut flags = 0;
        if self.is_underground {
            flags |= FLAG_UNDERGROUND;
        }
        if self.day_night_differs {
            flags |= FLAG_DAY_NIGHT_DIFFERS;
        }
        if self.lighting_expired {
            flags |= FLAG_LIGHTING_EXPIRED;
        }
        if !self.generated {
            flags |= FLAG_NOT_GENERATED;
        }

        let mut node_data = Vec::with_capacity(NODE_DATA_LENGTH);
        for node in nodes.iter() {
            node_data.put_u16(node.param0);
        }
        for node in nodes.iter() {
            node_data.put_u8(node.param1);
        }
        for node in nodes.iter() {
            node_data.put_u8(node.param2);
        }

        let mut encoder = ZlibEncoder::new(
            node_data.as_slice(),
            flate2::Compression::new(COMPRESSION_LEVEL),
        );
        let mut compressed = Vec::new();
        encoder
            .read_to_end(&mut compressed)
            .map_err(BlockSerializingError::Compression)?;

        let mut result = Vec::with_capacity(3 + compressed.len() + 4);
        result.put_u8(flags);
        result.put_u8(CONTENT_WIDTH);
        result.put_u8(PARAMS_WIDTH);
        result.put_slice(&compressed);
        if disk && version >= SerializationVersion::WITH_TIMESTAMP {
            result.put_u32(self.timestamp);
        }

        Ok(result)
    }

    /// Replaces the content of the block with the serialized one.
    ///
    /// Nothing is touched unless the whole input parses. On success the
    /// block has node data, even if it was a dummy before.
    pub fn deserialize(
        &mut self,
        mut bytes: &[u8],
        version: SerializationVersion,
        disk: bool,
    ) -> Result<(), BlockParsingError> {
        if !version.is_readable() {
            return Err(BlockParsingError::UnsupportedVersion(version));
        }

        if bytes.remaining() < 3 {
            return Err(BlockParsingError::UnexpectedEnd("block header"));
        }
        let flags = bytes.get_u8();
        let content = bytes.get_u8();
        let params = bytes.get_u8();
        if content != CONTENT_WIDTH || params != PARAMS_WIDTH {
            return Err(BlockParsingError::BadWidths { content, params });
        }

        let mut decoder = ZlibDecoder::new(bytes);
        let mut node_data = Vec::with_capacity(NODE_DATA_LENGTH);
        (&mut decoder)
            .take(NODE_DATA_LENGTH as u64 + 1)
            .read_to_end(&mut node_data)
            .map_err(BlockParsingError::Decompression)?;
        if node_data.len() != NODE_DATA_LENGTH {
            return Err(BlockParsingError::BadNodeDataLength {
                expected: NODE_DATA_LENGTH,
                actual: node_data.len(),
            });
        }
        let mut rest = decoder.into_inner();

        let timestamp = if disk && version >= SerializationVersion::WITH_TIMESTAMP {
            if rest.remaining() < 4 {
                return Err(BlockParsingError::UnexpectedEnd("timestamp"));
            }
            Some(rest.get_u32())
        } else {
            None
        };
        if rest.has_remaining() {
            return Err(BlockParsingError::TrailingData(rest.remaining()));
        }

        let (param0, params) = node_data.split_at(NODES_PER_BLOCK * 2);
        let (param1, param2) = params.split_at(NODES_PER_BLOCK);
        let nodes = param0
            .chunks_exact(2)
            .zip(param1)
            .zip(param2)
            .map(|((content, &param1), &param2)| {
                MapNode::with_params(u16::from_be_bytes([content[0], content[1]]), param1, param2)
            })
            .collect::<Box<[_]>>();

        self.data = Some(nodes);
        self.is_underground = flags & FLAG_UNDERGROUND != 0;
        self.day_night_differs = flags & FLAG_DAY_NIGHT_DIFFERS != 0;
        self.lighting_expired = flags & FLAG_LIGHTING_EXPIRED != 0;
        self.generated = flags & FLAG_NOT_GENERATED == 0;
        if let Some(timestamp) = timestamp {
            self.timestamp = timestamp;
        }

        Ok(())
    }
}
