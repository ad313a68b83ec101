//! Layout of a stored block:
//!
//! | offset | size | meaning                                  |
//! |--------|------|------------------------------------------|
//! | 0      | 1    | [`SerializationVersion`] of the content  |
//! | 1..    | N    | content, see [`MapBlock::serialize`]     |
//!
//! Every backend stores exactly these bytes.
//!
//! [`MapBlock::serialize`]: crate::map::MapBlock::serialize

use bytes::{Buf, BufMut, Bytes};
use thiserror::Error;

use crate::map::serialization::SerializationVersion;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Payload is too short to contain a version")]
    Truncated,
}

/// Prefixes `content` with its version tag.
pub fn encode_payload(version: SerializationVersion, content: &[u8]) -> Bytes {
    debug_assert_ne!(version, SerializationVersion::INVALID);

    let mut payload = Vec::with_capacity(1 + content.len());
    payload.put_u8(version.into());
    payload.put_slice(content);
    payload.into()
}

/// Splits a stored payload into its version tag and content.
///
/// The version isn't validated here, that is up to the content reader.
pub fn decode_payload(mut payload: &[u8]) -> Result<(SerializationVersion, &[u8]), PayloadError> {
    if !payload.has_remaining() {
        return Err(PayloadError::Truncated);
    }
    let version = payload.get_u8().into();
    Ok((version, payload))
}

#[cfg(test)]
mod tests {
    use super::{PayloadError, decode_payload, encode_payload};
    use crate::map::serialization::SerializationVersion;

    #[test]
    fn version_is_the_first_byte() {
        let payload = encode_payload(SerializationVersion::HIGHEST, &[1, 2, 3]);
        assert_eq!(&payload[..], &[SerializationVersion::HIGHEST.0, 1, 2, 3]);

        let (version, content) = decode_payload(&payload).unwrap();
        assert_eq!(version, SerializationVersion::HIGHEST);
        assert_eq!(content, &[1, 2, 3]);
    }

    #[test]
    fn empty_content() {
        let payload = encode_payload(SerializationVersion(24), &[]);
        assert_eq!(payload.len(), 1);
        let (version, content) = decode_payload(&payload).unwrap();
        assert_eq!(version, SerializationVersion(24));
        assert!(content.is_empty());
    }

    #[test]
    fn empty_payload_is_truncated() {
        assert_eq!(decode_payload(&[]), Err(PayloadError::Truncated));
    }

    #[test]
    fn invalid_version_is_passed_through() {
        let (version, content) = decode_payload(&[255, 9]).unwrap();
        assert_eq!(version, SerializationVersion::INVALID);
        assert_eq!(content, &[9]);
    }
}
