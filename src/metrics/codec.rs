//! Versioned envelope for persisted snapshots.
//!
//! Layout: 4-byte magic `CSNP`, little-endian `u16` format version, then the
//! bincode-encoded snapshot. Anything without the magic, or carrying a version
//! this build does not know, is treated as foreign and skipped by readers.

use bincode::Options;

use super::snapshot::Snapshot;
use crate::error::Result;

pub const MAGIC: [u8; 4] = *b"CSNP";
pub const FORMAT_VERSION: u16 = 1;

const HEADER_LEN: usize = MAGIC.len() + std::mem::size_of::<u16>();
const MAX_BODY_LEN: u64 = 64 * 1024;

/// Outcome of decoding one stored payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Native(Snapshot),
    /// Not written by this format; skipped without comment.
    Foreign,
    /// Native header over a body that does not decode.
    Malformed(String),
}

fn body_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(MAX_BODY_LEN)
}

pub fn encode(snapshot: &Snapshot) -> Result<Vec<u8>> {
    let body = body_options().serialize(snapshot)?;
    let mut payload = Vec::with_capacity(HEADER_LEN + body.len());
    payload.extend_from_slice(&MAGIC);
    payload.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    payload.extend_from_slice(&body);
    Ok(payload)
}

pub fn decode(payload: &[u8]) -> Decoded {
    if payload.len() < HEADER_LEN || payload[..MAGIC.len()] != MAGIC {
        return Decoded::Foreign;
    }
    let version = u16::from_le_bytes([payload[MAGIC.len()], payload[MAGIC.len() + 1]]);
    if version != FORMAT_VERSION {
        return Decoded::Foreign;
    }
    match body_options().deserialize::<Snapshot>(&payload[HEADER_LEN..]) {
        Ok(snapshot) => Decoded::Native(snapshot),
        Err(e) => Decoded::Malformed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::cache::CacheStats;

    fn sample() -> Snapshot {
        Snapshot::new(
            CacheStats {
                hits: 120,
                misses: 30,
                ratio: Some(0.8),
                bytes: 4096,
                time: 0.0123456,
                calls: 150,
            },
            1_700_000_000,
        )
    }

    #[test]
    fn encoded_payload_decodes_to_same_snapshot() {
        let snapshot = sample();
        let payload = encode(&snapshot).unwrap();
        assert_eq!(&payload[..4], b"CSNP");
        assert_eq!(decode(&payload), Decoded::Native(snapshot));
    }

    #[test]
    fn undefined_ratio_survives_encoding() {
        let snapshot = Snapshot::new(CacheStats::default(), 42);
        let payload = encode(&snapshot).unwrap();
        match decode(&payload) {
            Decoded::Native(decoded) => assert_eq!(decoded.ratio(), None),
            other => panic!("expected native snapshot, got {:?}", other),
        }
    }

    #[test]
    fn foreign_payloads_are_recognized() {
        assert_eq!(decode(b""), Decoded::Foreign);
        assert_eq!(decode(b"CSN"), Decoded::Foreign);
        assert_eq!(decode(b"O:8:\"stdClass\":0:{}"), Decoded::Foreign);
        assert_eq!(decode(br#"{"hits":1}"#), Decoded::Foreign);
    }

    #[test]
    fn unknown_version_is_foreign() {
        let mut payload = encode(&sample()).unwrap();
        payload[4..6].copy_from_slice(&2u16.to_le_bytes());
        assert_eq!(decode(&payload), Decoded::Foreign);
    }

    #[test]
    fn truncated_body_is_malformed() {
        let payload = encode(&sample()).unwrap();
        let truncated = &payload[..payload.len() - 3];
        assert!(matches!(decode(truncated), Decoded::Malformed(_)));
        assert!(matches!(decode(&payload[..HEADER_LEN]), Decoded::Malformed(_)));
    }
}
