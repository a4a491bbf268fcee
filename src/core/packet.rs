use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

use crate::error::{Result, SyncError};

/// Kind byte + originator identifier.
pub const PACKET_HEADER_LEN: usize = 1 + 8;

/// Globally unique peer identifier assigned by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Guid(pub u64);

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Decoded packet header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    pub kind: u8,
    pub originator: Guid,
}

/// Decode the kind id and originator from the front of a datagram.
pub fn decode_header(bytes: &[u8]) -> Result<PacketHeader> {
    if bytes.len() < PACKET_HEADER_LEN {
        return Err(SyncError::TruncatedPacket {
            needed: PACKET_HEADER_LEN,
            available: bytes.len(),
        });
    }
    let mut originator = [0u8; 8];
    originator.copy_from_slice(&bytes[1..PACKET_HEADER_LEN]);
    Ok(PacketHeader {
        kind: bytes[0],
        originator: Guid(u64::from_le_bytes(originator)),
    })
}

/// Encode a full datagram.
pub fn encode(kind: u8, originator: Guid, body: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(PACKET_HEADER_LEN + body.len());
    buf.put_u8(kind);
    buf.put_u64_le(originator.0);
    buf.put_slice(body);
    buf.freeze()
}

/// A protocol message: header plus the kind-specific body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub header: PacketHeader,
    pub body: Bytes,
}

impl Packet {
    pub fn new(kind: u8, originator: Guid, body: Bytes) -> Self {
        Self {
            header: PacketHeader { kind, originator },
            body,
        }
    }

    /// A bodyless packet, i.e. a request for the kind's current state.
    pub fn bare(kind: u8, originator: Guid) -> Self {
        Self::new(kind, originator, Bytes::new())
    }

    pub fn from_bytes(data: Bytes) -> Result<Self> {
        let header = decode_header(&data)?;
        let body = data.slice(PACKET_HEADER_LEN..);
        Ok(Self { header, body })
    }

    pub fn to_bytes(&self) -> Bytes {
        encode(self.header.kind, self.header.originator, &self.body)
    }

    pub fn kind(&self) -> u8 {
        self.header.kind
    }

    pub fn originator(&self) -> Guid {
        self.header.originator
    }

    /// Total encoded length
    pub fn len(&self) -> usize {
        PACKET_HEADER_LEN + self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrip() {
        let bytes = encode(137, Guid(42), &[1, 2, 3]);
        let packet = Packet::from_bytes(bytes).unwrap();
        assert_eq!(packet.kind(), 137);
        assert_eq!(packet.originator(), Guid(42));
        assert_eq!(&packet.body[..], &[1, 2, 3]);
        assert_eq!(packet.len(), PACKET_HEADER_LEN + 3);
    }

    #[test]
    fn short_datagram_is_truncated() {
        assert!(matches!(
            decode_header(&[137]),
            Err(SyncError::TruncatedPacket {
                needed: PACKET_HEADER_LEN,
                available: 1
            })
        ));
        assert!(decode_header(&[]).is_err());
    }

    #[test]
    fn bare_packet_is_header_sized() {
        let packet = Packet::bare(140, Guid(7));
        assert_eq!(packet.to_bytes().len(), PACKET_HEADER_LEN);
        assert!(packet.is_empty());
    }
}
