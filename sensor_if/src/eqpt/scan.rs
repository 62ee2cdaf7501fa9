//! # Range Scanner Equipment Module
//!
//! Raw data packets from a 64 beam rotating range scanner. A packet holds 12
//! data chunks followed by 6 status bytes:
//!
//! ```text
//! chunk = block_id: u16 | rotation: u16 | 32 * (distance: u16, intensity: u8)
//! ```
//!
//! All multi-byte fields are little endian. The rotation is in hundredths of
//! a degree, the distance in units of 2 mm.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of data chunks in a packet.
pub const NUM_DATA_CHUNKS: usize = 12;

/// Number of lasers reported in one data chunk.
pub const LASERS_PER_CHUNK: usize = 32;

/// Total number of lasers on the scanner.
pub const NUM_LASERS: usize = 64;

/// Size of one laser return on the wire.
pub const LASER_RETURN_SIZE: usize = 3;

/// Size of one data chunk on the wire.
pub const DATA_CHUNK_SIZE: usize = 4 + LASERS_PER_CHUNK * LASER_RETURN_SIZE;

/// Number of status bytes at the end of a packet.
pub const STATUS_SIZE: usize = 6;

/// Size of a full packet on the wire.
pub const PACKET_SIZE: usize = NUM_DATA_CHUNKS * DATA_CHUNK_SIZE + STATUS_SIZE;

/// Rotational readings are in `1/ROTATION_RESOLUTION` degrees.
pub const ROTATION_RESOLUTION: f64 = 100.0;

/// Size of one distance count.
///
/// Units: meters
pub const DISTANCE_RESOLUTION_M: f64 = 0.002;

/// Block identifier of the upper laser block (lasers 0 to 31).
pub const UPPER_BLOCK_ID: u16 = 0xEEFF;

/// Block identifier of the lower laser block (lasers 32 to 63).
pub const LOWER_BLOCK_ID: u16 = 0xDDFF;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A serialisable scanner packet, as delivered by the log source.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ScanPacket {
    /// The raw packet bytes, stored as base64 when serialised.
    #[serde(with = "crate::b64")]
    pub data: Vec<u8>,
}

/// A single laser return.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct LaserReturn {
    /// Raw distance count, see [`DISTANCE_RESOLUTION_M`].
    pub distance: u16,

    pub intensity: u8,
}

/// One data chunk of a packet, covering 32 lasers at a single rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct DataChunk {
    pub block: LaserBlock,

    /// Raw rotational reading, see [`ROTATION_RESOLUTION`].
    pub rotation: u16,

    pub returns: [LaserReturn; LASERS_PER_CHUNK],
}

/// A parsed scanner packet.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPacket {
    pub chunks: Vec<DataChunk>,

    pub status: [u8; STATUS_SIZE],
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The laser block a data chunk belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaserBlock {
    Upper,
    Lower,
}

/// Errors which can occur while parsing a scanner packet.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum PacketError {
    #[error("Expected a packet of {} bytes, found {0}", PACKET_SIZE)]
    WrongSize(usize),

    #[error("Data chunk {0} has an unknown block identifier 0x{1:04X}")]
    UnknownBlockId(usize, u16),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl LaserBlock {
    /// Index of the first laser of this block.
    pub fn laser_offset(&self) -> usize {
        match self {
            LaserBlock::Upper => 0,
            LaserBlock::Lower => LASERS_PER_CHUNK,
        }
    }

    pub fn id(&self) -> u16 {
        match self {
            LaserBlock::Upper => UPPER_BLOCK_ID,
            LaserBlock::Lower => LOWER_BLOCK_ID,
        }
    }
}

impl DataChunk {
    /// Rotation of this chunk in radians.
    pub fn rotation_rad(&self) -> f64 {
        (self.rotation as f64 / ROTATION_RESOLUTION).to_radians()
    }
}

impl RawPacket {
    /// Parse a packet from its wire representation.
    pub fn parse(bytes: &[u8]) -> Result<Self, PacketError> {
        if bytes.len() != PACKET_SIZE {
            return Err(PacketError::WrongSize(bytes.len()));
        }

        let mut chunks = Vec::with_capacity(NUM_DATA_CHUNKS);

        for (i, raw) in bytes[..NUM_DATA_CHUNKS * DATA_CHUNK_SIZE]
            .chunks_exact(DATA_CHUNK_SIZE)
            .enumerate()
        {
            let block = match LittleEndian::read_u16(&raw[0..2]) {
                UPPER_BLOCK_ID => LaserBlock::Upper,
                LOWER_BLOCK_ID => LaserBlock::Lower,
                id => return Err(PacketError::UnknownBlockId(i, id)),
            };
            let rotation = LittleEndian::read_u16(&raw[2..4]);

            let mut returns = [LaserReturn::default(); LASERS_PER_CHUNK];
            for (j, r) in raw[4..].chunks_exact(LASER_RETURN_SIZE).enumerate() {
                returns[j] = LaserReturn {
                    distance: LittleEndian::read_u16(&r[0..2]),
                    intensity: r[2],
                };
            }

            chunks.push(DataChunk {
                block,
                rotation,
                returns,
            });
        }

        let mut status = [0u8; STATUS_SIZE];
        status.copy_from_slice(&bytes[NUM_DATA_CHUNKS * DATA_CHUNK_SIZE..]);

        Ok(Self { chunks, status })
    }

    /// Write the packet into its wire representation.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(PACKET_SIZE);
        let mut buf = [0u8; 2];

        for chunk in self.chunks.iter() {
            LittleEndian::write_u16(&mut buf, chunk.block.id());
            bytes.extend_from_slice(&buf);
            LittleEndian::write_u16(&mut buf, chunk.rotation);
            bytes.extend_from_slice(&buf);

            for r in chunk.returns.iter() {
                LittleEndian::write_u16(&mut buf, r.distance);
                bytes.extend_from_slice(&buf);
                bytes.push(r.intensity);
            }
        }

        bytes.extend_from_slice(&self.status);

        bytes
    }

    /// Start angle of the packet (rotation of the first chunk) in radians.
    pub fn start_angle_rad(&self) -> f64 {
        self.chunks.first().map(|c| c.rotation_rad()).unwrap_or(0.0)
    }

    /// End angle of the packet (rotation of the last chunk) in radians.
    pub fn end_angle_rad(&self) -> f64 {
        self.chunks.last().map(|c| c.rotation_rad()).unwrap_or(0.0)
    }
}

impl TryFrom<&ScanPacket> for RawPacket {
    type Error = PacketError;

    fn try_from(packet: &ScanPacket) -> Result<Self, Self::Error> {
        RawPacket::parse(&packet.data)
    }
}

impl From<&RawPacket> for ScanPacket {
    fn from(packet: &RawPacket) -> Self {
        Self {
            data: packet.to_bytes(),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn uniform_packet(rotations: [u16; NUM_DATA_CHUNKS], distance: u16) -> RawPacket {
        RawPacket {
            chunks: rotations
                .iter()
                .enumerate()
                .map(|(i, &rotation)| DataChunk {
                    block: if i % 2 == 0 {
                        LaserBlock::Upper
                    } else {
                        LaserBlock::Lower
                    },
                    rotation,
                    returns: [LaserReturn {
                        distance,
                        intensity: 7,
                    }; LASERS_PER_CHUNK],
                })
                .collect(),
            status: [0; STATUS_SIZE],
        }
    }

    #[test]
    fn test_packet_size() {
        assert_eq!(DATA_CHUNK_SIZE, 100);
        assert_eq!(PACKET_SIZE, 1206);
    }

    #[test]
    fn test_parse_wire_layout() {
        let mut bytes = vec![0u8; PACKET_SIZE];
        for i in 0..NUM_DATA_CHUNKS {
            let c = i * DATA_CHUNK_SIZE;
            // Upper block, rotation 90.00 deg
            bytes[c] = 0xFF;
            bytes[c + 1] = 0xEE;
            bytes[c + 2] = 0x28;
            bytes[c + 3] = 0x23;
            // First laser: 500 counts (1 m), intensity 12
            bytes[c + 4] = 0xF4;
            bytes[c + 5] = 0x01;
            bytes[c + 6] = 12;
        }

        let packet = RawPacket::parse(&bytes).unwrap();
        assert_eq!(packet.chunks.len(), NUM_DATA_CHUNKS);
        assert_eq!(packet.chunks[0].block, LaserBlock::Upper);
        assert_eq!(packet.chunks[0].rotation, 9000);
        assert_eq!(packet.chunks[0].returns[0].distance, 500);
        assert_eq!(packet.chunks[0].returns[0].intensity, 12);
        assert_eq!(packet.chunks[0].returns[1].distance, 0);
        assert!((packet.start_angle_rad() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);

        assert_eq!(packet.to_bytes(), bytes);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            RawPacket::parse(&[0u8; 100]),
            Err(PacketError::WrongSize(100))
        );

        let mut bytes = uniform_packet([0; NUM_DATA_CHUNKS], 10).to_bytes();
        bytes[DATA_CHUNK_SIZE] = 0x12;
        bytes[DATA_CHUNK_SIZE + 1] = 0x34;
        assert_eq!(
            RawPacket::parse(&bytes),
            Err(PacketError::UnknownBlockId(1, 0x3412))
        );
    }

    #[test]
    fn test_start_end_angles() {
        let mut rotations = [0u16; NUM_DATA_CHUNKS];
        for (i, r) in rotations.iter_mut().enumerate() {
            *r = 35_000 + 100 * i as u16;
        }
        rotations[NUM_DATA_CHUNKS - 1] = 50;

        let packet = uniform_packet(rotations, 1);
        assert!((packet.start_angle_rad() - 350f64.to_radians()).abs() < 1e-12);
        assert!((packet.end_angle_rad() - 0.5f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_json_payload_is_base64() {
        let packet = ScanPacket {
            data: vec![0xDE, 0xAD, 0xBE, 0xEF],
        };
        let json = serde_json::to_string(&packet).unwrap();
        assert_eq!(json, "{\"data\":\"3q2+7w==\"}");
        assert_eq!(serde_json::from_str::<ScanPacket>(&json).unwrap(), packet);
    }
}
