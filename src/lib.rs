//! This crate provides a `#![no_std]` frame codec for fixed-layout telemetry
//! and command packets on noisy serial links (UART, USB CDC, RS-485).
//!
//! The packet set of a link is fixed at compile time: each packet type is a
//! plain-old-data struct with a 16-bit command id, registered once with
//! [`packet_set!`]. The [`Serializer`] turns packets into self-delimited,
//! CRC-protected frames; the [`Parser`] consumes an arbitrarily chunked byte
//! stream, survives noise and fragmentation by CRC-driven resynchronisation,
//! and deposits the most recent payload of each command into a per-type slot
//! of a [`MemoryPool`] that the application samples at its own pace.
//!
//! # Frame format
//!
//! ```text
//! +------+--------+--------+-------+----------+- - - - - - -+-----------+
//! | SOF  | cmd    | len    | seq   | hdr CRC8 |   payload   | CRC16     |
//! | 0xA5 | u16 LE | u16 LE | u8    | u8       |  len bytes  | u16 LE    |
//! +------+--------+--------+-------+----------+- - - - - - -+-----------+
//! |<------------- CRC8 ------------>|
//! |<------------------- CRC16 (CCITT-FALSE) -------------->|
//! ```
//!
//! There is no escape sequence: a `0xA5` inside a payload is harmless because
//! frame recovery is driven entirely by the two checksums. The flip side is
//! that a pathological byte stream can forge a checksum-valid frame — the
//! format carries no authentication.
//!
//! # Example
//!
//! ```
//! use bytemuck::{Pod, Zeroable};
//! use rovlink::{packet_set, MemoryPool, Packet, PacketSet, Parser, Serializer};
//!
//! #[repr(C, packed)]
//! #[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
//! struct Attitude {
//!     roll: f32,
//!     pitch: f32,
//!     yaw: f32,
//! }
//!
//! impl Packet for Attitude {
//!     const CMD: u16 = 0x0201;
//! }
//!
//! packet_set! {
//!     struct VehicleLink {
//!         Attitude,
//!     }
//! }
//!
//! let mut serializer = Serializer::<VehicleLink>::new();
//! let mut frame = [0u8; rovlink::frame_size::<Attitude>()];
//! serializer.serialize(&mut frame, &Attitude { roll: 0.1, pitch: 0.2, yaw: 0.3 })?;
//!
//! let mut parser: Parser<VehicleLink, { VehicleLink::POOL_SIZE }, { VehicleLink::RING_SIZE }> =
//!     Parser::new(MemoryPool::new());
//! parser.push(&frame)?;
//!
//! let attitude = parser.read::<Attitude>();
//! assert_eq!(attitude, Attitude { roll: 0.1, pitch: 0.2, yaw: 0.3 });
//! # Ok::<(), rovlink::Error>(())
//! ```

#![no_std]

use crc::{Crc, CRC_16_IBM_3740, CRC_8_SMBUS};

mod error;
mod packet;
mod parser;
mod pool;
mod registry;
mod ring;
mod serializer;

pub use error::Error;
pub use packet::Packet;
pub use parser::{Parser, ParserStats};
pub use pool::MemoryPool;
pub use registry::{is_member, slot_of, PacketDescriptor, PacketSet};
pub use ring::RingBuffer;
pub use serializer::{frame_size, FrameGroup, Serializer};

#[doc(hidden)]
pub use registry::{aligns_fit_pool, cmds_are_unique};

/// Start-of-frame marker.
pub const SOF_BYTE: u8 = 0xA5;

/// Frame header size: SOF, cmd, len, seq, header CRC-8.
pub const FRAME_HEADER_LEN: usize = 7;

/// Frame tail size: the CRC-16.
pub const FRAME_TAIL_LEN: usize = 2;

/// Header CRC: CRC-8 (poly 0x07, init 0x00, no reflection, xorout 0x00)
/// over the six bytes preceding it.
pub(crate) static CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

/// Frame CRC: CRC-16/CCITT-FALSE (poly 0x1021, init 0xFFFF, no reflection,
/// xorout 0x0000) over everything from SOF through the last payload byte.
pub(crate) static CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);
