//! Frame emission.
//!
//! The exact inverse of the parser's framing rules: every packet becomes
//! `SOF | cmd | len | seq | crc8 | payload | crc16`, all multi-byte fields
//! little-endian. A [`Serializer`] carries the running sequence counter; all
//! frames emitted by one call share one `seq` value.

use core::marker::PhantomData;

use crate::error::Error;
use crate::packet::Packet;
use crate::registry::{is_member, PacketSet};
use crate::{CRC16, CRC8, FRAME_HEADER_LEN, FRAME_TAIL_LEN, SOF_BYTE};

/// Size on the wire of a whole frame carrying a `T` payload.
pub const fn frame_size<T: Packet>() -> usize {
    FRAME_HEADER_LEN + core::mem::size_of::<T>() + FRAME_TAIL_LEN
}

/// Writes one complete frame for `packet` at the start of `out`, which must
/// be large enough. Returns the frame length.
fn emit_frame<T: Packet>(packet: &T, out: &mut [u8], seq: u8) -> usize {
    let size = core::mem::size_of::<T>();
    out[0] = SOF_BYTE;
    out[1..3].copy_from_slice(&T::CMD.to_le_bytes());
    out[3..5].copy_from_slice(&(size as u16).to_le_bytes());
    out[5] = seq;
    out[6] = CRC8.checksum(&out[..6]);
    out[FRAME_HEADER_LEN..FRAME_HEADER_LEN + size].copy_from_slice(bytemuck::bytes_of(packet));

    let body = FRAME_HEADER_LEN + size;
    let crc = CRC16.checksum(&out[..body]);
    out[body..body + FRAME_TAIL_LEN].copy_from_slice(&crc.to_le_bytes());
    body + FRAME_TAIL_LEN
}

/// One or more packets that serialise back-to-back in a single call.
///
/// Implemented for tuples of [`Packet`] types up to arity eight, mirroring
/// the multi-packet form of [`Serializer::serialize_many`].
pub trait FrameGroup<S: PacketSet> {
    /// Total wire size of all frames in the group.
    const TOTAL_SIZE: usize;

    #[doc(hidden)]
    fn emit_all(&self, out: &mut [u8], seq: u8) -> usize;
}

macro_rules! impl_frame_group {
    ($($ty:ident),+) => {
        impl<Set: PacketSet, $($ty: Packet),+> FrameGroup<Set> for ($($ty,)+) {
            const TOTAL_SIZE: usize = 0 $(+ frame_size::<$ty>())+;

            #[allow(non_snake_case)]
            fn emit_all(&self, out: &mut [u8], seq: u8) -> usize {
                $(
                    const {
                        assert!(
                            is_member::<Set, $ty>(),
                            "packet type is not a member of this packet set",
                        );
                    }
                )+
                let ($($ty,)+) = self;
                let mut offset = 0;
                $(
                    offset += emit_frame($ty, &mut out[offset..], seq);
                )+
                offset
            }
        }
    };
}

impl_frame_group!(A);
impl_frame_group!(A, B);
impl_frame_group!(A, B, C);
impl_frame_group!(A, B, C, D);
impl_frame_group!(A, B, C, D, E);
impl_frame_group!(A, B, C, D, E, F);
impl_frame_group!(A, B, C, D, E, F, G);
impl_frame_group!(A, B, C, D, E, F, G, H);

/// Emits well-formed frames for packets of the set `S`.
pub struct Serializer<S: PacketSet> {
    seq: u8,
    _set: PhantomData<S>,
}

impl<S: PacketSet> Default for Serializer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PacketSet> Serializer<S> {
    /// Creates a serializer with the sequence counter at zero.
    pub const fn new() -> Self {
        Self::with_initial_seq(0)
    }

    /// Creates a serializer whose next frame carries `seq`.
    pub const fn with_initial_seq(seq: u8) -> Self {
        Self {
            seq,
            _set: PhantomData,
        }
    }

    /// The sequence number the next successful call will emit.
    pub const fn seq(&self) -> u8 {
        self.seq
    }

    /// Serialises one packet into `out`, returning the frame length.
    ///
    /// Fails with [`Error::BufferOverflow`] before writing anything when
    /// `out` is too small. The sequence counter advances (wrapping at 256)
    /// only on success.
    pub fn serialize<T: Packet>(&mut self, out: &mut [u8], packet: &T) -> Result<usize, Error> {
        const {
            assert!(
                is_member::<S, T>(),
                "packet type is not a member of this packet set",
            );
        }
        if out.len() < frame_size::<T>() {
            return Err(Error::BufferOverflow);
        }

        let written = emit_frame(packet, out, self.seq);
        self.seq = self.seq.wrapping_add(1);
        Ok(written)
    }

    /// Serialises a tuple of packets back-to-back into `out`, returning the
    /// total number of bytes written. Every frame in the call shares the same
    /// sequence number.
    ///
    /// ```ignore
    /// let written = serializer.serialize_many(&mut buf, &(attitude, battery))?;
    /// ```
    pub fn serialize_many<G: FrameGroup<S>>(
        &mut self,
        out: &mut [u8],
        packets: &G,
    ) -> Result<usize, Error> {
        if out.len() < G::TOTAL_SIZE {
            return Err(Error::BufferOverflow);
        }

        let written = packets.emit_all(out, self.seq);
        self.seq = self.seq.wrapping_add(1);
        Ok(written)
    }
}
