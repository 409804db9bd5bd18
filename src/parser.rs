//! Streaming frame parser.
//!
//! Sits behind a ring buffer and recovers whole frames from an arbitrarily
//! chunked, possibly noisy byte stream. Logically a three-state machine:
//!
//! ```text
//! +---------------+   +---------------+   +-------------+
//! | Synchronising |-->| HeaderPending |-->| BodyPending |
//! +---------------+   +---------------+   +-------------+
//!         ^                   |                  |
//!         |  header CRC bad / |                  |  body CRC bad (skip 1)
//!         |  length invalid   |                  |  or frame committed
//!         +-------------------+                  |
//!         +--------------------------------------+
//! ```
//!
//! Running out of buffered bytes in any state is the idle condition, not an
//! error: the next [`Parser::push`] resumes where the stream left off. Every
//! CRC failure advances the read cursor by exactly one byte, so a false
//! start-of-frame inside corrupt data never hides a real frame behind it.

use crate::error::Error;
use crate::packet::Packet;
use crate::pool::MemoryPool;
use crate::registry::PacketSet;
use crate::ring::RingBuffer;
use crate::{CRC16, CRC8, FRAME_HEADER_LEN, FRAME_TAIL_LEN, SOF_BYTE};

/// Counters for conditions the parser absorbs silently.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParserStats {
    /// Frames validated and committed to the pool.
    pub frames_committed: u32,
    /// CRC-valid frames dropped because their command is not registered.
    pub frames_unknown_cmd: u32,
    /// Bytes discarded while resynchronising.
    pub bytes_skipped: u32,
}

/// What the scan decided to do with the bytes at the read cursor.
enum Scan {
    /// A complete valid frame sits at the read cursor.
    Frame { cmd: u16, len: usize },
    /// Discard this many bytes and look again.
    Skip(usize),
    /// Nothing more can happen without additional input.
    NeedMore,
}

/// Streaming parser for a packet set `S`.
///
/// `P` is the pool capacity (`S::POOL_SIZE`) and `R` the ring capacity, which
/// must be a power of two holding at least two maximum-size frames —
/// `S::RING_SIZE` is the recommended value. The parser owns both buffers and
/// never allocates.
///
/// ```ignore
/// let mut parser: Parser<VehicleLink, { VehicleLink::POOL_SIZE }, { VehicleLink::RING_SIZE }> =
///     Parser::new(MemoryPool::new());
/// parser.push(&chunk)?;
/// let attitude = parser.pool().read::<Attitude>();
/// ```
pub struct Parser<S: PacketSet, const P: usize, const R: usize> {
    ring: RingBuffer<R>,
    pool: MemoryPool<S, P>,
    stats: ParserStats,
}

impl<S: PacketSet, const P: usize, const R: usize> Parser<S, P, R> {
    const RING_OK: () = assert!(
        R.is_power_of_two() && R >= 2 * S::MAX_FRAME_SIZE,
        "ring capacity must be a power of two holding at least two max-size frames",
    );

    pub const fn new(pool: MemoryPool<S, P>) -> Self {
        let () = Self::RING_OK;
        Self {
            ring: RingBuffer::new(),
            pool,
            stats: ParserStats {
                frames_committed: 0,
                frames_unknown_cmd: 0,
                bytes_skipped: 0,
            },
        }
    }

    /// Appends `bytes` to the ring buffer and extracts every complete frame.
    ///
    /// Fails with [`Error::BufferOverflow`] (nothing appended) when the bytes
    /// do not fit; the producer must drain or push smaller chunks. Corrupt or
    /// unknown frames are absorbed silently — see [`Parser::stats`].
    pub fn push(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.ring.write(bytes)?;
        self.drain_frames()
    }

    /// Zero-copy write grant into the ring buffer, for DMA-style producers.
    /// Fill a prefix, then call [`Parser::advance_write`].
    pub fn write_buffer(&mut self) -> &mut [u8] {
        self.ring.contiguous_writable()
    }

    /// Publishes `n` bytes written through [`Parser::write_buffer`] and
    /// extracts every complete frame.
    pub fn advance_write(&mut self, n: usize) -> Result<(), Error> {
        self.ring.commit(n)?;
        self.drain_frames()
    }

    /// Drops all buffered bytes, abandoning any partially received frame.
    pub fn clear(&mut self) {
        self.ring.clear();
    }

    /// Bytes buffered but not yet consumed by frame extraction.
    pub fn occupancy(&self) -> usize {
        self.ring.occupancy()
    }

    /// Bytes the ring buffer can still accept.
    pub fn free_space(&self) -> usize {
        self.ring.free_space()
    }

    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// The memory pool holding the latest payload of each command.
    pub fn pool(&self) -> &MemoryPool<S, P> {
        &self.pool
    }

    /// Convenience for `pool().read::<T>()`.
    pub fn read<T: Packet>(&self) -> T {
        self.pool.read()
    }

    pub fn stats(&self) -> ParserStats {
        self.stats
    }

    /// Greedily extracts frames until the buffer runs dry or holds only an
    /// incomplete tail.
    fn drain_frames(&mut self) -> Result<(), Error> {
        while self.ring.occupancy() >= FRAME_HEADER_LEN {
            match self.scan()? {
                Scan::NeedMore => break,
                Scan::Skip(n) => {
                    self.ring.discard(n).map_err(|_| Error::InternalError)?;
                    self.stats.bytes_skipped = self.stats.bytes_skipped.wrapping_add(n as u32);
                }
                Scan::Frame { cmd, len } => self.commit_frame(cmd, len)?,
            }
        }
        Ok(())
    }

    /// Examines the bytes at the read cursor and decides the next step.
    /// Never mutates the ring, so the borrow story stays simple: decisions
    /// here, cursor movement in [`Parser::drain_frames`].
    fn scan(&self) -> Result<Scan, Error> {
        let occupancy = self.ring.occupancy();

        // Synchronise on the first SOF. Without one, everything but the last
        // byte is noise; that byte may still begin a frame the next chunk
        // completes.
        let Some(sof) = self.ring.find_byte(SOF_BYTE) else {
            return Ok(Scan::Skip(occupancy - 1));
        };
        if sof > 0 {
            return Ok(Scan::Skip(sof));
        }

        let view = self.ring.contiguous_readable();
        let mut header_scratch = [0u8; FRAME_HEADER_LEN];
        let header: &[u8] = if view.len() >= FRAME_HEADER_LEN {
            &view[..FRAME_HEADER_LEN]
        } else {
            self.ring
                .peek(&mut header_scratch, 0)
                .map_err(|_| Error::InternalError)?;
            &header_scratch
        };

        if CRC8.checksum(&header[..FRAME_HEADER_LEN - 1]) != header[FRAME_HEADER_LEN - 1] {
            return Ok(Scan::Skip(1));
        }

        let cmd = u16::from_le_bytes([header[1], header[2]]);
        let len = u16::from_le_bytes([header[3], header[4]]) as usize;
        let frame_len = FRAME_HEADER_LEN + len + FRAME_TAIL_LEN;

        // A CRC-8-valid header can still be noise. Reject lengths no frame in
        // the set can carry, and known commands whose length disagrees with
        // the registered payload size.
        if frame_len > S::MAX_FRAME_SIZE {
            return Ok(Scan::Skip(1));
        }
        if let Some(size) = S::size_of(cmd) {
            if len != size {
                return Ok(Scan::Skip(1));
            }
        }

        if occupancy < frame_len {
            return Ok(Scan::NeedMore);
        }

        let body_len = FRAME_HEADER_LEN + len;
        let crc = if view.len() >= body_len {
            // Fast path: the whole body is physically contiguous.
            CRC16.checksum(&view[..body_len])
        } else {
            // Slow path: the frame straddles the wrap. CCITT-FALSE has no
            // output reflection and zero xor-out, so the running value of the
            // first segment seeds the second; `Digest` carries it across.
            let (head, tail) = self.ring.as_slices();
            let mut digest = CRC16.digest();
            digest.update(&head[..head.len().min(body_len)]);
            if body_len > head.len() {
                digest.update(&tail[..body_len - head.len()]);
            }
            digest.finalize()
        };

        let mut tail_bytes = [0u8; FRAME_TAIL_LEN];
        self.ring
            .peek(&mut tail_bytes, body_len)
            .map_err(|_| Error::InternalError)?;
        if crc != u16::from_le_bytes(tail_bytes) {
            return Ok(Scan::Skip(1));
        }

        Ok(Scan::Frame { cmd, len })
    }

    /// Copies a validated frame's payload into its slot and removes the frame
    /// from the ring. Unknown commands are consumed without a copy.
    fn commit_frame(&mut self, cmd: u16, len: usize) -> Result<(), Error> {
        let Self {
            ring, pool, stats, ..
        } = self;

        if let Some(slot) = pool.slot_mut(cmd) {
            ring.peek(slot, FRAME_HEADER_LEN)
                .map_err(|_| Error::InternalError)?;
            stats.frames_committed = stats.frames_committed.wrapping_add(1);
        } else {
            stats.frames_unknown_cmd = stats.frames_unknown_cmd.wrapping_add(1);
        }

        ring.discard(FRAME_HEADER_LEN + len + FRAME_TAIL_LEN)
            .map_err(|_| Error::InternalError)
    }
}
