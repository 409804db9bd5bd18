//! Latest-value memory pool.
//!
//! One byte slot per registered command, laid out by the
//! [`PacketSet`](crate::PacketSet) layout rules. The parser overwrites a slot
//! every time a valid frame for its command arrives; the application samples
//! whichever slots it cares about. Only "latest" survives — there is no
//! queueing.

use core::marker::PhantomData;

use crate::packet::Packet;
use crate::registry::{is_member, slot_of, PacketSet};

// Keeps every slot's natural alignment (up to 8) valid regardless of where
// the pool itself is placed.
#[repr(C, align(8))]
struct PoolBytes<const N: usize>([u8; N]);

pub struct MemoryPool<S: PacketSet, const N: usize> {
    bytes: PoolBytes<N>,
    _set: PhantomData<S>,
}

impl<S: PacketSet, const N: usize> Default for MemoryPool<S, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PacketSet, const N: usize> MemoryPool<S, N> {
    const CAPACITY_OK: () = assert!(
        N == S::POOL_SIZE,
        "pool capacity must equal `PacketSet::POOL_SIZE`",
    );

    /// Creates a zero-initialised pool.
    pub const fn new() -> Self {
        let () = Self::CAPACITY_OK;
        Self {
            bytes: PoolBytes([0; N]),
            _set: PhantomData,
        }
    }

    /// Writable slot for a command id, exactly the registered payload size.
    /// `None` for commands outside the set.
    pub fn slot_mut(&mut self, cmd: u16) -> Option<&mut [u8]> {
        let (offset, size) = crate::registry::find_slot(S::DESCRIPTORS, cmd)?;
        Some(&mut self.bytes.0[offset..offset + size])
    }

    /// By-value copy of the `T` slot.
    pub fn read<T: Packet>(&self) -> T {
        *self.read_ref()
    }

    /// Zero-copy view of the `T` slot.
    ///
    /// Not thread-safe: a producer committing a frame for the same command
    /// concurrently can tear the value. Under the cooperative single-threaded
    /// model this cannot happen; anything else needs external
    /// synchronisation.
    pub fn read_ref<T: Packet>(&self) -> &T {
        const {
            assert!(
                is_member::<S, T>(),
                "packet type is not a member of this packet set",
            );
        }
        let offset = const { slot_of::<S, T>() };
        bytemuck::from_bytes(&self.bytes.0[offset..offset + core::mem::size_of::<T>()])
    }

    /// The whole pool as raw bytes, slots and padding included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes.0
    }
}
