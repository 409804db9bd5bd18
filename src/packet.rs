use bytemuck::Pod;

/// A fixed-layout payload that can travel inside a rovlink frame.
///
/// Implementors are plain-old-data structs whose in-memory representation is
/// the wire representation: declare them `#[repr(C, packed)]` with
/// little-endian-native scalar fields and derive [`Pod`] and
/// [`Zeroable`](bytemuck::Zeroable). The payload is copied to and from the
/// frame byte-for-byte, so any internal padding would leak onto the wire —
/// `packed` rules it out.
///
/// ```
/// use bytemuck::{Pod, Zeroable};
/// use rovlink::Packet;
///
/// #[repr(C, packed)]
/// #[derive(Debug, Clone, Copy, Pod, Zeroable)]
/// struct Attitude {
///     roll: f32,
///     pitch: f32,
///     yaw: f32,
/// }
///
/// impl Packet for Attitude {
///     const CMD: u16 = 0x0201;
/// }
///
/// assert_eq!(Attitude::SIZE, 12);
/// ```
pub trait Packet: Pod {
    /// Command id carried in the frame header. Must be unique within a
    /// [`PacketSet`](crate::PacketSet).
    const CMD: u16;

    /// Payload size on the wire.
    const SIZE: usize = core::mem::size_of::<Self>();
}
