use snafu::Snafu;

/// Errors reported by the codec.
///
/// Only [`Error::BufferOverflow`] is expected in normal operation: the parser
/// absorbs corrupt input silently (resynchronising instead of failing), so
/// bad checksums and stray bytes never surface here. The remaining kinds are
/// either produced by the lower-level [`RingBuffer`](crate::RingBuffer)
/// operations or reserved for future API extensions.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The ring buffer or a caller-provided output buffer is too small.
    #[snafu(display("buffer overflow: not enough free space for the data"))]
    BufferOverflow,
    /// A read, peek or discard reached past the buffered data.
    #[snafu(display("insufficient buffered data for the operation"))]
    InsufficientData,
    /// No start-of-frame byte in the buffered data.
    #[snafu(display("no frame header found"))]
    NoFrameHeader,
    /// A frame header failed validation.
    #[snafu(display("invalid frame header"))]
    InvalidFrameHeader,
    /// A frame checksum did not match.
    #[snafu(display("frame CRC mismatch"))]
    CrcMismatch,
    /// An internal invariant was violated. Reaching this is a bug.
    #[snafu(display("internal parser invariant violated"))]
    InternalError,
    /// The command id is not part of the registered packet set.
    #[snafu(display("command id is not registered"))]
    InvalidCommand,
}
