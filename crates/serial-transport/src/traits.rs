use crate::Result;

/// A minimal blocking serial link.
///
/// The OI protocol is strictly request/response over one connection, so the
/// trait is deliberately synchronous: one writer, bounded reads, no
/// buffering promises beyond what the backend's timeout provides.
pub trait SerialLink {
    /// Write all bytes to the device.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;

    /// Read up to `max` bytes, blocking no longer than the link's configured
    /// timeout. Returns fewer bytes (possibly none) if the timeout elapses
    /// first; a short return is not an error at this layer.
    fn read(&mut self, max: usize) -> Result<Vec<u8>>;

    /// Discard any bytes the device has already sent but the host has not
    /// read.
    fn flush_input(&mut self) -> Result<()>;

    /// Drive the out-of-band wake line (RTS on real hardware).
    fn set_wake_line(&mut self, asserted: bool) -> Result<()>;
}
