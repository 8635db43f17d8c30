use crate::{Result, SerialLink, TransportError};
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{Read, Write};
use std::time::Duration;

/// Raw UART link over a native serial port (8N1, no flow control).
pub struct UartLink {
    port: Box<dyn SerialPort>,
}

impl UartLink {
    /// Open a serial port with the same read and write timeout. The OI link
    /// runs 8 data bits, no parity, one stop bit, no flow control.
    pub fn open(path: &str, baud: u32, timeout: Duration) -> Result<Self> {
        let port = serialport::new(path, baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(timeout)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => TransportError::PortNotFound(path.to_string()),
                _ => TransportError::Io(e.to_string()),
            })?;
        tracing::debug!(path, baud, "opened serial port");
        Ok(Self { port })
    }
}

impl SerialLink for UartLink {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.port
            .write_all(bytes)
            .map_err(|e| TransportError::Io(e.to_string()))
    }

    fn read(&mut self, max: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(max);
        let mut buf = [0u8; 256];
        while out.len() < max {
            let want = (max - out.len()).min(buf.len());
            match self.port.read(&mut buf[..want]) {
                Ok(0) => break,
                Ok(n) => out.extend_from_slice(&buf[..n]),
                // Partial data on timeout is a valid short read
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => break,
                Err(e) => return Err(TransportError::Io(e.to_string())),
            }
        }
        Ok(out)
    }

    fn flush_input(&mut self) -> Result<()> {
        self.port
            .clear(ClearBuffer::Input)
            .map_err(|e| TransportError::Io(e.to_string()))
    }

    fn set_wake_line(&mut self, asserted: bool) -> Result<()> {
        self.port
            .write_request_to_send(asserted)
            .map_err(|e| TransportError::Io(e.to_string()))
    }
}
