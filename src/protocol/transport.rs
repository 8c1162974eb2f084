use std::io::{self, Read, Write};
use std::net::SocketAddr;

use log::trace;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to connect to {addr}: {source}")]
    Connect { addr: SocketAddr, source: io::Error },
    #[error("request of {size} bytes does not fit a u32 frame header")]
    FrameTooLarge { size: usize },
    #[error("connection closed after {received} of {expected} expected bytes")]
    Truncated { expected: usize, received: usize },
    #[error("transport IO error: {0}")]
    Io(#[from] io::Error),
}

/// One framed request/response exchange over a bidirectional stream.
///
/// Both directions carry a 4-byte big-endian payload length followed by the
/// payload. The transport is generic over the stream so TCP in production
/// and in-memory buffers in tests go through the same code.
pub struct FrameTransport<T: Read + Write> {
    stream: T,
}

impl<T: Read + Write> FrameTransport<T> {
    pub fn new(stream: T) -> Self {
        Self { stream }
    }

    /// Sends one framed request and blocks until the complete framed
    /// response has arrived.
    pub fn round_trip(&mut self, request: &[u8]) -> Result<Vec<u8>, TransportError> {
        self.write_frame(request)?;
        self.read_frame()
    }

    fn write_frame(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        let size = u32::try_from(payload.len()).map_err(|_| TransportError::FrameTooLarge {
            size: payload.len(),
        })?;
        self.stream.write_all(&size.to_be_bytes())?;
        self.stream.write_all(payload)?;
        self.stream.flush()?;
        trace!("sent frame of {size} bytes");
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut header = [0u8; 4];
        read_full(&mut self.stream, &mut header)?;
        let size = u32::from_be_bytes(header) as usize;

        let mut payload = vec![0u8; size];
        read_full(&mut self.stream, &mut payload)?;
        trace!("received frame of {size} bytes");
        Ok(payload)
    }
}

/// Reads until `buf` is full, looping over partial reads. A stream that ends
/// early yields [`TransportError::Truncated`] with byte counts rather than a
/// short buffer.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), TransportError> {
    let mut received = 0;
    while received < buf.len() {
        match reader.read(&mut buf[received..]) {
            Ok(0) => {
                return Err(TransportError::Truncated {
                    expected: buf.len(),
                    received,
                });
            }
            Ok(n) => received += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
