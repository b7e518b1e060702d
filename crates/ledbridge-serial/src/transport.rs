//! Serial transport abstraction and the tokio-serial implementation.

use crate::{Error, Result};
use tokio::io::AsyncWriteExt;
use tokio_serial::{DataBits, Parity, SerialPortBuilderExt, SerialStream, StopBits};
use tracing::debug;

/// Default baud rate; the firmware opens its serial port at 9600.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Transport over which newline-terminated command lines are written.
///
/// One connect, many writes, one close. Incoming data is not read here;
/// response validation belongs to a higher layer.
#[allow(async_fn_in_trait)]
pub trait Transport {
    type Conn;

    async fn open(&self, path: &str, baud_rate: u32) -> Result<Self::Conn>;
    async fn write_line(&self, conn: &mut Self::Conn, line: &str) -> Result<()>;
    async fn close(&self, conn: Self::Conn) -> Result<()>;
}

/// Real serial transport (8N1).
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialTransport;

impl Transport for SerialTransport {
    type Conn = SerialStream;

    async fn open(&self, path: &str, baud_rate: u32) -> Result<SerialStream> {
        let port = tokio_serial::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .open_native_async()
            .map_err(|e| {
                if let tokio_serial::ErrorKind::Io(kind) = &e.kind {
                    if (*kind == std::io::ErrorKind::NotFound
                        || *kind == std::io::ErrorKind::PermissionDenied)
                        && !std::path::Path::new(path).exists()
                    {
                        return Error::PortNotFound(path.to_string());
                    }
                }
                Error::Serial(e)
            })?;
        debug!("Opened serial port {} at {} baud", path, baud_rate);
        Ok(port)
    }

    async fn write_line(&self, conn: &mut SerialStream, line: &str) -> Result<()> {
        conn.write_all(line.as_bytes()).await?;
        conn.flush().await?;
        Ok(())
    }

    async fn close(&self, mut conn: SerialStream) -> Result<()> {
        conn.shutdown().await?;
        Ok(())
    }
}
