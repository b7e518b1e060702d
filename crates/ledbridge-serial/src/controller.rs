//! Connection lifecycle and high-level LED verbs.

use crate::request::{select_operation, LedRequest};
use crate::transport::Transport;
use crate::{Error, Result};
use ledbridge_proto::{
    encode, Encoded, Operation, ProtocolVariant, Rgb, DEFAULT_BLINK_INTERVAL_MS,
    DEFAULT_RAINBOW_INTERVAL_MS,
};
use tracing::{debug, warn};

/// Connection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// LED strip controller.
///
/// Owns the transport connection exclusively. Every verb requires a prior
/// `connect()`; `disconnect()` is idempotent and safe from any state.
pub struct Controller<T: Transport> {
    transport: T,
    port_path: String,
    baud_rate: u32,
    variant: ProtocolVariant,
    conn: Option<T::Conn>,
    state: ConnectionState,
}

impl<T: Transport> Controller<T> {
    pub fn new(transport: T, port_path: &str, baud_rate: u32, variant: ProtocolVariant) -> Self {
        Self {
            transport,
            port_path: port_path.to_string(),
            baud_rate,
            variant,
            conn: None,
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Opens the transport connection. A no-op when already connected.
    pub async fn connect(&mut self) -> Result<()> {
        if self.state == ConnectionState::Connected {
            return Ok(());
        }
        self.state = ConnectionState::Connecting;
        match self.transport.open(&self.port_path, self.baud_rate).await {
            Ok(conn) => {
                self.conn = Some(conn);
                self.state = ConnectionState::Connected;
                debug!("Connected to {}", self.port_path);
                Ok(())
            }
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                Err(e)
            }
        }
    }

    /// Closes the connection. Safe to call repeatedly or while disconnected.
    pub async fn disconnect(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            self.transport.close(conn).await?;
            debug!("Disconnected from {}", self.port_path);
        }
        self.state = ConnectionState::Disconnected;
        Ok(())
    }

    /// Encodes one operation and writes the wire line to the transport.
    /// Returns the encoded command that was written, plus any advisory.
    async fn send(&mut self, op: Operation) -> Result<Encoded> {
        let conn = self.conn.as_mut().ok_or(Error::NotConnected)?;
        let encoded = encode(op, self.variant);
        if let Some(advisory) = encoded.advisory {
            warn!("{}", advisory);
        }
        self.transport
            .write_line(conn, &encoded.command.wire_line())
            .await?;
        debug!("Sent command: {}", encoded.command);
        Ok(encoded)
    }

    pub async fn turn_on(&mut self) -> Result<Encoded> {
        self.send(Operation::On).await
    }

    pub async fn turn_off(&mut self) -> Result<Encoded> {
        self.send(Operation::Off).await
    }

    pub async fn set_color(&mut self, color: Rgb) -> Result<Encoded> {
        self.send(Operation::Color(color)).await
    }

    pub async fn blink(&mut self, color: Rgb, interval_ms: Option<i64>) -> Result<Encoded> {
        let interval = interval_ms.unwrap_or(DEFAULT_BLINK_INTERVAL_MS);
        self.send(Operation::Blink(color, interval)).await
    }

    pub async fn blink2_colors(
        &mut self,
        color1: Rgb,
        color2: Rgb,
        interval_ms: Option<i64>,
    ) -> Result<Encoded> {
        let interval = interval_ms.unwrap_or(DEFAULT_BLINK_INTERVAL_MS);
        self.send(Operation::Blink2(color1, color2, interval)).await
    }

    pub async fn rainbow(&mut self, interval_ms: Option<i64>) -> Result<Encoded> {
        let interval = interval_ms.unwrap_or(DEFAULT_RAINBOW_INTERVAL_MS);
        self.send(Operation::Rainbow(interval)).await
    }

    /// Selects one operation from the request by priority and sends it.
    pub async fn dispatch(&mut self, req: &LedRequest) -> Result<Encoded> {
        let op = select_operation(req)?;
        self.send(op).await
    }

    /// Connects, dispatches the request, and always disconnects.
    ///
    /// On the success path a disconnect failure surfaces to the caller. When
    /// dispatch itself failed, teardown is best-effort and its error is only
    /// logged, so the original failure is the one reported.
    pub async fn run(mut self, req: &LedRequest) -> Result<Encoded> {
        self.connect().await?;
        match self.dispatch(req).await {
            Ok(encoded) => {
                self.disconnect().await?;
                Ok(encoded)
            }
            Err(e) => {
                if let Err(close_err) = self.disconnect().await {
                    warn!("Disconnect after failure also failed: {}", close_err);
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records written lines and close calls; optionally fails writes.
    #[derive(Default, Clone)]
    struct MockTransport {
        lines: Rc<RefCell<Vec<String>>>,
        closes: Rc<RefCell<u32>>,
        fail_writes: bool,
    }

    struct MockConn;

    impl Transport for MockTransport {
        type Conn = MockConn;

        async fn open(&self, _path: &str, _baud_rate: u32) -> Result<MockConn> {
            Ok(MockConn)
        }

        async fn write_line(&self, _conn: &mut MockConn, line: &str) -> Result<()> {
            if self.fail_writes {
                return Err(Error::WriteFailed(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "mock write failure",
                )));
            }
            self.lines.borrow_mut().push(line.to_string());
            Ok(())
        }

        async fn close(&self, _conn: MockConn) -> Result<()> {
            *self.closes.borrow_mut() += 1;
            Ok(())
        }
    }

    fn controller(transport: MockTransport) -> Controller<MockTransport> {
        Controller::new(transport, "/dev/ttyMOCK", 9600, ProtocolVariant::RichColor)
    }

    fn red() -> Rgb {
        ledbridge_proto::parse_color("red").unwrap()
    }

    #[tokio::test]
    async fn test_verbs_require_connection() {
        let mut ctl = controller(MockTransport::default());
        assert!(matches!(ctl.turn_on().await, Err(Error::NotConnected)));
        assert!(matches!(
            ctl.set_color(red()).await,
            Err(Error::NotConnected)
        ));
        assert_eq!(ctl.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_connect_then_send() {
        let transport = MockTransport::default();
        let mut ctl = controller(transport.clone());
        ctl.connect().await.unwrap();
        assert_eq!(ctl.state(), ConnectionState::Connected);

        ctl.turn_on().await.unwrap();
        ctl.blink(red(), Some(1000)).await.unwrap();
        assert_eq!(
            *transport.lines.borrow(),
            vec!["ON\n".to_string(), "BLINK1,255,0,0,1000\n".to_string()]
        );
    }

    #[tokio::test]
    async fn test_disconnect_idempotent() {
        let transport = MockTransport::default();
        let mut ctl = controller(transport.clone());
        ctl.disconnect().await.unwrap();
        ctl.connect().await.unwrap();
        ctl.disconnect().await.unwrap();
        ctl.disconnect().await.unwrap();
        assert_eq!(*transport.closes.borrow(), 1);
        assert_eq!(ctl.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_run_dispatches_by_priority() {
        let transport = MockTransport::default();
        let req = LedRequest {
            on: true,
            color: Some(red()),
            ..Default::default()
        };
        let encoded = controller(transport.clone()).run(&req).await.unwrap();
        assert_eq!(encoded.command.to_line(), "ON");
        assert_eq!(*transport.lines.borrow(), vec!["ON\n".to_string()]);
        assert_eq!(*transport.closes.borrow(), 1);
    }

    #[tokio::test]
    async fn test_run_blink_beats_color() {
        let transport = MockTransport::default();
        let req = LedRequest {
            blink: true,
            color: Some(red()),
            ..Default::default()
        };
        let encoded = controller(transport.clone()).run(&req).await.unwrap();
        let lines = transport.lines.borrow();
        assert!(lines[0].starts_with("BLINK"));
        // The returned command is the line that actually went out.
        assert_eq!(encoded.command.wire_line(), lines[0]);
    }

    #[tokio::test]
    async fn test_run_disconnects_after_failure() {
        let transport = MockTransport {
            fail_writes: true,
            ..Default::default()
        };
        let req = LedRequest {
            on: true,
            ..Default::default()
        };
        let result = controller(transport.clone()).run(&req).await;
        assert!(matches!(result, Err(Error::WriteFailed(_))));
        // Teardown still ran.
        assert_eq!(*transport.closes.borrow(), 1);
    }

    #[tokio::test]
    async fn test_digital_advisory_returned() {
        let transport = MockTransport::default();
        let mut ctl = Controller::new(
            transport.clone(),
            "/dev/ttyMOCK",
            9600,
            ProtocolVariant::DigitalOnOff,
        );
        ctl.connect().await.unwrap();
        let encoded = ctl.set_color(red()).await.unwrap();
        assert_eq!(
            encoded.advisory,
            Some(ledbridge_proto::Advisory::ColorIgnored)
        );
        assert_eq!(encoded.command.to_line(), "ON");
        assert_eq!(*transport.lines.borrow(), vec!["ON\n".to_string()]);
    }
}
