/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Blocking TCP connection to a FIX counterparty.
//!
//! Connecting retries with exponential backoff up to a fixed attempt budget.
//! Any read or write failure, including an orderly close by the peer, drops
//! the socket so the caller can reconnect on the next operation.

use crate::codec::FrameBuffer;
use bytes::BytesMut;
use fixline_core::error::TransportError;
use fixline_tagvalue::display_frame;
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Smallest read timeout handed to the socket; zero would mean "block forever".
const MIN_READ_TIMEOUT: Duration = Duration::from_millis(1);

/// Smallest connect timeout; `connect_timeout` rejects zero.
const MIN_CONNECT_TIMEOUT: Duration = Duration::from_millis(1);

/// Retry budget and backoff for connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Attempts per connect cycle.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound for any delay.
    pub max_delay: Duration,
}

impl ReconnectPolicy {
    /// Creates a new policy.
    #[must_use]
    pub const fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
        }
    }

    /// Returns the delay to wait after failed attempt number `attempt` (1-based).
    ///
    /// `base_delay * 2^(attempt - 1)`, capped at `max_delay`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        self.base_delay
            .checked_mul(1u32 << exp)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(5), Duration::from_secs(60))
    }
}

/// A blocking TCP connection with inbound framing.
#[derive(Debug)]
pub struct TcpConnection {
    /// Counterparty address, `host:port`.
    addr: String,
    /// Timeout for a single connect attempt.
    connect_timeout: Duration,
    /// Retry budget.
    policy: ReconnectPolicy,
    /// Bytes requested per read.
    read_buffer_size: usize,
    /// Open socket, if any.
    stream: Option<TcpStream>,
    /// Inbound bytes awaiting a complete frame.
    frames: FrameBuffer,
    /// Failed attempts in the current connect cycle.
    reconnect_attempts: u32,
}

impl TcpConnection {
    /// Creates an unconnected transport for `addr`.
    #[must_use]
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout: Duration::from_secs(10),
            policy: ReconnectPolicy::default(),
            read_buffer_size: 4096,
            stream: None,
            frames: FrameBuffer::new(),
            reconnect_attempts: 0,
        }
    }

    /// Sets the per-attempt connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the reconnect policy.
    #[must_use]
    pub const fn with_reconnect_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the number of bytes requested per read.
    #[must_use]
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    /// Sets the inbound size limit.
    #[must_use]
    pub fn with_max_message_size(mut self, size: usize) -> Self {
        self.frames = FrameBuffer::with_max_message_size(size);
        self
    }

    /// Returns the counterparty address.
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Returns true if a socket is open.
    #[inline]
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Returns the failed attempts of the last connect cycle.
    #[inline]
    #[must_use]
    pub const fn reconnect_attempts(&self) -> u32 {
        self.reconnect_attempts
    }

    /// Opens a fresh connection, retrying per the reconnect policy.
    ///
    /// Any previous socket is closed first. Each call starts a new attempt
    /// budget; success resets the attempt counter.
    ///
    /// # Errors
    /// Returns `TransportError::ConnectFailed` once every attempt has failed.
    pub fn connect(&mut self) -> Result<(), TransportError> {
        self.connect_cycle(None)
    }

    /// Like [`connect`](Self::connect), but gives up at `deadline`.
    ///
    /// Connect timeouts and backoff sleeps are clamped to the time left, so
    /// the call returns no later than `deadline` plus one minimal attempt.
    ///
    /// # Errors
    /// Returns `TransportError::ConnectFailed` once every attempt has failed
    /// or the deadline has passed.
    pub fn connect_before(&mut self, deadline: Instant) -> Result<(), TransportError> {
        self.connect_cycle(Some(deadline))
    }

    fn connect_cycle(&mut self, deadline: Option<Instant>) -> Result<(), TransportError> {
        self.close_stream();
        self.reconnect_attempts = 0;
        let max_attempts = self.policy.max_attempts.max(1);
        let remaining = |deadline: Option<Instant>| {
            deadline.map(|d| d.saturating_duration_since(Instant::now()))
        };

        loop {
            let timeout = match remaining(deadline) {
                Some(left) => self.connect_timeout.min(left).max(MIN_CONNECT_TIMEOUT),
                None => self.connect_timeout,
            };
            match self.try_connect(timeout) {
                Ok(stream) => {
                    info!(addr = %self.addr, "connected");
                    self.stream = Some(stream);
                    self.reconnect_attempts = 0;
                    return Ok(());
                }
                Err(err) => {
                    self.reconnect_attempts += 1;
                    let left = remaining(deadline);
                    let expired = left.is_some_and(|left| left.is_zero());
                    if self.reconnect_attempts >= max_attempts || expired {
                        error!(
                            addr = %self.addr,
                            attempts = self.reconnect_attempts,
                            error = %err,
                            "giving up on connection"
                        );
                        return Err(TransportError::ConnectFailed {
                            attempts: self.reconnect_attempts,
                            reason: err.to_string(),
                        });
                    }
                    let backoff = self.policy.delay_for(self.reconnect_attempts);
                    let delay = left.map_or(backoff, |left| backoff.min(left));
                    warn!(
                        addr = %self.addr,
                        attempt = self.reconnect_attempts,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "connect failed, retrying"
                    );
                    thread::sleep(delay);
                }
            }
        }
    }

    fn try_connect(&self, timeout: Duration) -> io::Result<TcpStream> {
        let addrs: Vec<SocketAddr> = self.addr.to_socket_addrs()?.collect();
        let mut last_err = io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no address resolved for {}", self.addr),
        );
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => {
                    stream.set_nodelay(true)?;
                    return Ok(stream);
                }
                Err(err) => last_err = err,
            }
        }
        Err(last_err)
    }

    /// Writes a complete frame.
    ///
    /// # Errors
    /// Returns `TransportError::NotConnected` without a socket, or the I/O
    /// failure, after which the connection is closed.
    pub fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;
        let written = stream.write_all(frame).and_then(|()| stream.flush());
        if let Err(err) = written {
            warn!(addr = %self.addr, error = %err, "write failed");
            self.disconnect();
            return Err(err.into());
        }
        debug!(frame = %display_frame(frame), "sent");
        Ok(())
    }

    /// Returns the next inbound frame, waiting at most `wait` for data.
    ///
    /// Performs at most one socket read. When the read times out, bytes
    /// still buffered without a checksum trailer are returned as a frame.
    /// `Ok(None)` means nothing arrived in time.
    ///
    /// # Errors
    /// Returns `TransportError::NotConnected` without a socket,
    /// `TransportError::Closed` when the peer closed the connection, or the
    /// I/O failure. The connection is closed in the latter two cases.
    pub fn receive(&mut self, wait: Duration) -> Result<Option<BytesMut>, TransportError> {
        if let Some(frame) = self.frames.next_frame() {
            return Ok(Some(frame));
        }

        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;
        let mut buf = vec![0u8; self.read_buffer_size];
        let read = stream
            .set_read_timeout(Some(wait.max(MIN_READ_TIMEOUT)))
            .and_then(|()| stream.read(&mut buf));

        match read {
            Ok(0) => {
                info!(addr = %self.addr, "connection closed by peer");
                self.disconnect();
                Err(TransportError::Closed)
            }
            Ok(n) => {
                self.frames.extend(&buf[..n]);
                let frame = self.frames.next_frame();
                if let Some(frame) = &frame {
                    debug!(frame = %display_frame(frame), "received");
                }
                Ok(frame)
            }
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
                ) =>
            {
                let partial = self.frames.take_partial();
                if let Some(frame) = &partial {
                    debug!(frame = %display_frame(frame), "received without trailer");
                }
                Ok(partial)
            }
            Err(err) => {
                warn!(addr = %self.addr, error = %err, "read failed");
                self.disconnect();
                Err(err.into())
            }
        }
    }

    /// Closes the connection, if open, and discards buffered input.
    pub fn disconnect(&mut self) {
        if self.close_stream() {
            info!(addr = %self.addr, "disconnected");
        }
    }

    fn close_stream(&mut self) -> bool {
        self.frames.clear();
        match self.stream.take() {
            Some(stream) => {
                let _ = stream.shutdown(Shutdown::Both);
                true
            }
            None => false,
        }
    }
}

impl Drop for TcpConnection {
    fn drop(&mut self) {
        self.close_stream();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    fn fast_policy(attempts: u32) -> ReconnectPolicy {
        ReconnectPolicy::new(attempts, Duration::from_millis(1), Duration::from_millis(5))
    }

    fn closed_port() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        addr.to_string()
    }

    #[test]
    fn test_delay_for_backoff() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(5));
        assert_eq!(policy.delay_for(2), Duration::from_secs(10));
        assert_eq!(policy.delay_for(3), Duration::from_secs(20));
        assert_eq!(policy.delay_for(4), Duration::from_secs(40));
        assert_eq!(policy.delay_for(5), Duration::from_secs(60));
        assert_eq!(policy.delay_for(40), Duration::from_secs(60));
    }

    #[test]
    fn test_connect_failure_exhausts_attempts() {
        let mut conn = TcpConnection::new(closed_port())
            .with_connect_timeout(Duration::from_millis(200))
            .with_reconnect_policy(fast_policy(3));

        let err = conn.connect().unwrap_err();
        assert!(matches!(err, TransportError::ConnectFailed { attempts: 3, .. }));
        assert!(!conn.is_connected());
        assert_eq!(conn.reconnect_attempts(), 3);

        // A new cycle gets a fresh budget.
        let err = conn.connect().unwrap_err();
        assert!(matches!(err, TransportError::ConnectFailed { attempts: 3, .. }));
    }

    #[test]
    fn test_send_without_connection() {
        let mut conn = TcpConnection::new("127.0.0.1:1");
        assert_eq!(conn.send(b"35=0").unwrap_err(), TransportError::NotConnected);
        assert_eq!(
            conn.receive(Duration::from_millis(1)).unwrap_err(),
            TransportError::NotConnected
        );
    }

    #[test]
    fn test_send_receive_and_peer_close() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let peer = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 64];
            let n = stream.read(&mut buf).unwrap();
            assert_eq!(&buf[..n], b"35=0\x0110=001\x01");
            stream.write_all(b"35=0\x0110=001\x0135=1\x01").unwrap();
            stream.write_all(b"10=002\x01").unwrap();
        });

        let mut conn = TcpConnection::new(addr.to_string()).with_reconnect_policy(fast_policy(1));
        conn.connect().unwrap();
        assert!(conn.is_connected());
        assert_eq!(conn.reconnect_attempts(), 0);

        conn.send(b"35=0\x0110=001\x01").unwrap();

        let mut frames = Vec::new();
        while frames.len() < 2 {
            if let Some(frame) = conn.receive(Duration::from_secs(2)).unwrap() {
                frames.push(frame);
            }
        }
        assert_eq!(&frames[0][..], b"35=0\x0110=001\x01");
        assert_eq!(&frames[1][..], b"35=1\x0110=002\x01");

        peer.join().unwrap();
        let err = conn.receive(Duration::from_secs(2)).unwrap_err();
        assert_eq!(err, TransportError::Closed);
        assert!(!conn.is_connected());
    }

    #[test]
    fn test_receive_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let mut conn = TcpConnection::new(addr.to_string());
        conn.connect().unwrap();
        let (_server_side, _) = listener.accept().unwrap();

        assert!(conn.receive(Duration::from_millis(50)).unwrap().is_none());
        assert!(conn.receive(Duration::ZERO).unwrap().is_none());
        assert!(conn.is_connected());

        conn.disconnect();
        assert!(!conn.is_connected());
    }

    #[test]
    fn test_receive_flushes_trailerless_data_when_idle() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let mut conn = TcpConnection::new(addr.to_string());
        conn.connect().unwrap();
        let (mut server_side, _) = listener.accept().unwrap();
        server_side.write_all(b"35=8\x0111=ORDER2\x0139=2\x01").unwrap();

        let mut received = BytesMut::new();
        for _ in 0..50 {
            if let Some(frame) = conn.receive(Duration::from_millis(50)).unwrap() {
                received.extend_from_slice(&frame);
                if received.ends_with(b"39=2\x01") {
                    break;
                }
            }
        }
        assert_eq!(&received[..], b"35=8\x0111=ORDER2\x0139=2\x01");
        assert!(conn.is_connected());
    }

    #[test]
    fn test_connect_before_stops_at_deadline() {
        let mut conn = TcpConnection::new(closed_port())
            .with_connect_timeout(Duration::from_millis(200))
            .with_reconnect_policy(ReconnectPolicy::new(
                10,
                Duration::from_secs(1),
                Duration::from_secs(5),
            ));

        let start = Instant::now();
        let err = conn
            .connect_before(start + Duration::from_millis(150))
            .unwrap_err();
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(matches!(err, TransportError::ConnectFailed { attempts, .. } if attempts < 10));
        assert!(!conn.is_connected());

        let err = conn.connect_before(Instant::now()).unwrap_err();
        assert!(matches!(err, TransportError::ConnectFailed { attempts: 1, .. }));
    }
}
