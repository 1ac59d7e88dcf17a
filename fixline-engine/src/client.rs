/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Session client.
//!
//! [`FixClient`] owns the TCP connection, the outbound sequence counter and
//! the last order id of one FIX session. Every operation runs to completion
//! on the caller's thread; a New Order Single blocks until its execution
//! report arrives or the execution timeout passes.

use bytes::BytesMut;
use fixline_core::error::TransportError;
use fixline_core::field::{FieldMap, tags};
use fixline_core::message::{FixMessage, MsgType};
use fixline_core::types::{OrdType, SeqNum, Side};
use fixline_session::{
    ConnectionState, SendOutcome, SequenceManager, SessionConfig, SessionStatus, classify,
    matches_order,
};
use fixline_tagvalue::{decode, display_frame, encode};
use fixline_transport::{ReconnectPolicy, TcpConnection};
use rust_decimal::Decimal;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Pause after a failed receive inside the correlation loop.
const RECEIVE_ERROR_PAUSE: Duration = Duration::from_millis(100);

/// Default Logout text.
pub const DEFAULT_LOGOUT_TEXT: &str = "User requested logout";

/// Parameters of a New Order Single.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// Symbol (55).
    pub symbol: String,
    /// Side (54).
    pub side: Side,
    /// OrdType (40).
    pub ord_type: OrdType,
    /// Price (44), omitted when `None`.
    pub price: Option<Decimal>,
    /// OrderQty (38).
    pub quantity: Decimal,
    /// ClOrdID (11); synthesized by the session when `None`.
    pub cl_ord_id: Option<String>,
}

impl NewOrder {
    /// Creates a limit order.
    #[must_use]
    pub fn limit(symbol: impl Into<String>, side: Side, price: Decimal, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            ord_type: OrdType::Limit,
            price: Some(price),
            quantity,
            cl_ord_id: None,
        }
    }

    /// Creates a market order.
    #[must_use]
    pub fn market(symbol: impl Into<String>, side: Side, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            ord_type: OrdType::Market,
            price: None,
            quantity,
            cl_ord_id: None,
        }
    }

    /// Sets an explicit ClOrdID.
    #[must_use]
    pub fn with_cl_ord_id(mut self, cl_ord_id: impl Into<String>) -> Self {
        self.cl_ord_id = Some(cl_ord_id.into());
        self
    }

    /// Returns the order's body fields.
    #[must_use]
    pub fn to_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new()
            .with(tags::SYMBOL, self.symbol.as_str())
            .with(tags::SIDE, self.side.as_char().to_string())
            .with(tags::ORD_TYPE, self.ord_type.as_char().to_string())
            .with(tags::ORDER_QTY, self.quantity.to_string());
        if let Some(price) = self.price {
            fields.insert(tags::PRICE, price.to_string());
        }
        if let Some(id) = &self.cl_ord_id {
            fields.insert(tags::CL_ORD_ID, id.as_str());
        }
        fields
    }
}

/// Blocking FIX initiator for a single session.
#[derive(Debug)]
pub struct FixClient {
    /// Session settings.
    config: SessionConfig,
    /// Socket and inbound framing.
    connection: TcpConnection,
    /// Outbound sequence counter.
    sequence: SequenceManager,
    /// Last ClOrdID sent.
    last_order_id: Option<String>,
}

impl FixClient {
    /// Creates a disconnected client. The connection opens on first use.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let policy = ReconnectPolicy::new(
            config.max_reconnect_attempts,
            config.reconnect_delay,
            config.max_reconnect_delay,
        );
        let connection = TcpConnection::new(config.addr())
            .with_connect_timeout(config.connect_timeout)
            .with_reconnect_policy(policy)
            .with_read_buffer_size(config.read_buffer_size)
            .with_max_message_size(config.max_message_size);
        Self {
            config,
            connection,
            sequence: SequenceManager::new(),
            last_order_id: None,
        }
    }

    /// Returns the session settings.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns true if the socket is open.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Returns the connection state.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        if self.connection.is_connected() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    /// Returns the sequence number the next message will carry.
    #[must_use]
    pub const fn seq_num(&self) -> SeqNum {
        self.sequence.next_sender_seq()
    }

    /// Returns the last ClOrdID sent, if any.
    #[must_use]
    pub fn last_order_id(&self) -> Option<&str> {
        self.last_order_id.as_deref()
    }

    /// Returns failed attempts of the most recent connect cycle.
    #[must_use]
    pub const fn reconnect_attempts(&self) -> u32 {
        self.connection.reconnect_attempts()
    }

    /// Returns a status snapshot.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            connected: self.is_connected(),
            seq_num: self.seq_num().value(),
            last_order_id: self.last_order_id.clone(),
        }
    }

    /// Opens a fresh connection, dropping any current one.
    ///
    /// # Errors
    /// Returns `TransportError::ConnectFailed` when every attempt fails.
    pub fn connect(&mut self) -> Result<(), TransportError> {
        self.connection.connect()
    }

    /// Closes the connection.
    pub fn disconnect(&mut self) {
        self.connection.disconnect();
    }

    fn ensure_connected(&mut self) -> Result<(), TransportError> {
        if self.connection.is_connected() {
            return Ok(());
        }
        self.connection.connect()
    }

    /// Composes, sends and, for a New Order Single, correlates a message.
    ///
    /// The sequence number is consumed once the message is composed, even if
    /// the write then fails. A failed connect consumes nothing.
    pub fn send_message(&mut self, msg_type: MsgType, fields: FieldMap) -> SendOutcome {
        if let Err(err) = self.ensure_connected() {
            warn!(msg_type = %msg_type, error = %err, "not sending, connection unavailable");
            return SendOutcome::ConnectionFailed {
                attempts: self.connection.reconnect_attempts(),
            };
        }

        let seq = self.sequence.allocate_sender_seq();
        let mut message = FixMessage::new(
            seq,
            self.config.sender_comp_id.clone(),
            self.config.target_comp_id.clone(),
            msg_type.clone(),
        )
        .with_begin_string(self.config.begin_string.as_str())
        .with_fields(fields);

        let awaited = (msg_type == MsgType::NewOrderSingle).then(|| {
            let id = message
                .fields()
                .get(tags::CL_ORD_ID)
                .map(str::to_string)
                .unwrap_or_else(|| {
                    format!("{}{}", self.config.order_id_prefix, self.sequence.next_sender_seq())
                });
            message.set_field(tags::CL_ORD_ID, id.as_str());
            self.last_order_id = Some(id.clone());
            id
        });

        let frame = encode(&message);
        if let Err(err) = self.connection.send(&frame) {
            warn!(msg_type = %msg_type, seq = seq.value(), error = %err, "send failed");
            return SendOutcome::TransmitFailed {
                reason: err.to_string(),
            };
        }
        info!(msg_type = %msg_type, seq = seq.value(), "message sent");

        match awaited {
            Some(id) => self.wait_for_execution_report(&id, self.config.execution_timeout),
            None => SendOutcome::Sent {
                seq_num: seq.value(),
            },
        }
    }

    /// Reads one inbound frame, waiting at most `wait`.
    ///
    /// Connects first if disconnected.
    ///
    /// # Errors
    /// Returns the transport failure; the session is then disconnected.
    pub fn receive_frame(&mut self, wait: Duration) -> Result<Option<BytesMut>, TransportError> {
        self.ensure_connected()?;
        self.connection.receive(wait)
    }

    fn receive_frame_before(
        &mut self,
        deadline: Instant,
        wait: Duration,
    ) -> Result<Option<BytesMut>, TransportError> {
        if !self.connection.is_connected() {
            self.connection.connect_before(deadline)?;
        }
        self.connection.receive(wait)
    }

    /// Reads and decodes one inbound message, waiting at most `wait`.
    ///
    /// # Errors
    /// Same as [`FixClient::receive_frame`].
    pub fn receive(&mut self, wait: Duration) -> Result<Option<FieldMap>, TransportError> {
        Ok(self.receive_frame(wait)?.map(|frame| decode(&frame)))
    }

    /// Waits for the Execution Report whose OrderID or ClOrdID equals
    /// `order_id`.
    ///
    /// Other inbound messages are dropped. Receive failures do not end the
    /// wait; only the deadline does. Reconnects made while waiting are bounded
    /// by the same deadline.
    pub fn wait_for_execution_report(&mut self, order_id: &str, timeout: Duration) -> SendOutcome {
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            match self.receive_frame_before(deadline, remaining.min(self.config.receive_wait)) {
                Ok(Some(frame)) => {
                    let fields = decode(&frame);
                    if matches_order(&fields, order_id) {
                        let result = classify(&fields);
                        info!(order_id, status = %result.status, "execution report received");
                        return SendOutcome::from_execution(result);
                    }
                    debug!(order_id, frame = %display_frame(&frame), "ignoring inbound message");
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(order_id, error = %err, "receive failed while awaiting execution report");
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    thread::sleep(remaining.min(RECEIVE_ERROR_PAUSE));
                }
            }
        }

        warn!(order_id, timeout_ms = timeout.as_millis() as u64, "no execution report before deadline");
        SendOutcome::Timeout {
            cl_ord_id: order_id.to_string(),
        }
    }

    /// Sends a Logon (A) with EncryptMethod 0 and the configured HeartBtInt.
    pub fn logon(&mut self) -> SendOutcome {
        let fields = FieldMap::new()
            .with(tags::ENCRYPT_METHOD, "0")
            .with(tags::HEART_BT_INT, self.config.heartbeat_interval_secs().to_string());
        self.send_message(MsgType::Logon, fields)
    }

    /// Sends a Heartbeat (0).
    pub fn heartbeat(&mut self) -> SendOutcome {
        self.send_message(MsgType::Heartbeat, FieldMap::new())
    }

    /// Sends a New Order Single (D) and waits for its execution report.
    pub fn new_order_single(&mut self, order: &NewOrder) -> SendOutcome {
        self.send_message(MsgType::NewOrderSingle, order.to_fields())
    }

    /// Sends a Logout (5). `None` uses the default text.
    pub fn logout(&mut self, text: Option<&str>) -> SendOutcome {
        let fields = FieldMap::new().with(tags::TEXT, text.unwrap_or(DEFAULT_LOGOUT_TEXT));
        self.send_message(MsgType::Logout, fields)
    }

    /// Sends a Test Request (1).
    pub fn test_request(&mut self, test_req_id: &str) -> SendOutcome {
        let fields = FieldMap::new().with(tags::TEST_REQ_ID, test_req_id);
        self.send_message(MsgType::TestRequest, fields)
    }

    /// Sends a Resend Request (2) for `begin..=end`.
    pub fn resend_request(&mut self, begin_seq_no: u64, end_seq_no: u64) -> SendOutcome {
        let fields = FieldMap::new()
            .with(tags::BEGIN_SEQ_NO, begin_seq_no.to_string())
            .with(tags::END_SEQ_NO, end_seq_no.to_string());
        self.send_message(MsgType::ResendRequest, fields)
    }

    /// Sends a session-level Reject (3).
    pub fn session_reject(&mut self, ref_seq_num: u64, reason: u32) -> SendOutcome {
        let fields = FieldMap::new()
            .with(tags::REF_SEQ_NUM, ref_seq_num.to_string())
            .with(tags::SESSION_REJECT_REASON, reason.to_string());
        self.send_message(MsgType::Reject, fields)
    }

    /// Sends a Sequence Reset (4). GapFillFlag is only present when set.
    pub fn sequence_reset(&mut self, new_seq_no: u64, gap_fill: bool) -> SendOutcome {
        let mut fields = FieldMap::new().with(tags::NEW_SEQ_NO, new_seq_no.to_string());
        if gap_fill {
            fields.insert(tags::GAP_FILL_FLAG, "Y");
        }
        self.send_message(MsgType::SequenceReset, fields)
    }
}
