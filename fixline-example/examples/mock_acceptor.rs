//! Mock sell-side acceptor.
//!
//! Answers Logon with Logon, Test Request with Heartbeat, Logout with Logout,
//! and fills every New Order Single in full at its limit price.

use fixline::prelude::*;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use tracing::{debug, info, warn};

mod common;
use common::{DEFAULT_PORT, env_or, init_logging};

struct Session {
    sender: CompId,
    target: CompId,
    sequence: SequenceManager,
    next_order_id: u64,
}

impl Session {
    fn reply(&mut self, msg_type: MsgType, fields: FieldMap) -> Vec<u8> {
        let seq = self.sequence.allocate_sender_seq();
        let message = FixMessage::new(seq, self.sender.clone(), self.target.clone(), msg_type)
            .with_fields(fields);
        encode(&message).to_vec()
    }

    fn fill(&mut self, order: &FieldMap) -> Vec<u8> {
        let order_id = format!("OID-{}", self.next_order_id);
        self.next_order_id += 1;

        let mut fields = FieldMap::new()
            .with(tags::ORDER_ID, order_id)
            .with(tags::EXEC_TYPE, OrdStatus::Filled.code())
            .with(tags::ORD_STATUS, OrdStatus::Filled.code())
            .with(tags::CUM_QTY, order.get(tags::ORDER_QTY).unwrap_or("0"))
            .with(tags::AVG_PX, order.get(tags::PRICE).unwrap_or("0"));
        for tag in [tags::CL_ORD_ID, tags::SYMBOL, tags::SIDE] {
            if let Some(value) = order.get(tag) {
                fields.insert(tag, value);
            }
        }
        self.reply(MsgType::ExecutionReport, fields)
    }
}

fn handle_connection(mut stream: TcpStream, sender: CompId) -> anyhow::Result<()> {
    let peer = stream.peer_addr()?;
    info!(%peer, "connection accepted");

    let mut frames = FrameBuffer::new();
    let mut session: Option<Session> = None;
    let mut buf = [0u8; 4096];

    loop {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            info!(%peer, "connection closed");
            return Ok(());
        }
        frames.extend(&buf[..n]);

        for frame in frames.drain_frames() {
            let fields = decode(&frame);
            let msg_type: MsgType = fields.get(tags::MSG_TYPE).unwrap_or_default().parse()?;
            debug!(%peer, %msg_type, frame = %fixline::tagvalue::display_frame(&frame), "received");

            if session.is_none() {
                let Some(target) = fields.get(tags::SENDER_COMP_ID).and_then(CompId::new) else {
                    warn!(%peer, "message without SenderCompID");
                    continue;
                };
                session = Some(Session {
                    sender: sender.clone(),
                    target,
                    sequence: SequenceManager::new(),
                    next_order_id: 1,
                });
            }
            let Some(session) = session.as_mut() else {
                continue;
            };

            let response = match msg_type {
                MsgType::Logon => {
                    let heartbeat = fields.get(tags::HEART_BT_INT).unwrap_or("30");
                    Some(session.reply(
                        MsgType::Logon,
                        FieldMap::new()
                            .with(tags::ENCRYPT_METHOD, "0")
                            .with(tags::HEART_BT_INT, heartbeat),
                    ))
                }
                MsgType::TestRequest => {
                    let id = fields.get(tags::TEST_REQ_ID).unwrap_or_default();
                    Some(session.reply(
                        MsgType::Heartbeat,
                        FieldMap::new().with(tags::TEST_REQ_ID, id),
                    ))
                }
                MsgType::NewOrderSingle => {
                    info!(
                        %peer,
                        cl_ord_id = fields.get(tags::CL_ORD_ID).unwrap_or_default(),
                        symbol = fields.get(tags::SYMBOL).unwrap_or_default(),
                        "filling order"
                    );
                    Some(session.fill(&fields))
                }
                MsgType::Logout => {
                    let logout = session.reply(MsgType::Logout, FieldMap::new());
                    stream.write_all(&logout)?;
                    info!(%peer, "logout acknowledged");
                    return Ok(());
                }
                _ => None,
            };

            if let Some(bytes) = response {
                stream.write_all(&bytes)?;
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let port = env_or("SELLSIDE_PORT", &DEFAULT_PORT.to_string());
    let sender = env_or("TARGET_COMP_ID", "BROKER1");
    let sender = CompId::new(&sender).ok_or_else(|| anyhow::anyhow!("invalid CompID: {sender}"))?;

    let listener = TcpListener::bind(format!("0.0.0.0:{port}"))?;
    info!(addr = %listener.local_addr()?, %sender, "mock acceptor listening");

    for stream in listener.incoming().flatten() {
        let sender = sender.clone();
        thread::spawn(move || {
            if let Err(err) = handle_connection(stream, sender) {
                warn!(error = %err, "connection error");
            }
        });
    }
    Ok(())
}
