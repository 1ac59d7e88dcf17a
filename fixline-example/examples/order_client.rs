//! Order client example.
//!
//! Logs on, sends a heartbeat and one limit order, then logs out. Every
//! operation report is printed as JSON.
//!
//! Run against the mock acceptor:
//!
//! ```text
//! cargo run --example mock_acceptor
//! SELLSIDE_HOST=127.0.0.1 SELLSIDE_PORT=9878 SENDER_COMP_ID=CLIENT1 \
//!     TARGET_COMP_ID=BROKER1 cargo run --example order_client
//! ```

use anyhow::Context;
use fixline::prelude::*;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

mod common;
use common::{env_or, init_logging};

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = SessionConfig::from_env().context("loading session settings")?;
    info!(addr = %config.addr(), sender = %config.sender_comp_id, "starting order client");

    let mut client = ClientBuilder::new()
        .with_session(config)
        .with_execution_timeout(Duration::from_secs(10))
        .build()?;

    let symbol = env_or("ORDER_SYMBOL", "AAPL");
    let side = env_or("ORDER_SIDE", "1");
    let ord_type = env_or("ORDER_TYPE", "2");
    let price = Decimal::from_str(&env_or("ORDER_PRICE", "150.25")).context("ORDER_PRICE")?;
    let qty = Decimal::from_str(&env_or("ORDER_QTY", "100")).context("ORDER_QTY")?;

    let mut ops = Operations::new(&mut client);
    let reports = [
        ops.logon(),
        ops.heartbeat(),
        ops.new_order_single(&symbol, &side, &ord_type, price, qty),
        ops.logout(),
        ops.status(),
    ];
    for report in &reports {
        println!("{}", serde_json::to_string(report)?);
    }

    client.disconnect();
    Ok(())
}
