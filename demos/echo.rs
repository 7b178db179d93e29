//! Echo instrument - simple request/response example.
//!
//! This example demonstrates:
//! - Building an engine with the builder pattern
//! - Registering a handler for a user command above the reserved table
//! - Replying from inside a handler
//!
//! # Talking to it
//!
//! Connect the other end of the link (or a serial terminal at 9600 baud)
//! and send:
//!
//! ```text
//! 25,21;   ->   26,42;
//! 3;       ->   2,ready;
//! 99;      ->   4,Unknown command;6,Unknown command,99;
//! ```

use std::time::Duration;

use cmdwire::transport::DEFAULT_BAUD;
use cmdwire::{Context, Engine, SerialTransport};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyUSB0".to_string());
    let transport = SerialTransport::open(&path, DEFAULT_BAUD)?;

    // Without channels the reserved table ends at 23, so 24 and up are
    // free; 25 keeps a little headroom.
    let mut engine = Engine::builder()
        .transport(transport)
        .handle(25, |ctx: &mut Context| {
            let value = ctx.read_i16()?;
            let reply = ctx.frame(26).arg_i16(value.saturating_mul(2));
            ctx.reply(reply)
        })
        .build()?;

    println!("echoing doubled int16s on {path}");
    loop {
        engine.pump()?;
        std::thread::sleep(Duration::from_millis(5));
    }
}
