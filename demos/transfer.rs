//! Counted transfer - two engines over an in-memory link.
//!
//! This example demonstrates:
//! - A loopback transport pair carrying both ends in one process
//! - Arming the counted transfer session with a prepare frame
//! - Observing the acknowledgment of the item that completes the count
//!
//! The driver announces three items and streams them; the responder
//! counts the item frames and acknowledges the third. Runs without any
//! hardware.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cmdwire::{Context, Engine, LoopbackTransport};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (driver_side, responder_side) = LoopbackTransport::pair();

    let acked = Arc::new(AtomicBool::new(false));
    let acked_flag = Arc::clone(&acked);

    // Without channels the transfer commands sit at 21..=23. The driver
    // watches for the acknowledgment the responder sends at 23.
    let mut driver = Engine::builder()
        .transport(driver_side)
        .handle_reserved(23, move |_ctx: &mut Context| {
            acked_flag.store(true, Ordering::Relaxed);
            Ok(())
        })
        .build()?;
    let mut responder = Engine::builder().transport(responder_side).build()?;

    let prepare = driver.frame(21).arg_i16(3);
    driver.send(prepare)?;

    for value in [10.5f32, 11.0, 11.5] {
        let item = driver.frame(22).arg_f32_prec(value, 6);
        driver.send(item)?;

        responder.pump()?;
        driver.pump()?;
        println!(
            "sent {value:.1}, acknowledged: {}",
            acked.load(Ordering::Relaxed)
        );
    }

    Ok(())
}
