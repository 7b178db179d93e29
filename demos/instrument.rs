//! Instrument - channelized measurement engine example.
//!
//! This example demonstrates:
//! - Declaring channels and their value sources with the builder
//! - Per-channel requests answered with binary value frames
//! - The measurement on/off commands flipping a gate the host polls
//!
//! # Talking to it
//!
//! With two channels the tail of the identifier table shifts: turn
//! on/off sit at 9 and 10. Values come back when their channel is
//! polled, never spontaneously.
//!
//! ```text
//! 7;    ->   binary float frame for channel 0
//! 8;    ->   binary int16 frame for channel 1
//! 9;    ->   2,measurements on;
//! 10;   ->   2,measurements off;
//! ```

use std::time::Duration;

use cmdwire::transport::DEFAULT_BAUD;
use cmdwire::{ChannelConfig, ChannelKind, Engine, SerialTransport};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyUSB0".to_string());
    let transport = SerialTransport::open(&path, DEFAULT_BAUD)?;

    // A slowly drifting fake temperature; the heater flag trips when it
    // sags below nominal.
    let mut phase = 0.0f64;
    let temperature = move || {
        phase += 0.05;
        21.5 + phase.sin()
    };
    let mut heater_phase = 0.0f64;
    let heater = move || {
        heater_phase += 0.05;
        if heater_phase.sin() < 0.0 {
            1.0
        } else {
            0.0
        }
    };

    let mut engine = Engine::builder()
        .transport(transport)
        .channel(
            ChannelConfig {
                name: "temperature".into(),
                kind: ChannelKind::Measurement,
            },
            temperature,
        )
        .channel(
            ChannelConfig {
                name: "heater".into(),
                kind: ChannelKind::Status,
            },
            heater,
        )
        .build()?;

    println!(
        "instrument on {path}, {} channels, user commands start at {}",
        engine.layout().channel_count(),
        engine.layout().first_free_id()
    );
    let mut measuring = false;
    loop {
        engine.pump()?;
        let gate = engine.channels_mut().is_enabled();
        if gate != measuring {
            measuring = gate;
            println!("measurements {}", if measuring { "on" } else { "off" });
        }
        std::thread::sleep(Duration::from_millis(100));
    }
}
