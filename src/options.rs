//! Engine configuration.
//!
//! [`EngineOptions`] collects everything a host process decides per
//! link: the punctuation bytes, the frame size cap, exchange timing,
//! and the declared channel set. The struct round-trips through serde
//! so deployments can ship configuration as JSON.
//!
//! # Example
//!
//! ```
//! use cmdwire::options::EngineOptions;
//!
//! let options = EngineOptions::from_json(
//!     r#"{ "ask_timeout_ms": 500, "channels": [{ "name": "temp", "kind": "measurement" }] }"#,
//! )
//! .unwrap();
//! assert_eq!(options.ask_timeout_ms, 500);
//! assert_eq!(options.channels.len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::channels::ChannelKind;
use crate::error::{Error, Result};
use crate::protocol::{Punctuation, DEFAULT_MAX_FRAME_LEN};

/// One declared channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Human-readable channel name.
    pub name: String,
    /// Wire encoding of the channel's values.
    pub kind: ChannelKind,
}

/// Per-link engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Byte separating fields within a frame.
    pub field_separator: u8,
    /// Byte terminating a frame.
    pub command_separator: u8,
    /// Byte suppressing the delimiter meaning of the following byte.
    pub escape_character: u8,
    /// Cap on the byte length of one pending inbound frame.
    pub max_frame_len: usize,
    /// Default deadline for the synchronous exchange, in milliseconds.
    pub ask_timeout_ms: u64,
    /// Pause between transport polls while an exchange waits.
    pub poll_interval_ms: u64,
    /// Declared channels, in identifier order.
    pub channels: Vec<ChannelConfig>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            field_separator: b',',
            command_separator: b';',
            escape_character: b'/',
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            ask_timeout_ms: 1000,
            poll_interval_ms: 1,
            channels: Vec::new(),
        }
    }
}

impl EngineOptions {
    /// The punctuation triple these options describe.
    pub fn punctuation(&self) -> Punctuation {
        Punctuation::new(
            self.field_separator,
            self.command_separator,
            self.escape_character,
        )
    }

    /// Validate the options.
    pub fn validate(&self) -> Result<()> {
        self.punctuation().validate()?;
        if self.max_frame_len == 0 {
            return Err(Error::InvalidOptions(
                "max_frame_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse options from JSON and validate them.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Serialize the options to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
