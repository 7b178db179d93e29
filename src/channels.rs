//! Channelized measurement engine.
//!
//! The two classic firmware variants (one temperature channel; four
//! voltage channels plus four switch channels) are the same engine
//! parametrized by an ordered channel list. Each channel couples a name,
//! a wire kind, and a value source. Values travel on request only: the
//! peer polls a channel's identifier and the engine answers with the
//! current reading. The on/off control commands flip a measurement gate
//! the host application reads between pumps.
//!
//! Measurement channels go out as binary float frames, status channels
//! as binary int16 frames; the engine picks the frame from the declared
//! [`ChannelKind`].

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Wire encoding of a channel's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Analog reading answered as a binary float.
    Measurement,
    /// Discrete reading answered as a binary int16.
    Status,
}

/// Supplies a channel's current value when sampled.
///
/// `reset` clears any accumulated state (averaging windows, counters);
/// sources without such state keep the default no-op.
pub trait ValueSource: Send {
    /// Take one reading.
    fn sample(&mut self) -> f64;

    /// Clear accumulated state.
    fn reset(&mut self) {}
}

impl<F> ValueSource for F
where
    F: FnMut() -> f64 + Send,
{
    fn sample(&mut self) -> f64 {
        self()
    }
}

struct Channel {
    name: String,
    kind: ChannelKind,
    source: Box<dyn ValueSource>,
}

/// The engine's ordered channel set and its measurement gate.
pub struct ChannelBank {
    channels: Vec<Channel>,
    enabled: bool,
}

impl ChannelBank {
    pub(crate) fn new(specs: Vec<(String, ChannelKind, Box<dyn ValueSource>)>) -> Self {
        let channels = specs
            .into_iter()
            .map(|(name, kind, source)| Channel { name, kind, source })
            .collect();
        Self {
            channels,
            enabled: false,
        }
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// True when no channels are configured.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// True when the measurement gate is open.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Open the measurement gate.
    pub fn enable(&mut self) {
        debug!("measurements enabled");
        self.enabled = true;
    }

    /// Close the measurement gate.
    pub fn disable(&mut self) {
        debug!("measurements disabled");
        self.enabled = false;
    }

    /// Reset every source's accumulated state.
    pub fn reset(&mut self) {
        debug!("channel sources reset");
        for channel in &mut self.channels {
            channel.source.reset();
        }
    }

    /// Name of the channel at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.channels.get(index).map(|c| c.name.as_str())
    }

    /// Kind of the channel at `index`.
    pub fn kind(&self, index: usize) -> Option<ChannelKind> {
        self.channels.get(index).map(|c| c.kind)
    }

    /// Sample the channel at `index` now.
    pub fn sample(&mut self, index: usize) -> Option<f64> {
        self.channels.get_mut(index).map(|c| c.source.sample())
    }
}

impl std::fmt::Debug for ChannelBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelBank")
            .field("len", &self.channels.len())
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        value: f64,
    }

    impl ValueSource for Counter {
        fn sample(&mut self) -> f64 {
            self.value += 1.0;
            self.value
        }

        fn reset(&mut self) {
            self.value = 0.0;
        }
    }

    fn bank() -> ChannelBank {
        ChannelBank::new(vec![
            (
                "temp".to_string(),
                ChannelKind::Measurement,
                Box::new(Counter { value: 0.0 }),
            ),
            (
                "switch".to_string(),
                ChannelKind::Status,
                Box::new(|| 1.0) as Box<dyn ValueSource>,
            ),
        ])
    }

    #[test]
    fn test_bank_starts_disabled() {
        let bank = bank();
        assert_eq!(bank.len(), 2);
        assert!(!bank.is_enabled());
    }

    #[test]
    fn test_enable_disable() {
        let mut bank = bank();
        bank.enable();
        assert!(bank.is_enabled());
        bank.disable();
        assert!(!bank.is_enabled());
    }

    #[test]
    fn test_sample_by_index() {
        let mut bank = bank();
        assert_eq!(bank.sample(0), Some(1.0));
        assert_eq!(bank.sample(0), Some(2.0));
        assert_eq!(bank.sample(1), Some(1.0));
        assert_eq!(bank.sample(5), None);
    }

    #[test]
    fn test_reset_clears_source_state() {
        let mut bank = bank();
        bank.sample(0);
        bank.sample(0);
        bank.reset();
        assert_eq!(bank.sample(0), Some(1.0));
    }

    #[test]
    fn test_names_and_kinds() {
        let bank = bank();
        assert_eq!(bank.name(0), Some("temp"));
        assert_eq!(bank.kind(0), Some(ChannelKind::Measurement));
        assert_eq!(bank.name(1), Some("switch"));
        assert_eq!(bank.kind(1), Some(ChannelKind::Status));
        assert_eq!(bank.name(2), None);
    }

    #[test]
    fn test_closure_source() {
        let mut bank = ChannelBank::new(vec![(
            "fixed".to_string(),
            ChannelKind::Measurement,
            Box::new(|| 21.5) as Box<dyn ValueSource>,
        )]);
        assert_eq!(bank.sample(0), Some(21.5));
    }
}
