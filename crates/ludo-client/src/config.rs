//! Client configuration.

use std::time::Duration;

/// Pauses the offline simulation uses in place of network latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotTiming {
    /// After `roomCreated`, before the bot sits down.
    pub join: Duration,
    /// Before the bot rolls at the start of its turn.
    pub think: Duration,
    /// After a bot rolls a six, before its turn resolves.
    pub settle: Duration,
    /// After the settle, before the bot's extra roll.
    pub reroll: Duration,
}

impl Default for BotTiming {
    fn default() -> Self {
        Self {
            join: Duration::from_millis(500),
            think: Duration::from_millis(2000),
            settle: Duration::from_millis(1000),
            reroll: Duration::from_millis(1500),
        }
    }
}

/// Connection and request settings for a [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// WebSocket URL of the relay, e.g. `ws://localhost:3001`.
    pub url: String,
    /// Per-attempt limit for the WebSocket handshake.
    pub connect_timeout: Duration,
    /// Extra connection attempts after the first one fails.
    pub reconnect_attempts: u32,
    /// Pause between connection attempts.
    pub reconnect_delay: Duration,
    /// How long to wait for the relay's answer to a request.
    pub request_timeout: Duration,
    pub bot: BotTiming,
}

impl ClientConfig {
    /// Default settings pointed at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:3001".to_owned(),
            connect_timeout: Duration::from_secs(8),
            reconnect_attempts: 3,
            reconnect_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(10),
            bot: BotTiming::default(),
        }
    }
}
