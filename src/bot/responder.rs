//! Automatic replies to the monitored user.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::BotConfig;
use crate::discord::RateLimiter;

/// The parts of an incoming message the reply gate looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomingMessage {
    pub author_id: u64,
    pub author_is_bot: bool,
    pub channel_id: u64,
}

/// Why a message did not get a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// Author is not the monitored user.
    OtherAuthor,
    /// Author is a bot account.
    BotAuthor,
    /// The time window does not allow replies right now.
    OutsideWindow,
    /// The rate limiter has no tokens left.
    RateLimited,
    /// The phrase pool is empty.
    NoPhrase,
}

/// Decides whether a message gets a reply and picks the phrase.
pub struct MessageHandler {
    config: Arc<BotConfig>,
    limiter: Arc<RateLimiter>,
    rng: Mutex<StdRng>,
}

impl MessageHandler {
    /// Creates a handler whose generator is seeded once from OS entropy.
    #[must_use]
    pub fn new(config: Arc<BotConfig>, limiter: Arc<RateLimiter>) -> Self {
        Self::with_rng(config, limiter, StdRng::from_os_rng())
    }

    /// Creates a handler using the given generator.
    #[must_use]
    pub fn with_rng(config: Arc<BotConfig>, limiter: Arc<RateLimiter>, rng: StdRng) -> Self {
        Self {
            config,
            limiter,
            rng: Mutex::new(rng),
        }
    }

    /// Returns the phrase to send, or `None` if the message is not answered.
    pub async fn evaluate(&self, message: &IncomingMessage, now: DateTime<Utc>) -> Option<String> {
        match self.decide(message, now).await {
            Ok(phrase) => Some(phrase),
            Err(skip) => {
                debug!(
                    author_id = message.author_id,
                    channel_id = message.channel_id,
                    reason = ?skip,
                    "No reply"
                );
                None
            }
        }
    }

    /// Runs the reply gate. The rate limiter is consulted last so that
    /// messages rejected by the other checks never spend a token.
    pub async fn decide(&self, message: &IncomingMessage, now: DateTime<Utc>) -> Result<String, Skip> {
        if message.author_id != self.config.monitored_user_id() {
            return Err(Skip::OtherAuthor);
        }
        if message.author_is_bot {
            return Err(Skip::BotAuthor);
        }
        if !self.config.permits_reply_at(now).await {
            return Err(Skip::OutsideWindow);
        }
        if let Err(wait) = self.limiter.check() {
            debug!(wait_secs = wait.as_secs(), "Next reply token not yet available");
            return Err(Skip::RateLimited);
        }

        let mut rng = self.rng.lock().await;
        match self.config.phrases().pick(&mut *rng) {
            Some(phrase) => Ok(phrase.to_owned()),
            None => {
                warn!("Phrase pool is empty, nothing to reply with");
                Err(Skip::NoPhrase)
            }
        }
    }

    /// The shared configuration.
    #[must_use]
    pub fn config(&self) -> &Arc<BotConfig> {
        &self.config
    }
}

impl std::fmt::Debug for MessageHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageHandler")
            .field("config", &self.config)
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::config::{BotSettings, PhrasePool};
    use crate::window::{TimeWindow, WindowMode};

    const MONITORED: u64 = 123;

    fn handler_with(mode: WindowMode, burst: u32, now: DateTime<Utc>) -> MessageHandler {
        let mut settings = BotSettings::new(MONITORED);
        settings.window_mode = mode;
        let config = Arc::new(BotConfig::new(&settings, PhrasePool::builtin(), now));
        let limiter = Arc::new(RateLimiter::new(burst, 0.0005).unwrap());
        MessageHandler::with_rng(config, limiter, StdRng::seed_from_u64(7))
    }

    fn from(author_id: u64) -> IncomingMessage {
        IncomingMessage {
            author_id,
            author_is_bot: false,
            channel_id: 555,
        }
    }

    #[tokio::test]
    async fn test_other_user_never_answered() {
        let now = Utc::now();
        let handler = handler_with(WindowMode::Active, 5, now);
        for _ in 0..10 {
            assert_eq!(handler.decide(&from(999), now).await, Err(Skip::OtherAuthor));
        }
    }

    #[tokio::test]
    async fn test_monitored_user_answered_with_pool_phrase() {
        let now = Utc::now();
        let handler = handler_with(WindowMode::Active, 5, now);
        handler
            .config()
            .replace_window(TimeWindow::starting_at(now - TimeDelta::minutes(5), 30).unwrap())
            .await;

        let phrase = handler.evaluate(&from(MONITORED), now).await.unwrap();
        assert!(PhrasePool::builtin().contains(&phrase));
    }

    #[tokio::test]
    async fn test_bot_author_ignored() {
        let now = Utc::now();
        let handler = handler_with(WindowMode::Active, 5, now);
        let message = IncomingMessage {
            author_is_bot: true,
            ..from(MONITORED)
        };
        assert_eq!(handler.decide(&message, now).await, Err(Skip::BotAuthor));
    }

    #[tokio::test]
    async fn test_active_window_expired() {
        let now = Utc::now();
        let handler = handler_with(WindowMode::Active, 5, now);
        handler
            .config()
            .replace_window(TimeWindow::starting_at(now - TimeDelta::minutes(30), 10).unwrap())
            .await;

        assert_eq!(
            handler.decide(&from(MONITORED), now).await,
            Err(Skip::OutsideWindow)
        );
    }

    #[tokio::test]
    async fn test_inactive_window_suppresses() {
        let now = Utc::now();
        let handler = handler_with(WindowMode::Inactive, 5, now);
        assert!(handler.evaluate(&from(MONITORED), now).await.is_some());

        handler
            .config()
            .replace_window(TimeWindow::starting_at(now - TimeDelta::minutes(1), 10).unwrap())
            .await;
        assert_eq!(
            handler.decide(&from(MONITORED), now).await,
            Err(Skip::OutsideWindow)
        );
        assert!(handler.evaluate(&from(MONITORED), now + TimeDelta::minutes(20)).await.is_some());
    }

    #[tokio::test]
    async fn test_rate_limited_after_burst() {
        let now = Utc::now();
        let handler = handler_with(WindowMode::Inactive, 2, now);

        assert!(handler.evaluate(&from(MONITORED), now).await.is_some());
        assert!(handler.evaluate(&from(MONITORED), now).await.is_some());
        assert_eq!(
            handler.decide(&from(MONITORED), now).await,
            Err(Skip::RateLimited)
        );
    }

    #[tokio::test]
    async fn test_gated_messages_do_not_spend_tokens() {
        let now = Utc::now();
        let handler = handler_with(WindowMode::Inactive, 1, now);

        for _ in 0..5 {
            assert!(handler.evaluate(&from(999), now).await.is_none());
        }
        assert!(handler.evaluate(&from(MONITORED), now).await.is_some());
    }
}
