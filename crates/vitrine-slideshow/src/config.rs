//! Player timing configuration

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// How often the slide list is re-fetched while playing.
    pub refresh_interval: Duration,
    /// How long an image slide stays on screen.
    pub slide_display_time: Duration,
    /// Cross-fade duration; the outgoing slide is removed after this.
    pub transition_duration: Duration,
    /// Initial-load fetch attempts before giving up.
    pub max_retries: u32,
    /// Delay between initial-load retries.
    pub retry_delay: Duration,
    /// Delay before skipping a slide whose media failed to load.
    pub error_skip_delay: Duration,
    /// Delay before a full restart once retries are exhausted.
    pub reload_delay: Duration,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(60),
            slide_display_time: Duration::from_secs(5),
            transition_duration: Duration::from_millis(1500),
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
            error_skip_delay: Duration::from_secs(1),
            reload_delay: Duration::from_secs(10),
        }
    }
}
