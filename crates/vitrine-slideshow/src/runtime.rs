//! Tokio driver for the playback state machine
//!
//! Owns the real clocks: one deadline per timer kind, re-armed from the
//! effects the machine emits. The runner is headless, so "showing" a slide
//! is a structured log line, and video playback is approximated by the
//! regular display time since nothing actually decodes the stream.

use crate::config::PlayerConfig;
use crate::fetcher::SlideFetcher;
use crate::player::{Effect, Event, Player, PlayerState};
use anyhow::Result;
use tokio::time::{sleep_until, Instant};
use vitrine_core::MediaType;

enum Wake {
    Slide,
    Refresh,
    Retry,
    Reload,
}

pub struct Runtime<F: SlideFetcher> {
    fetcher: F,
    config: PlayerConfig,
    player: Player,
    slide_deadline: Option<Instant>,
    refresh_deadline: Option<Instant>,
    retry_deadline: Option<Instant>,
    reload_deadline: Option<Instant>,
    /// Whether the slide deadline stands in for video playback ending.
    slide_deadline_is_video: bool,
}

impl<F: SlideFetcher> Runtime<F> {
    pub fn new(fetcher: F, config: PlayerConfig) -> Self {
        Self {
            fetcher,
            player: Player::new(config.clone()),
            config,
            slide_deadline: None,
            refresh_deadline: None,
            retry_deadline: None,
            reload_deadline: None,
            slide_deadline_is_video: false,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        self.fetch_initial().await;

        loop {
            let Some((deadline, wake)) = self.next_deadline() else {
                // Nothing scheduled: terminal state for a headless runner
                tracing::info!(state = ?self.player.state(), "No timers pending, exiting");
                return Ok(());
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received Ctrl+C, stopping player");
                    return Ok(());
                }
                _ = sleep_until(deadline) => {
                    self.on_wake(wake).await;
                }
            }
        }
    }

    async fn fetch_initial(&mut self) {
        let event = match self.fetcher.fetch_slides().await {
            Ok(slides) => Event::SlidesLoaded(slides),
            Err(e) => Event::FetchFailed(e.to_string()),
        };
        let effects = self.player.handle(event);
        self.apply(effects);
    }

    fn next_deadline(&self) -> Option<(Instant, Wake)> {
        let candidates = [
            (self.slide_deadline, Wake::Slide),
            (self.refresh_deadline, Wake::Refresh),
            (self.retry_deadline, Wake::Retry),
            (self.reload_deadline, Wake::Reload),
        ];
        candidates
            .into_iter()
            .filter_map(|(deadline, wake)| deadline.map(|d| (d, wake)))
            .min_by_key(|(d, _)| *d)
    }

    async fn on_wake(&mut self, wake: Wake) {
        match wake {
            Wake::Slide => {
                self.slide_deadline = None;
                let event = if self.slide_deadline_is_video {
                    Event::VideoEnded
                } else {
                    Event::SlideTimerFired
                };
                let effects = self.player.handle(event);
                self.apply(effects);
            }
            Wake::Refresh => {
                // Refresh is periodic; re-arm before the fetch so a slow
                // request cannot stack refreshes.
                self.refresh_deadline = Some(Instant::now() + self.config.refresh_interval);
                let event = match self.fetcher.fetch_slides().await {
                    Ok(slides) => Event::RefreshCompleted(slides),
                    Err(e) => Event::RefreshFailed(e.to_string()),
                };
                let effects = self.player.handle(event);
                self.apply(effects);
            }
            Wake::Retry => {
                self.retry_deadline = None;
                let event = match self.fetcher.fetch_slides().await {
                    Ok(slides) => Event::SlidesLoaded(slides),
                    Err(e) => Event::FetchFailed(e.to_string()),
                };
                let effects = self.player.handle(event);
                self.apply(effects);
            }
            Wake::Reload => {
                tracing::info!("Reloading player after persistent failure");
                self.player = Player::new(self.config.clone());
                self.slide_deadline = None;
                self.refresh_deadline = None;
                self.retry_deadline = None;
                self.reload_deadline = None;
                self.fetch_initial().await;
            }
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ShowSlide { index, transition } => {
                    if let Some(slide) = self.player.slides().get(index) {
                        tracing::info!(
                            index = index,
                            url = %slide.url,
                            media_type = %slide.media_type,
                            transition = transition,
                            "Showing slide"
                        );
                        // No real playback here: a video slide advances after
                        // the standard display time instead.
                        if slide.media_type == MediaType::Video {
                            self.slide_deadline =
                                Some(Instant::now() + self.config.slide_display_time);
                            self.slide_deadline_is_video = true;
                        }
                    }
                }
                Effect::RemoveOldSlide(after) => {
                    // Headless: nothing rendered to tear down, but the
                    // cross-fade timing stays visible in the logs.
                    tracing::debug!(
                        after_ms = after.as_millis() as u64,
                        "Outgoing slide scheduled for removal"
                    );
                }
                Effect::StartSlideTimer(duration) => {
                    self.slide_deadline = Some(Instant::now() + duration);
                    self.slide_deadline_is_video = false;
                }
                Effect::StopSlideTimer => {
                    self.slide_deadline = None;
                }
                Effect::StartRefreshTimer(duration) => {
                    self.refresh_deadline = Some(Instant::now() + duration);
                }
                Effect::StopRefreshTimer => {
                    self.refresh_deadline = None;
                }
                Effect::ScheduleRetry(duration) => {
                    self.retry_deadline = Some(Instant::now() + duration);
                }
                Effect::ScheduleReload(duration) => {
                    self.reload_deadline = Some(Instant::now() + duration);
                }
            }
        }

        if let PlayerState::Error { message } = self.player.state() {
            tracing::error!(message = %message, "Player in error state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use vitrine_core::Slide;

    struct FailingFetcher {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SlideFetcher for FailingFetcher {
        async fn fetch_slides(&self) -> Result<Vec<Slide>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn test_initial_failure_schedules_retry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut runtime = Runtime::new(
            FailingFetcher {
                calls: calls.clone(),
            },
            PlayerConfig::default(),
        );

        runtime.fetch_initial().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(runtime.retry_deadline.is_some());
        assert_eq!(runtime.player.state(), &PlayerState::Loading);
    }
}
