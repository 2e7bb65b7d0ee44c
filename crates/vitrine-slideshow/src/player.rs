//! Playback state machine
//!
//! Pure logic: events in, effects out. The machine never reads a clock or
//! touches the network; the runtime interprets the effects with real timers.
//! Videos get no slide timer, they advance on [`Event::VideoEnded`].

use crate::config::PlayerConfig;
use std::time::Duration;
use vitrine_core::{MediaType, Slide};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerState {
    /// Initial load (or retry) in flight.
    Loading,
    Playing { index: usize },
    Error { message: String },
}

/// Everything that can happen to the player.
#[derive(Debug, Clone)]
pub enum Event {
    /// Initial (or retried) fetch succeeded.
    SlidesLoaded(Vec<Slide>),
    /// Initial (or retried) fetch failed.
    FetchFailed(String),
    /// The per-slide timer fired.
    SlideTimerFired,
    /// The current video finished playing.
    VideoEnded,
    /// The current slide's media failed to load or render.
    MediaFailed,
    /// A periodic refresh fetch returned a new list.
    RefreshCompleted(Vec<Slide>),
    /// A periodic refresh fetch failed; playback continues on stale slides.
    RefreshFailed(String),
    /// The display was hidden (screen blanked, tab in background).
    Hidden,
    /// The display became visible again.
    Visible,
}

/// Instructions for the runtime. Timers are explicit here, never implicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ShowSlide { index: usize, transition: bool },
    /// Tear down the outgoing slide once the cross-fade has run its course.
    RemoveOldSlide(Duration),
    StartSlideTimer(Duration),
    StopSlideTimer,
    StartRefreshTimer(Duration),
    StopRefreshTimer,
    /// Fetch the slide list again after the delay (initial-load retry).
    ScheduleRetry(Duration),
    /// Restart the whole player after the delay (retries exhausted).
    ScheduleReload(Duration),
}

pub struct Player {
    config: PlayerConfig,
    state: PlayerState,
    slides: Vec<Slide>,
    retries: u32,
    hidden: bool,
}

impl Player {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            state: PlayerState::Loading,
            slides: Vec::new(),
            retries: 0,
            hidden: false,
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        match self.state {
            PlayerState::Playing { index } => self.slides.get(index),
            _ => None,
        }
    }

    /// Timer for the slide at `index`: images advance on the clock, videos
    /// advance when playback ends.
    fn slide_timer(&self, index: usize) -> Option<Effect> {
        let slide = self.slides.get(index)?;
        if slide.media_type == MediaType::Video {
            None
        } else {
            Some(Effect::StartSlideTimer(self.config.slide_display_time))
        }
    }

    fn start_playing(&mut self, slides: Vec<Slide>, transition: bool) -> Vec<Effect> {
        self.slides = slides;
        self.state = PlayerState::Playing { index: 0 };

        let mut effects = vec![Effect::ShowSlide {
            index: 0,
            transition,
        }];
        if transition {
            effects.push(Effect::RemoveOldSlide(self.config.transition_duration));
        }
        effects.extend(self.slide_timer(0));
        effects.push(Effect::StartRefreshTimer(self.config.refresh_interval));
        effects
    }

    fn advance(&mut self) -> Vec<Effect> {
        let PlayerState::Playing { index } = self.state else {
            return Vec::new();
        };
        if self.slides.is_empty() {
            return Vec::new();
        }

        let next = (index + 1) % self.slides.len();
        self.state = PlayerState::Playing { index: next };

        let mut effects = vec![
            Effect::ShowSlide {
                index: next,
                transition: true,
            },
            Effect::RemoveOldSlide(self.config.transition_duration),
        ];
        effects.extend(self.slide_timer(next));
        effects
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::SlidesLoaded(slides) => {
                self.retries = 0;
                if slides.is_empty() {
                    self.state = PlayerState::Error {
                        message: "no media available".to_string(),
                    };
                    return Vec::new();
                }
                self.start_playing(slides, false)
            }

            Event::FetchFailed(message) => {
                if !matches!(self.state, PlayerState::Loading) {
                    return Vec::new();
                }
                if self.retries < self.config.max_retries {
                    self.retries += 1;
                    tracing::warn!(
                        attempt = self.retries,
                        max = self.config.max_retries,
                        error = %message,
                        "Slide fetch failed, retrying"
                    );
                    vec![Effect::ScheduleRetry(self.config.retry_delay)]
                } else {
                    self.state = PlayerState::Error { message };
                    vec![Effect::ScheduleReload(self.config.reload_delay)]
                }
            }

            Event::SlideTimerFired | Event::VideoEnded => {
                if self.hidden {
                    return Vec::new();
                }
                self.advance()
            }

            Event::MediaFailed => {
                if !matches!(self.state, PlayerState::Playing { .. }) {
                    return Vec::new();
                }
                // Move past the broken slide quickly instead of waiting out
                // the full display time.
                vec![
                    Effect::StopSlideTimer,
                    Effect::StartSlideTimer(self.config.error_skip_delay),
                ]
            }

            Event::RefreshCompleted(slides) => match self.state {
                PlayerState::Playing { .. } => {
                    if slides.len() == self.slides.len() {
                        // Same rotation size: swap contents, keep position
                        self.slides = slides;
                        Vec::new()
                    } else if slides.is_empty() {
                        self.state = PlayerState::Error {
                            message: "no media available".to_string(),
                        };
                        self.slides.clear();
                        vec![Effect::StopSlideTimer]
                    } else {
                        // Set changed: restart from the top
                        let mut effects = vec![Effect::StopSlideTimer];
                        effects.extend(self.start_playing(slides, true));
                        effects
                    }
                }
                // A refresh can recover an empty-feed error
                PlayerState::Error { .. } if !slides.is_empty() => {
                    self.start_playing(slides, false)
                }
                _ => Vec::new(),
            },

            Event::RefreshFailed(message) => {
                tracing::warn!(error = %message, "Slide refresh failed, keeping current rotation");
                Vec::new()
            }

            Event::Hidden => {
                self.hidden = true;
                vec![Effect::StopSlideTimer, Effect::StopRefreshTimer]
            }

            Event::Visible => {
                self.hidden = false;
                match self.state {
                    PlayerState::Playing { index } => {
                        let mut effects = vec![Effect::StartRefreshTimer(
                            self.config.refresh_interval,
                        )];
                        effects.extend(self.slide_timer(index));
                        effects
                    }
                    _ => Vec::new(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide(id: i64, media_type: MediaType, extension: &str) -> Slide {
        Slide {
            id,
            url: format!("http://localhost:3000/storage/uploads/{}.{}", id, extension),
            media_type,
            extension: extension.to_string(),
            filename: format!("{}.{}", id, extension),
            mime_type: "application/octet-stream".to_string(),
            path: format!("uploads/{}.{}", id, extension),
        }
    }

    fn images(n: i64) -> Vec<Slide> {
        (1..=n).map(|i| slide(i, MediaType::Image, "jpg")).collect()
    }

    #[test]
    fn test_empty_list_enters_error_without_timers() {
        let mut player = Player::new(PlayerConfig::default());
        let effects = player.handle(Event::SlidesLoaded(vec![]));

        assert_eq!(
            player.state(),
            &PlayerState::Error {
                message: "no media available".to_string()
            }
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn test_load_shows_first_slide_and_starts_timers() {
        let mut player = Player::new(PlayerConfig::default());
        let effects = player.handle(Event::SlidesLoaded(images(3)));

        assert_eq!(player.state(), &PlayerState::Playing { index: 0 });
        assert_eq!(
            effects,
            vec![
                Effect::ShowSlide {
                    index: 0,
                    transition: false
                },
                Effect::StartSlideTimer(Duration::from_secs(5)),
                Effect::StartRefreshTimer(Duration::from_secs(60)),
            ]
        );
    }

    #[test]
    fn test_advance_wraps_around() {
        let mut player = Player::new(PlayerConfig::default());
        player.handle(Event::SlidesLoaded(images(2)));

        player.handle(Event::SlideTimerFired);
        assert_eq!(player.state(), &PlayerState::Playing { index: 1 });

        let effects = player.handle(Event::SlideTimerFired);
        assert_eq!(player.state(), &PlayerState::Playing { index: 0 });
        assert!(effects.contains(&Effect::ShowSlide {
            index: 0,
            transition: true
        }));
    }

    #[test]
    fn test_transition_schedules_old_slide_removal() {
        let mut player = Player::new(PlayerConfig::default());

        // First slide appears without a cross-fade, nothing to remove
        let effects = player.handle(Event::SlidesLoaded(images(2)));
        assert!(!effects
            .iter()
            .any(|e| matches!(e, Effect::RemoveOldSlide(_))));

        // Advancing cross-fades, so the outgoing slide gets a removal delay
        let effects = player.handle(Event::SlideTimerFired);
        assert!(effects.contains(&Effect::RemoveOldSlide(Duration::from_millis(1500))));

        // A rotation restart after a set change cross-fades too
        let effects = player.handle(Event::RefreshCompleted(images(4)));
        assert!(effects.contains(&Effect::RemoveOldSlide(Duration::from_millis(1500))));
    }

    #[test]
    fn test_video_gets_no_slide_timer_and_advances_on_end() {
        let mut player = Player::new(PlayerConfig::default());
        let slides = vec![slide(1, MediaType::Video, "mp4"), slide(2, MediaType::Image, "png")];
        let effects = player.handle(Event::SlidesLoaded(slides));

        assert!(!effects
            .iter()
            .any(|e| matches!(e, Effect::StartSlideTimer(_))));

        let effects = player.handle(Event::VideoEnded);
        assert_eq!(player.state(), &PlayerState::Playing { index: 1 });
        assert!(effects.contains(&Effect::StartSlideTimer(Duration::from_secs(5))));
    }

    #[test]
    fn test_media_failure_schedules_quick_skip() {
        let mut player = Player::new(PlayerConfig::default());
        player.handle(Event::SlidesLoaded(images(2)));

        let effects = player.handle(Event::MediaFailed);
        assert_eq!(
            effects,
            vec![
                Effect::StopSlideTimer,
                Effect::StartSlideTimer(Duration::from_secs(1)),
            ]
        );
        // Still on the same slide until the skip timer fires
        assert_eq!(player.state(), &PlayerState::Playing { index: 0 });
    }

    #[test]
    fn test_refresh_same_size_keeps_position() {
        let mut player = Player::new(PlayerConfig::default());
        player.handle(Event::SlidesLoaded(images(3)));
        player.handle(Event::SlideTimerFired);

        let effects = player.handle(Event::RefreshCompleted(images(3)));
        assert!(effects.is_empty());
        assert_eq!(player.state(), &PlayerState::Playing { index: 1 });
    }

    #[test]
    fn test_refresh_size_change_restarts_at_zero() {
        let mut player = Player::new(PlayerConfig::default());
        player.handle(Event::SlidesLoaded(images(3)));
        player.handle(Event::SlideTimerFired);

        let effects = player.handle(Event::RefreshCompleted(images(5)));
        assert_eq!(player.state(), &PlayerState::Playing { index: 0 });
        assert!(effects.contains(&Effect::ShowSlide {
            index: 0,
            transition: true
        }));
        assert_eq!(player.slides().len(), 5);
    }

    #[test]
    fn test_refresh_to_empty_enters_error() {
        let mut player = Player::new(PlayerConfig::default());
        player.handle(Event::SlidesLoaded(images(2)));

        let effects = player.handle(Event::RefreshCompleted(vec![]));
        assert_eq!(
            player.state(),
            &PlayerState::Error {
                message: "no media available".to_string()
            }
        );
        assert_eq!(effects, vec![Effect::StopSlideTimer]);
    }

    #[test]
    fn test_refresh_recovers_from_empty_feed_error() {
        let mut player = Player::new(PlayerConfig::default());
        player.handle(Event::SlidesLoaded(vec![]));

        let effects = player.handle(Event::RefreshCompleted(images(1)));
        assert_eq!(player.state(), &PlayerState::Playing { index: 0 });
        assert!(!effects.is_empty());
    }

    #[test]
    fn test_fetch_failures_retry_then_reload() {
        let mut player = Player::new(PlayerConfig::default());

        for _ in 0..3 {
            let effects = player.handle(Event::FetchFailed("timeout".to_string()));
            assert_eq!(effects, vec![Effect::ScheduleRetry(Duration::from_secs(5))]);
            assert_eq!(player.state(), &PlayerState::Loading);
        }

        let effects = player.handle(Event::FetchFailed("timeout".to_string()));
        assert_eq!(
            effects,
            vec![Effect::ScheduleReload(Duration::from_secs(10))]
        );
        assert_eq!(
            player.state(),
            &PlayerState::Error {
                message: "timeout".to_string()
            }
        );
    }

    #[test]
    fn test_hidden_stops_timers_and_visible_restarts() {
        let mut player = Player::new(PlayerConfig::default());
        player.handle(Event::SlidesLoaded(images(2)));

        let effects = player.handle(Event::Hidden);
        assert_eq!(
            effects,
            vec![Effect::StopSlideTimer, Effect::StopRefreshTimer]
        );

        // Timer events are ignored while hidden
        assert!(player.handle(Event::SlideTimerFired).is_empty());
        assert_eq!(player.state(), &PlayerState::Playing { index: 0 });

        let effects = player.handle(Event::Visible);
        assert!(effects.contains(&Effect::StartRefreshTimer(Duration::from_secs(60))));
        assert!(effects.contains(&Effect::StartSlideTimer(Duration::from_secs(5))));
    }

    #[test]
    fn test_visible_on_video_slide_skips_slide_timer() {
        let mut player = Player::new(PlayerConfig::default());
        player.handle(Event::SlidesLoaded(vec![slide(1, MediaType::Video, "mp4")]));
        player.handle(Event::Hidden);

        let effects = player.handle(Event::Visible);
        assert_eq!(
            effects,
            vec![Effect::StartRefreshTimer(Duration::from_secs(60))]
        );
    }
}
