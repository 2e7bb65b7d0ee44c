//! Vitrine Slideshow Player
//!
//! Kiosk-style client for the public slideshow feed. The playback logic is a
//! pure state machine ([`player::Player`]) that consumes events and emits
//! timer/display effects; the tokio runtime ([`runtime::Runtime`]) owns the
//! actual clocks and the HTTP fetcher. Keeping time out of the machine makes
//! every transition testable without sleeping.

pub mod config;
pub mod fetcher;
pub mod player;
pub mod runtime;

pub use config::PlayerConfig;
pub use fetcher::{HttpSlideFetcher, SlideFetcher};
pub use player::{Effect, Event, Player, PlayerState};
pub use runtime::Runtime;
