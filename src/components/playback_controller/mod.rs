//! Playback controller - keeps the panel in sync with the remote player and
//! relays transport commands. Browser/desktop specifics sit behind the traits
//! below so the controller itself is target independent.

use crate::api::SessionAction;
use std::rc::Rc;

mod clock;
mod controller;
mod media_session;
mod view;

#[cfg(test)]
mod testing;

pub use clock::*;
pub use controller::*;
pub use media_session::*;
pub use view::*;

/// Where the controller renders status and image sources.
pub trait PanelView {
    fn set_elapsed(&self, text: &str);
    fn set_total(&self, text: &str);
    /// Filled width of the progress bar, in percent.
    fn set_progress(&self, percent: f64);
    fn set_image_source(&self, index: usize, src: &str);
}

/// Callback invoked when the OS fires a bound media-session action.
pub type SessionHandler = Rc<dyn Fn(SessionAction)>;

/// OS-level now-playing integration plus the local audio element backing it.
pub trait MediaSession {
    fn is_supported(&self) -> bool;
    /// Unmute and start the local audio element.
    fn start_local_audio(&self);
    fn pause_local_audio(&self);
    fn set_metadata(&self, title: &str, artwork_url: &str);
    fn set_playback_state(&self, playing: bool);
    fn set_position_state(&self, duration_s: f64, position_s: f64);
    fn bind_action(&self, action: SessionAction, handler: SessionHandler);
}

pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

/// Source of timer ticks. `false` ends the loop driven by it.
#[allow(async_fn_in_trait)]
pub trait Ticker {
    async fn tick(&mut self) -> bool;
}
