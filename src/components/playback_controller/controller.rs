use super::{Clock, MediaSession, PanelView, SessionHandler, Ticker};
use crate::api::{ActionId, BarGeometry, PlaybackEndpoint, PlaybackStatus, SessionAction};
use crate::config::PanelConfig;
use crate::error::Result;
use futures_util::future::{self, Either};
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::cell::Cell;
use std::pin::pin;
use tracing::{debug, info, warn};

/// Outcome of a status poll that reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate {
    Applied,
    /// A newer poll already rendered; this response was dropped.
    Stale,
}

/// Keeps a [`PanelView`] synchronized with the remote player.
///
/// All state lives in `Cell`s: the controller is shared through an `Rc` on a
/// single-threaded executor, and several of its futures (timer ticks, clicks,
/// media-session handlers) may be in flight at once.
pub struct PlaybackViewController<E, V, S, C> {
    endpoint: E,
    view: V,
    session: S,
    clock: C,
    config: PanelConfig,
    images: Vec<String>,
    last_image_refresh: Cell<Option<f64>>,
    image_generation: Cell<u64>,
    status_issued: Cell<u64>,
    status_applied: Cell<u64>,
    media_session_enabled: Cell<bool>,
}

impl<E, V, S, C> PlaybackViewController<E, V, S, C>
where
    E: PlaybackEndpoint,
    V: PanelView,
    S: MediaSession,
    C: Clock,
{
    /// `images` are the base sources of every view-bound image; index `i` is
    /// written back through [`PanelView::set_image_source`].
    pub fn new(
        endpoint: E,
        view: V,
        session: S,
        clock: C,
        config: PanelConfig,
        images: Vec<String>,
    ) -> Self {
        Self {
            endpoint,
            view,
            session,
            clock,
            config,
            images,
            last_image_refresh: Cell::new(None),
            image_generation: Cell::new(0),
            status_issued: Cell::new(0),
            status_applied: Cell::new(0),
            media_session_enabled: Cell::new(false),
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn media_session_enabled(&self) -> bool {
        self.media_session_enabled.get()
    }

    /// Poll `/times` and render the result.
    ///
    /// A failed poll leaves the view as it was. Responses that come back after
    /// a newer poll has been rendered are discarded.
    pub async fn refresh_status(&self) -> Result<StatusUpdate> {
        let ticket = self.status_issued.get() + 1;
        self.status_issued.set(ticket);

        let status = match self.endpoint.fetch_status().await {
            Ok(status) => status,
            Err(err) => {
                warn!("status refresh failed: {err}");
                return Err(err);
            }
        };

        if ticket < self.status_applied.get() {
            debug!(ticket, applied = self.status_applied.get(), "dropping stale status");
            return Ok(StatusUpdate::Stale);
        }
        self.status_applied.set(ticket);
        self.apply_status(&status);
        Ok(StatusUpdate::Applied)
    }

    fn apply_status(&self, status: &PlaybackStatus) {
        self.view.set_elapsed(&status.current);
        self.view.set_total(&status.total);
        self.view.set_progress(status.perc);

        if self.session.is_supported() {
            if let Some((duration, position)) = status.position_state() {
                self.session.set_position_state(duration, position);
            }
        }
    }

    /// Point every image at a freshly cache-busted source.
    pub fn refresh_image(&self) {
        let now = self.clock.now_ms();
        let generation = self.image_generation.get() + 1;
        self.image_generation.set(generation);

        let token = format!("{}-{}", now.max(0.0) as u64, generation);
        for (index, base) in self.images.iter().enumerate() {
            self.view.set_image_source(index, &cache_busted(base, &token));
        }
        self.last_image_refresh.set(Some(now));
    }

    /// One tick of the image timer. Returns whether the screenshot was reloaded.
    pub fn image_tick(&self) -> bool {
        let due = match self.last_image_refresh.get() {
            None => true,
            Some(last) => self.clock.now_ms() - last > f64::from(self.config.image_min_age_ms),
        };
        if due {
            self.refresh_image();
        }
        due
    }

    /// Runs the status and image timers until both tickers are exhausted.
    pub async fn periodic_refresh<T: Ticker, U: Ticker>(
        &self,
        status_ticker: T,
        image_ticker: U,
    ) {
        future::join(
            self.run_status_timer(status_ticker),
            self.run_image_timer(image_ticker),
        )
        .await;
    }

    /// Initial poll for when the panel becomes interactive, then the timers.
    pub async fn start<T: Ticker, U: Ticker>(&self, status_ticker: T, image_ticker: U) {
        info!(base_url = %self.config.base_url, "starting playback sync");
        let _ = self.refresh_status().await;
        self.periodic_refresh(status_ticker, image_ticker).await;
    }

    // Polls are not serialized: a slow `/times` must not delay the next tick,
    // so in-flight requests are driven alongside the ticker.
    async fn run_status_timer<T: Ticker>(&self, mut ticker: T) {
        let mut in_flight = FuturesUnordered::new();
        loop {
            let ticked = {
                let mut tick = pin!(ticker.tick());
                loop {
                    if in_flight.is_empty() {
                        break tick.as_mut().await;
                    }
                    match future::select(tick.as_mut(), in_flight.next()).await {
                        Either::Left((more, _)) => break more,
                        Either::Right(_) => continue,
                    }
                }
            };
            if !ticked {
                break;
            }
            in_flight.push(self.refresh_status());
        }
        while in_flight.next().await.is_some() {}
    }

    async fn run_image_timer<T: Ticker>(&self, mut ticker: T) {
        while ticker.tick().await {
            self.image_tick();
        }
    }

    /// Seek to the clicked point of the progress bar.
    ///
    /// Returns the percentage sent to the server. The screenshot reloads as
    /// soon as the seek completes, regardless of the image throttle.
    pub async fn handle_seek(&self, click_x: f64, bar: BarGeometry) -> Result<f64> {
        let position = bar.percent_at(click_x, self.config.clamp_seek)?;
        info!(position, "seeking");
        if let Err(err) = self
            .endpoint
            .send_action(ActionId::Seek, Some(position))
            .await
        {
            warn!("seek failed: {err}");
            return Err(err);
        }
        self.refresh_image();
        Ok(position)
    }

    /// Send a transport command, then refresh status and screenshot.
    pub async fn dispatch_action(&self, action: ActionId) -> Result<()> {
        info!(%action, "dispatching action");
        if let Err(err) = self.endpoint.send_action(action, None).await {
            warn!(%action, "action failed: {err}");
            return Err(err);
        }

        if self.media_session_enabled.get() && self.session.is_supported() {
            match action {
                ActionId::Play => self.session.set_playback_state(true),
                ActionId::Pause => self.session.set_playback_state(false),
                _ => {}
            }
        }

        self.refresh_image();
        let _ = self.refresh_status().await;
        Ok(())
    }

    /// Start local audio and register with the OS media controls.
    ///
    /// Browsers only allow this from a user gesture, so it is called from
    /// click handlers. Runs once; returns `false` on every later call.
    pub fn enable_media_session(&self, handler: SessionHandler) -> bool {
        if self.media_session_enabled.replace(true) {
            return false;
        }

        self.session.start_local_audio();
        if self.session.is_supported() {
            info!("registering media session");
            self.session
                .set_metadata(&self.config.title, &self.endpoint.screenshot_url());
            for action in SessionAction::ALL {
                self.session.bind_action(action, handler.clone());
            }
        } else {
            debug!("media session unavailable");
        }
        true
    }

    /// What a bound media-session handler does.
    pub async fn handle_session_action(&self, action: SessionAction) {
        debug!(action = action.as_str(), "media session action");
        match action {
            SessionAction::Play => self.session.start_local_audio(),
            SessionAction::Pause => self.session.pause_local_audio(),
            SessionAction::SeekBackward | SessionAction::PreviousTrack => {}
        }
        let _ = self.dispatch_action(action.remote_action()).await;
    }
}

#[cfg(test)]
impl<E, V, S, C> PlaybackViewController<E, V, S, C> {
    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn last_image_refresh(&self) -> Option<f64> {
        self.last_image_refresh.get()
    }
}

fn cache_busted(src: &str, token: &str) -> String {
    let separator = if src.contains('?') { '&' } else { '?' };
    format!("{src}{separator}{token}")
}
