//! In-memory stand-ins for the controller's collaborators.
use super::*;
use crate::api::{ActionId, PlaybackEndpoint, PlaybackStatus, SessionAction};
use crate::config::PanelConfig;
use crate::error::{PanelError, Result};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use tokio::sync::oneshot;

pub type TestController =
    PlaybackViewController<MockEndpoint, MockView, MockSession, Rc<ManualClock>>;

impl PlaybackViewController<MockEndpoint, MockView, MockSession, Rc<ManualClock>> {
    pub fn build(session: MockSession) -> Self {
        Self::with_images(session, vec!["/screenshot".to_string()])
    }

    pub fn with_images(session: MockSession, images: Vec<String>) -> Self {
        let view = MockView::new(&images);
        Self::new(
            MockEndpoint::default(),
            view,
            session,
            Rc::new(ManualClock::default()),
            PanelConfig {
                base_url: "http://mpv.test".to_string(),
                ..PanelConfig::default()
            },
            images,
        )
    }
}

enum StatusReply {
    Ready(Result<PlaybackStatus>),
    Deferred(oneshot::Receiver<Result<PlaybackStatus>>),
}

/// Serves queued `/times` replies, then a fixed idle status.
#[derive(Default)]
pub struct MockEndpoint {
    replies: RefCell<VecDeque<StatusReply>>,
    status_calls: Cell<usize>,
    actions: RefCell<Vec<(ActionId, Option<f64>)>>,
    fail_actions: Cell<bool>,
}

impl MockEndpoint {
    pub fn reply(&self, result: Result<PlaybackStatus>) {
        self.replies
            .borrow_mut()
            .push_back(StatusReply::Ready(result));
    }

    /// Next poll resolves only when the paired sender fires.
    pub fn defer(&self, receiver: oneshot::Receiver<Result<PlaybackStatus>>) {
        self.replies
            .borrow_mut()
            .push_back(StatusReply::Deferred(receiver));
    }

    pub fn fail_actions(&self) {
        self.fail_actions.set(true);
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.get()
    }

    pub fn actions(&self) -> Vec<(ActionId, Option<f64>)> {
        self.actions.borrow().clone()
    }

    fn idle_status() -> PlaybackStatus {
        PlaybackStatus {
            current: "00:00:00".to_string(),
            total: "00:24:10".to_string(),
            perc: 0.0,
            current_s: 0.0,
            total_s: 1450.0,
        }
    }
}

impl PlaybackEndpoint for MockEndpoint {
    async fn fetch_status(&self) -> Result<PlaybackStatus> {
        self.status_calls.set(self.status_calls.get() + 1);
        let reply = self.replies.borrow_mut().pop_front();
        match reply {
            None => Ok(Self::idle_status()),
            Some(StatusReply::Ready(result)) => result,
            Some(StatusReply::Deferred(receiver)) => {
                receiver.await.unwrap_or_else(|_| {
                    Err(PanelError::Status {
                        url: "/times".to_string(),
                        status: 504,
                    })
                })
            }
        }
    }

    async fn send_action(&self, action: ActionId, position: Option<f64>) -> Result<()> {
        self.actions.borrow_mut().push((action, position));
        if self.fail_actions.get() {
            return Err(PanelError::Status {
                url: format!("/action/{action}"),
                status: 500,
            });
        }
        Ok(())
    }

    fn screenshot_url(&self) -> String {
        "http://mpv.test/screenshot".to_string()
    }
}

pub struct MockView {
    elapsed: RefCell<String>,
    total: RefCell<String>,
    progress: Cell<f64>,
    images: RefCell<Vec<String>>,
    image_writes: Cell<usize>,
}

impl MockView {
    fn new(images: &[String]) -> Self {
        Self {
            elapsed: RefCell::default(),
            total: RefCell::default(),
            progress: Cell::new(0.0),
            images: RefCell::new(images.to_vec()),
            image_writes: Cell::new(0),
        }
    }

    pub fn elapsed(&self) -> String {
        self.elapsed.borrow().clone()
    }

    pub fn total(&self) -> String {
        self.total.borrow().clone()
    }

    pub fn progress(&self) -> f64 {
        self.progress.get()
    }

    pub fn images(&self) -> Vec<String> {
        self.images.borrow().clone()
    }

    /// Number of refresh passes; each pass rewrites every image.
    pub fn image_writes(&self) -> usize {
        let images = self.images.borrow().len().max(1);
        self.image_writes.get() / images
    }
}

impl PanelView for MockView {
    fn set_elapsed(&self, text: &str) {
        *self.elapsed.borrow_mut() = text.to_string();
    }

    fn set_total(&self, text: &str) {
        *self.total.borrow_mut() = text.to_string();
    }

    fn set_progress(&self, percent: f64) {
        self.progress.set(percent);
    }

    fn set_image_source(&self, index: usize, src: &str) {
        if let Some(slot) = self.images.borrow_mut().get_mut(index) {
            *slot = src.to_string();
        }
        self.image_writes.set(self.image_writes.get() + 1);
    }
}

/// Records every call as a short string.
pub struct MockSession {
    supported: bool,
    calls: RefCell<Vec<String>>,
    handlers: RefCell<Vec<(SessionAction, SessionHandler)>>,
}

impl MockSession {
    pub fn supported() -> Self {
        Self::new(true)
    }

    pub fn unsupported() -> Self {
        Self::new(false)
    }

    fn new(supported: bool) -> Self {
        Self {
            supported,
            calls: RefCell::default(),
            handlers: RefCell::default(),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Simulate the OS invoking a registered handler.
    pub fn fire(&self, action: SessionAction) {
        let handler = self
            .handlers
            .borrow()
            .iter()
            .find(|(bound, _)| *bound == action)
            .map(|(_, handler)| handler.clone());
        if let Some(handler) = handler {
            handler(action);
        }
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl MediaSession for MockSession {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn start_local_audio(&self) {
        self.record("start_audio".to_string());
    }

    fn pause_local_audio(&self) {
        self.record("pause_audio".to_string());
    }

    fn set_metadata(&self, title: &str, artwork_url: &str) {
        self.record(format!("metadata:{title}:{artwork_url}"));
    }

    fn set_playback_state(&self, playing: bool) {
        let state = if playing { "playing" } else { "paused" };
        self.record(format!("state:{state}"));
    }

    fn set_position_state(&self, duration_s: f64, position_s: f64) {
        self.record(format!("position:{duration_s}:{position_s}"));
    }

    fn bind_action(&self, action: SessionAction, handler: SessionHandler) {
        self.record(format!("bind:{}", action.as_str()));
        self.handlers.borrow_mut().push((action, handler));
    }
}

#[derive(Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Fires a fixed number of ticks without touching any clock.
pub struct CountingTicker {
    remaining: usize,
}

impl CountingTicker {
    pub fn new(ticks: usize) -> Self {
        Self { remaining: ticks }
    }
}

impl Ticker for CountingTicker {
    async fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Moves a shared clock to each scripted time before ticking.
pub struct ClockTicker {
    clock: Rc<ManualClock>,
    times: VecDeque<f64>,
}

impl ClockTicker {
    pub fn new(clock: Rc<ManualClock>, times: impl IntoIterator<Item = f64>) -> Self {
        Self {
            clock,
            times: times.into_iter().collect(),
        }
    }
}

impl Ticker for ClockTicker {
    async fn tick(&mut self) -> bool {
        match self.times.pop_front() {
            Some(t) => {
                self.clock.set(t);
                true
            }
            None => false,
        }
    }
}
