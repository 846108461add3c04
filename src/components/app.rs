use crate::api::{ActionId, BarGeometry, PlaybackEndpoint, RemoteClient, SessionAction};
use crate::components::controls::{ActionButton, ProgressBar};
use crate::components::playback_controller::*;
use crate::config::PanelConfig;
use dioxus::core::{spawn_forever, Runtime, RuntimeGuard};
use dioxus::prelude::*;
use std::rc::Rc;
use tracing::warn;

pub type PanelController =
    PlaybackViewController<RemoteClient, SignalPanelView, PlatformMediaSession, SystemClock>;

const PLACEHOLDER_TIME: &str = "--:--:--";

#[component]
pub fn RemotePanel() -> Element {
    let config = use_hook(PanelConfig::resolve);
    let client = use_hook(|| RemoteClient::new(config.base_url.clone()));
    let silence = use_hook(silent_wav_data_url);

    let elapsed = use_signal(|| PLACEHOLDER_TIME.to_string());
    let total = use_signal(|| PLACEHOLDER_TIME.to_string());
    let progress = use_signal(|| 0.0f64);
    let images = use_signal(|| vec![client.screenshot_url()]);
    let mut session_active = use_signal(|| false);

    let controller: Rc<PanelController> = use_hook(|| {
        Rc::new(PlaybackViewController::new(
            client.clone(),
            SignalPanelView {
                elapsed,
                total,
                progress,
                images,
            },
            PlatformMediaSession::new(AUDIO_ELEMENT_ID),
            SystemClock,
            config.clone(),
            vec![client.screenshot_url()],
        ))
    });

    // Status/image timers for the lifetime of the panel.
    {
        let controller = controller.clone();
        use_effect(move || {
            let controller = controller.clone();
            spawn(async move {
                let status = IntervalTicker::new(controller.config().status_interval_ms);
                let image = IntervalTicker::new(controller.config().image_interval_ms);
                controller.start(status, image).await;
            });
        });
    }

    // Media session handlers fire from browser callbacks, outside any
    // component scope, so they re-enter the runtime before spawning.
    let ensure_media_session = {
        let controller = controller.clone();
        move || {
            if controller.media_session_enabled() {
                return;
            }
            let runtime = Runtime::current();
            let target = controller.clone();
            let handler: SessionHandler = Rc::new(move |action: SessionAction| {
                let _guard = RuntimeGuard::new(runtime.clone());
                let target = target.clone();
                let _ = spawn_forever(async move {
                    target.handle_session_action(action).await;
                });
            });
            if controller.enable_media_session(handler) {
                session_active.set(true);
            }
        }
    };

    let on_action = {
        let controller = controller.clone();
        let mut ensure_media_session = ensure_media_session.clone();
        move |token: &'static str| {
            let action = match token.parse::<ActionId>() {
                Ok(action) => action,
                Err(err) => {
                    warn!("ignoring button: {err}");
                    return;
                }
            };
            ensure_media_session();
            let controller = controller.clone();
            spawn(async move {
                let _ = controller.dispatch_action(action).await;
            });
        }
    };

    let on_seek = {
        let controller = controller.clone();
        let mut ensure_media_session = ensure_media_session.clone();
        move |(click_x, bar): (f64, BarGeometry)| {
            ensure_media_session();
            let controller = controller.clone();
            spawn(async move {
                let _ = controller.handle_seek(click_x, bar).await;
            });
        }
    };

    rsx! {
        main { class: "panel",
            div { class: "screen",
                for (index, src) in images().into_iter().enumerate() {
                    img {
                        key: "{index}",
                        class: "screenshot",
                        src: "{src}",
                        alt: "Current frame",
                    }
                }
            }
            div { class: "times",
                span { id: "current", "{elapsed}" }
                span { class: "separator", "/" }
                span { id: "total", "{total}" }
            }
            ProgressBar { progress, onseek: on_seek }
            div { class: "actions",
                for action in ActionId::BUTTONS {
                    ActionButton {
                        key: "{action}",
                        action: action,
                        onpress: on_action.clone(),
                    }
                }
            }
            if session_active() {
                p { class: "session-badge", "Media keys linked" }
            }
            audio {
                id: AUDIO_ELEMENT_ID,
                src: "{silence}",
                r#loop: true,
                muted: true,
                preload: "auto",
            }
        }
    }
}
