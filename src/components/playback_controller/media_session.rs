// OS media controls. The browser only shows them while a local <audio> element
// is playing, so the panel loops a short silent clip next to the session.
use super::{MediaSession, SessionHandler};
use crate::api::SessionAction;
use base64::Engine;

#[cfg(target_arch = "wasm32")]
use js_sys::{Array, Function, Object, Reflect};
#[cfg(target_arch = "wasm32")]
use tracing::warn;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use web_sys::{window, HtmlAudioElement};

pub const AUDIO_ELEMENT_ID: &str = "panel-audio";

const SILENCE_SAMPLE_RATE: u32 = 8_000;
const SILENCE_SAMPLES: u32 = 4_000;

/// Half a second of 8-bit mono silence as a `data:` URL.
pub fn silent_wav_data_url() -> String {
    let data_len = SILENCE_SAMPLES;
    let mut wav = Vec::with_capacity(44 + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVEfmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&SILENCE_SAMPLE_RATE.to_le_bytes());
    wav.extend_from_slice(&SILENCE_SAMPLE_RATE.to_le_bytes()); // byte rate
    wav.extend_from_slice(&1u16.to_le_bytes()); // block align
    wav.extend_from_slice(&8u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    // Unsigned 8-bit PCM is centered on 128.
    wav.resize(44 + data_len as usize, 0x80);

    format!(
        "data:audio/wav;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&wav)
    )
}

/// `navigator.mediaSession`, driven through `Reflect` so browsers lacking
/// parts of the API degrade to no-ops instead of throwing.
#[cfg(target_arch = "wasm32")]
pub struct BrowserMediaSession {
    audio_id: &'static str,
}

#[cfg(target_arch = "wasm32")]
impl BrowserMediaSession {
    pub fn new(audio_id: &'static str) -> Self {
        Self { audio_id }
    }

    fn session(&self) -> Option<JsValue> {
        let navigator = window()?.navigator();
        let session = Reflect::get(&navigator, &JsValue::from_str("mediaSession")).ok()?;
        if session.is_undefined() || session.is_null() {
            None
        } else {
            Some(session)
        }
    }

    fn audio(&self) -> Option<HtmlAudioElement> {
        window()?
            .document()?
            .get_element_by_id(self.audio_id)?
            .dyn_into::<HtmlAudioElement>()
            .ok()
    }

    fn method(session: &JsValue, name: &str) -> Option<Function> {
        Reflect::get(session, &JsValue::from_str(name))
            .ok()?
            .dyn_into::<Function>()
            .ok()
    }
}

#[cfg(target_arch = "wasm32")]
fn object(entries: &[(&str, JsValue)]) -> Object {
    let object = Object::new();
    for (key, value) in entries {
        let _ = Reflect::set(&object, &JsValue::from_str(key), value);
    }
    object
}

#[cfg(target_arch = "wasm32")]
impl MediaSession for BrowserMediaSession {
    fn is_supported(&self) -> bool {
        self.session().is_some()
    }

    fn start_local_audio(&self) {
        let Some(audio) = self.audio() else {
            warn!(id = self.audio_id, "audio element missing");
            return;
        };
        audio.set_muted(false);
        match audio.play() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                if let Err(err) = wasm_bindgen_futures::JsFuture::from(promise).await {
                    warn!("local audio refused to play: {err:?}");
                }
            }),
            Err(err) => warn!("local audio refused to play: {err:?}"),
        }
    }

    fn pause_local_audio(&self) {
        if let Some(audio) = self.audio() {
            let _ = audio.pause();
        }
    }

    fn set_metadata(&self, title: &str, artwork_url: &str) {
        let Some(session) = self.session() else {
            return;
        };
        let Some(ctor) = window()
            .and_then(|w| Reflect::get(&w, &JsValue::from_str("MediaMetadata")).ok())
            .and_then(|c| c.dyn_into::<Function>().ok())
        else {
            return;
        };

        let artwork = Array::of1(&object(&[
            ("src", JsValue::from_str(artwork_url)),
            ("type", JsValue::from_str("image/jpeg")),
        ]));
        let init = object(&[
            ("title", JsValue::from_str(title)),
            ("artwork", artwork.into()),
        ]);
        match Reflect::construct(&ctor, &Array::of1(&init)) {
            Ok(metadata) => {
                let _ = Reflect::set(&session, &JsValue::from_str("metadata"), &metadata);
            }
            Err(err) => warn!("MediaMetadata rejected: {err:?}"),
        }
    }

    fn set_playback_state(&self, playing: bool) {
        if let Some(session) = self.session() {
            let state = if playing { "playing" } else { "paused" };
            let _ = Reflect::set(
                &session,
                &JsValue::from_str("playbackState"),
                &JsValue::from_str(state),
            );
        }
    }

    fn set_position_state(&self, duration_s: f64, position_s: f64) {
        let Some(session) = self.session() else {
            return;
        };
        let Some(set_position_state) = Self::method(&session, "setPositionState") else {
            return;
        };
        let state = object(&[
            ("duration", JsValue::from_f64(duration_s)),
            ("playbackRate", JsValue::from_f64(1.0)),
            ("position", JsValue::from_f64(position_s)),
        ]);
        if let Err(err) = set_position_state.call1(&session, &state) {
            warn!("setPositionState rejected: {err:?}");
        }
    }

    fn bind_action(&self, action: SessionAction, handler: SessionHandler) {
        let Some(session) = self.session() else {
            return;
        };
        let Some(set_action_handler) = Self::method(&session, "setActionHandler") else {
            return;
        };
        let callback = Closure::<dyn FnMut()>::new(move || handler(action));
        // Unsupported actions throw; the remaining ones still get bound.
        if let Err(err) = set_action_handler.call2(
            &session,
            &JsValue::from_str(action.as_str()),
            callback.as_ref().unchecked_ref(),
        ) {
            warn!(action = action.as_str(), "setActionHandler rejected: {err:?}");
        }
        callback.forget();
    }
}

/// Desktop webviews expose no media session to the page.
#[cfg(not(target_arch = "wasm32"))]
pub struct DesktopMediaSession;

#[cfg(not(target_arch = "wasm32"))]
impl DesktopMediaSession {
    pub fn new(_audio_id: &'static str) -> Self {
        Self
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl MediaSession for DesktopMediaSession {
    fn is_supported(&self) -> bool {
        false
    }

    fn start_local_audio(&self) {}

    fn pause_local_audio(&self) {}

    fn set_metadata(&self, _title: &str, _artwork_url: &str) {}

    fn set_playback_state(&self, _playing: bool) {}

    fn set_position_state(&self, _duration_s: f64, _position_s: f64) {}

    fn bind_action(&self, _action: SessionAction, _handler: SessionHandler) {}
}

#[cfg(target_arch = "wasm32")]
pub type PlatformMediaSession = BrowserMediaSession;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformMediaSession = DesktopMediaSession;
