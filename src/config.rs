//! Panel settings: where the server lives and how often to poll it.
use crate::error::Result;
use serde::Deserialize;

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Origin of the remote control server, without trailing slash.
    pub base_url: String,
    /// Period of the `/times` poll.
    pub status_interval_ms: u32,
    /// Period of the screenshot staleness check.
    pub image_interval_ms: u32,
    /// A timer tick only reloads the screenshot once it is older than this.
    pub image_min_age_ms: u32,
    /// Title shown by the OS media controls.
    pub title: String,
    /// Keep seek positions within `[0, 100]`.
    pub clamp_seek: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            status_interval_ms: 1000,
            image_interval_ms: 1000,
            image_min_age_ms: 3000,
            title: "mpv".to_string(),
            clamp_seek: true,
        }
    }
}

impl PanelConfig {
    /// Parse a (possibly partial) JSON override; missing keys keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Same-origin server, optionally overridden by a
    /// `<script id="panel-config" type="application/json">` block in the page.
    #[cfg(target_arch = "wasm32")]
    pub fn resolve() -> Self {
        let document = web_sys::window().and_then(|w| w.document());
        let mut config = document
            .as_ref()
            .and_then(|doc| doc.get_element_by_id("panel-config"))
            .and_then(|el| el.text_content())
            .and_then(|raw| match Self::from_json(&raw) {
                Ok(config) => Some(config),
                Err(err) => {
                    tracing::warn!("ignoring panel-config block: {err}");
                    None
                }
            })
            .unwrap_or_default();

        if config.base_url.trim().is_empty() {
            config.base_url = web_sys::window()
                .and_then(|w| w.location().origin().ok())
                .unwrap_or_default();
        }
        config
    }

    /// `MPV_REMOTE_CONFIG` may point at a JSON file; `MPV_REMOTE_URL` wins for the server address.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn resolve() -> Self {
        let mut config = std::env::var("MPV_REMOTE_CONFIG")
            .ok()
            .and_then(|path| match std::fs::read_to_string(&path) {
                Ok(raw) => match Self::from_json(&raw) {
                    Ok(config) => Some(config),
                    Err(err) => {
                        tracing::warn!(%path, "ignoring config file: {err}");
                        None
                    }
                },
                Err(err) => {
                    tracing::warn!(%path, "cannot read config file: {err}");
                    None
                }
            })
            .unwrap_or_default();

        if let Ok(url) = std::env::var("MPV_REMOTE_URL") {
            config.base_url = url;
        }
        if config.base_url.trim().is_empty() {
            config.base_url = DEFAULT_BASE_URL.to_string();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PanelError;

    #[test]
    fn defaults_match_remote_timings() {
        let config = PanelConfig::default();
        assert_eq!(config.status_interval_ms, 1000);
        assert_eq!(config.image_interval_ms, 1000);
        assert_eq!(config.image_min_age_ms, 3000);
        assert!(config.clamp_seek);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config =
            PanelConfig::from_json(r#"{"base_url":"http://tv:3000","image_min_age_ms":5000}"#)
                .unwrap();
        assert_eq!(config.base_url, "http://tv:3000");
        assert_eq!(config.image_min_age_ms, 5000);
        assert_eq!(config.status_interval_ms, 1000);
        assert_eq!(config.title, "mpv");
    }

    #[test]
    fn bad_override_is_reported() {
        assert!(matches!(
            PanelConfig::from_json("{not json"),
            Err(PanelError::Config(_))
        ));
    }
}
