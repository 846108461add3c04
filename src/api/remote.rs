use crate::api::models::*;
use crate::error::{PanelError, Result};
use once_cell::sync::Lazy;
use tracing::debug;

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// The remote control server as seen by the panel.
#[allow(async_fn_in_trait)]
pub trait PlaybackEndpoint {
    /// `GET /times`
    async fn fetch_status(&self) -> Result<PlaybackStatus>;

    /// `GET /action/{id}`, with `position` attached for seeks. The body is ignored.
    async fn send_action(&self, action: ActionId, position: Option<f64>) -> Result<()>;

    /// Absolute URL of the screenshot image.
    fn screenshot_url(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct RemoteClient {
    base_url: String,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn times_url(&self) -> String {
        format!("{}/times", self.base_url)
    }

    pub fn action_url(&self, action: ActionId, position: Option<f64>) -> String {
        match position {
            Some(position) => format!(
                "{}/action/{}?position={}",
                self.base_url,
                action.as_str(),
                position
            ),
            None => format!("{}/action/{}", self.base_url, action.as_str()),
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        debug!(url, "GET");
        let response = HTTP_CLIENT
            .get(url)
            .send()
            .await
            .map_err(|source| PanelError::Transport {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(PanelError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }
}

impl PlaybackEndpoint for RemoteClient {
    async fn fetch_status(&self) -> Result<PlaybackStatus> {
        let url = self.times_url();
        let body = self
            .get(&url)
            .await?
            .text()
            .await
            .map_err(|source| PanelError::Transport {
                url: url.clone(),
                source,
            })?;
        PlaybackStatus::from_json(&url, &body)
    }

    async fn send_action(&self, action: ActionId, position: Option<f64>) -> Result<()> {
        let url = self.action_url(action, position);
        self.get(&url).await?;
        Ok(())
    }

    fn screenshot_url(&self) -> String {
        format!("{}/screenshot", self.base_url)
    }
}
