//! Browserless-backed rendering sessions
//!
//! Talks to a Browserless-style headless Chrome service over plain HTTP:
//! `/content` navigates and renders a page, `/function` runs a script in the
//! page context and returns its JSON value.

use crate::config::RendererConfig;
use crate::error::RenderError;
use crate::render::{RenderSession, Renderer};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use url::Url;

/// HTTP timeout for rendering service calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Renderer backed by a Browserless-style HTTP service
pub struct BrowserlessRenderer {
    client: reqwest::Client,
    config: RendererConfig,
}

impl BrowserlessRenderer {
    /// Create a renderer for the configured service
    pub fn new(config: &RendererConfig) -> Result<Self, RenderError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let config = RendererConfig {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            user_agent: config.user_agent.clone(),
        };
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Renderer for BrowserlessRenderer {
    async fn new_session(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        Ok(Box::new(BrowserlessSession {
            client: self.client.clone(),
            config: self.config.clone(),
            page: None,
        }))
    }
}

/// One page session against the Browserless service
struct BrowserlessSession {
    client: reqwest::Client,
    config: RendererConfig,
    page: Option<Url>,
}

impl BrowserlessSession {
    fn endpoint(&self, path: &str) -> String {
        match &self.config.token {
            Some(token) => format!("{}{}?token={}", self.config.base_url, path, token),
            None => format!("{}{}", self.config.base_url, path),
        }
    }
}

#[async_trait]
impl RenderSession for BrowserlessSession {
    async fn load(&mut self, url: &Url) -> Result<(), RenderError> {
        let body = json!({
            "url": url.as_str(),
            "userAgent": self.config.user_agent,
        });
        let resp = self
            .client
            .post(self.endpoint("/content"))
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(RenderError::Navigation(format!(
                "status {}: {}",
                status.as_u16(),
                message
            )));
        }
        // The rendered HTML itself is not consumed; queries go through /function.
        self.page = Some(url.clone());
        Ok(())
    }

    async fn evaluate(&mut self, script: &str) -> Result<Value, RenderError> {
        let page = self.page.as_ref().ok_or(RenderError::NoPageLoaded)?;
        let code = format!(
            "export default async function ({{ page }}) {{\n\
             \x20 await page.setUserAgent({user_agent});\n\
             \x20 await page.goto({url});\n\
             \x20 return await page.evaluate((source) => eval(source), {script});\n\
             }}",
            user_agent = Value::String(self.config.user_agent.clone()),
            url = Value::String(page.to_string()),
            script = Value::String(script.to_string()),
        );
        let resp = self
            .client
            .post(self.endpoint("/function"))
            .json(&json!({ "code": code }))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(RenderError::Api {
                status: status.as_u16(),
                message,
            });
        }
        resp.json()
            .await
            .map_err(|e| RenderError::Evaluation(e.to_string()))
    }
}
