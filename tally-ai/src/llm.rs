//! Chat-completion client for the AI gateway.
//!
//! Credentials come from the process environment; when no key is present the
//! gateway reports itself unconfigured and the AI features degrade instead of
//! crashing startup. Every request carries an explicit timeout so a stuck
//! remote call cannot hang a command forever.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    OpenAI,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: Provider,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
}

/// Build a config from the environment: `ANTHROPIC_API_KEY` wins, then
/// `OPENAI_API_KEY`. `Ok(None)` means the AI features are disabled.
pub fn config_from_env(timeout: Duration) -> Result<Option<LlmConfig>> {
    if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
        if !key.trim().is_empty() {
            return Ok(Some(LlmConfig {
                provider: Provider::Anthropic,
                model: "claude-3-5-sonnet-latest".to_string(),
                api_key: key,
                timeout,
            }));
        }
    }
    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        if !key.trim().is_empty() {
            return Ok(Some(LlmConfig {
                provider: Provider::OpenAI,
                model: "gpt-4o-mini".to_string(),
                api_key: key,
                timeout,
            }));
        }
    }
    Ok(None)
}

pub async fn chat_complete(config: &LlmConfig, system: &str, user: &str) -> Result<String> {
    let call = async {
        match config.provider {
            Provider::Anthropic => anthropic_complete(config, system, user).await,
            Provider::OpenAI => openai_complete(config, system, user).await,
        }
    };
    bounded(config.timeout, call).await
}

/// Cap the whole round trip, connection setup and body included. A remote
/// that never answers becomes an error instead of a stuck command.
async fn bounded<F, T>(timeout: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(res) => res,
        Err(_) => bail!("request timed out after {}s", timeout.as_secs()),
    }
}

fn client() -> Result<reqwest::Client> {
    reqwest::Client::builder().build().context("build http client")
}

async fn anthropic_complete(config: &LlmConfig, system: &str, user: &str) -> Result<String> {
    #[derive(Serialize)]
    struct Msg {
        role: String,
        content: String,
    }

    #[derive(Serialize)]
    struct Req {
        model: String,
        max_tokens: i32,
        system: String,
        messages: Vec<Msg>,
    }

    #[derive(Deserialize)]
    struct Resp {
        content: Vec<ContentBlock>,
    }

    #[derive(Deserialize)]
    struct ContentBlock {
        #[serde(rename = "type")]
        t: String,
        text: Option<String>,
    }

    let body = Req {
        model: config.model.clone(),
        max_tokens: 800,
        system: system.to_string(),
        messages: vec![Msg {
            role: "user".to_string(),
            content: user.to_string(),
        }],
    };

    let mut headers = HeaderMap::new();
    headers.insert("x-api-key", HeaderValue::from_str(&config.api_key)?);
    headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let resp = client()?
        .post("https://api.anthropic.com/v1/messages")
        .headers(headers)
        .json(&body)
        .send()
        .await
        .context("anthropic request")?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        bail!("anthropic error: {status} {txt}");
    }

    let out: Resp = resp.json().await.context("parse anthropic response")?;
    let mut s = String::new();
    for b in out.content {
        if b.t == "text" {
            if let Some(t) = b.text {
                s.push_str(&t);
            }
        }
    }
    Ok(s.trim().to_string())
}

async fn openai_complete(config: &LlmConfig, system: &str, user: &str) -> Result<String> {
    #[derive(Serialize)]
    struct Msg {
        role: String,
        content: String,
    }

    #[derive(Serialize)]
    struct Req {
        model: String,
        messages: Vec<Msg>,
        temperature: f32,
    }

    #[derive(Deserialize)]
    struct Resp {
        choices: Vec<Choice>,
    }

    #[derive(Deserialize)]
    struct Choice {
        message: MsgOut,
    }

    #[derive(Deserialize)]
    struct MsgOut {
        content: Option<String>,
    }

    let body = Req {
        model: config.model.clone(),
        messages: vec![
            Msg {
                role: "system".to_string(),
                content: system.to_string(),
            },
            Msg {
                role: "user".to_string(),
                content: user.to_string(),
            },
        ],
        temperature: 0.2,
    };

    let resp = client()?
        .post("https://api.openai.com/v1/chat/completions")
        .header(AUTHORIZATION, format!("Bearer {}", config.api_key))
        .json(&body)
        .send()
        .await
        .context("openai request")?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        bail!("openai error: {status} {txt}");
    }

    let out: Resp = resp.json().await.context("parse openai response")?;
    let content = out
        .choices
        .first()
        .and_then(|c| c.message.content.clone())
        .unwrap_or_default();

    Ok(content.trim().to_string())
}
