//! Comment translation with a never-failing contract
//!
//! Providers may fail; callers go through [`translate_or_original`], which falls
//! back to the source text.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::TranslationConfig;
use crate::error::{Error, Result};
use crate::model::Comment;

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

/// Google Cloud Translation v2 REST endpoint
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GoogleTranslator {
    pub fn new(endpoint: &str, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder().gzip(true).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key,
        })
    }
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let mut request = self.client.post(&self.endpoint).json(&TranslateRequest {
            q: text,
            source,
            target,
            format: "text",
        });
        if let Some(ref key) = self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                endpoint: self.endpoint.clone(),
                status,
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: TranslateResponse = serde_json::from_slice(&bytes).map_err(|e| Error::Decode {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        parsed
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| Error::Decode {
                endpoint: self.endpoint.clone(),
                reason: "no translations in response".to_string(),
            })
    }
}

/// Tries `primary`, then `secondary` when the primary fails
pub struct FallbackTranslator {
    primary: Box<dyn Translator>,
    secondary: Box<dyn Translator>,
}

impl FallbackTranslator {
    pub fn new(primary: Box<dyn Translator>, secondary: Box<dyn Translator>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl Translator for FallbackTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        match self.primary.translate(text, source, target).await {
            Ok(translated) => Ok(translated),
            Err(e) => {
                warn!("Primary translator failed, trying fallback: {}", e);
                self.secondary.translate(text, source, target).await
            }
        }
    }
}

/// Build the configured translator, wrapping it in a fallback when one is set
pub fn from_config(config: &TranslationConfig) -> Result<Box<dyn Translator>> {
    let primary = GoogleTranslator::new(&config.endpoint, config.api_key.clone())?;
    Ok(match config.fallback_endpoint {
        Some(ref fallback) => Box::new(FallbackTranslator::new(
            Box::new(primary),
            Box::new(GoogleTranslator::new(fallback, config.api_key.clone())?),
        )),
        None => Box::new(primary),
    })
}

/// Translate `text`, returning it unchanged if the provider fails.
pub async fn translate_or_original(translator: &dyn Translator, text: &str, source: &str, target: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }
    match translator.translate(text, source, target).await {
        Ok(translated) => translated,
        Err(e) => {
            warn!("Translation error: {}", e);
            text.to_string()
        }
    }
}

/// Fill `text_translated` on every comment
pub async fn translate_comments(translator: &dyn Translator, comments: &mut [Comment], source: &str, target: &str) {
    for comment in comments.iter_mut() {
        let translated = translate_or_original(translator, &comment.text, source, target).await;
        comment.text_translated = Some(translated);
    }
    debug!("Translated {} comments from {} to {}", comments.len(), source, target);
}
