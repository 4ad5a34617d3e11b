/*!
 * Client for the reader's web service.
 *
 * The service exposes two endpoints used by a reading session:
 * - `POST {translate_path}` with `{text, source_lang, target_lang, context?}`,
 *   answering `{"translated_text": …}`
 * - `GET {mapping_path}/{document_id}` answering an alignment table, or 404
 *   when the document has none
 *
 * Every request carries the bearer token; a 401 answer is reported as
 * `ProviderError::AuthenticationError`.
 */

use std::time::Duration;
use async_trait::async_trait;
use log::{debug, error, warn};
use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::alignment::AlignmentTable;
use crate::app_config::ServiceConfig;
use crate::errors::ProviderError;
use crate::providers::{AlignmentSource, TranslationRequest, TranslationResult, Translator};

/// Translation request body as the service expects it
#[derive(Debug, Serialize)]
struct ServiceTranslateRequest<'a> {
    text: &'a str,
    source_lang: &'a str,
    target_lang: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a str>,
}

/// Translation response body; older deployments answer with `translation`
#[derive(Debug, Deserialize)]
struct ServiceTranslateResponse {
    #[serde(default)]
    translated_text: Option<String>,
    #[serde(default)]
    translation: Option<String>,
}

/// HTTP client for the translation and alignment service
#[derive(Debug)]
pub struct ServiceClient {
    /// HTTP client for API requests
    client: Client,
    /// Base URL without trailing slash
    endpoint: String,
    translate_path: String,
    mapping_path: String,
    /// Bearer token, replaceable after the service rejected it
    api_token: RwLock<String>,
}

impl ServiceClient {
    /// Create a new client with default paths
    pub fn new(endpoint: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self::from_config(&ServiceConfig {
            endpoint: endpoint.into(),
            api_token: api_token.into(),
            ..ServiceConfig::default()
        })
    }

    /// Create a client from the service section of the configuration
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            translate_path: config.translate_path.clone(),
            mapping_path: config.mapping_path.clone(),
            api_token: RwLock::new(config.api_token.clone()),
        }
    }

    fn translate_url(&self) -> String {
        format!("{}{}", self.endpoint, self.translate_path)
    }

    fn mapping_url(&self, document_id: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&format!("{}{}", self.endpoint, self.mapping_path))
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid mapping URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| ProviderError::RequestFailed(format!("Endpoint cannot carry a path: {}", self.endpoint)))?
            .pop_if_empty()
            .push(document_id);

        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.api_token.read();
        if token.is_empty() {
            request
        } else {
            request.bearer_auth(token.as_str())
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ProviderError> {
        self.authorize(request).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ProviderError::ConnectionError(e.to_string())
            } else {
                ProviderError::RequestFailed(e.to_string())
            }
        })
    }

    /// Map unauthorized and other non-success answers to errors
    async fn check_status(response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());

        if status == StatusCode::UNAUTHORIZED {
            warn!("Service rejected the credential: {}", error_text);
            return Err(ProviderError::AuthenticationError(error_text));
        }

        error!("Service error ({}): {}", status, error_text);
        Err(ProviderError::ApiError {
            status_code: status.as_u16(),
            message: error_text,
        })
    }
}

#[async_trait]
impl Translator for ServiceClient {
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult, ProviderError> {
        let body = ServiceTranslateRequest {
            text: &request.text,
            source_lang: &request.source_language,
            target_lang: &request.target_language,
            context: request.context.as_deref(),
        };

        debug!("Requesting translation of {} chars ({} -> {})",
               request.text.chars().count(),
               request.source_language,
               request.target_language);

        let response = self.send(self.client.post(self.translate_url()).json(&body)).await?;
        let response = Self::check_status(response).await?;

        let payload = response.json::<ServiceTranslateResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse translation response: {}", e)))?;

        let text = payload.translated_text
            .or(payload.translation)
            .ok_or_else(|| ProviderError::ParseError("Response has no translated_text field".to_string()))?;

        if text.trim().is_empty() {
            return Err(ProviderError::ParseError("Service returned an empty translation".to_string()));
        }

        Ok(TranslationResult { text })
    }

    fn set_credentials(&self, token: &str) {
        *self.api_token.write() = token.to_string();
    }
}

#[async_trait]
impl AlignmentSource for ServiceClient {
    async fn load_alignment_table(&self, document_id: &str) -> Result<Option<AlignmentTable>, ProviderError> {
        let url = self.mapping_url(document_id)?;
        let response = self.send(self.client.get(url)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("No alignment table for document '{}'", document_id);
            return Ok(None);
        }

        let response = Self::check_status(response).await?;
        let body = response.text().await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let table = AlignmentTable::from_json(&body)
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        debug!("Loaded alignment table for '{}' with {} paragraphs", document_id, table.len());
        Ok(Some(table))
    }
}
