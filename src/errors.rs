/*!
 * Error types for the wordbridge library.
 *
 * This module contains custom error types for different parts of the library,
 * using the thiserror crate for ergonomic error definitions. Failing to find
 * a match is not an error: matchers report it through their result values.
 */

use thiserror::Error;

/// Errors that can occur when talking to external services
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Error when sending a request fails
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error when a response body does not have the expected shape
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Non-success status returned by the service
    #[error("Service responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the service
        message: String,
    },

    /// The caller's credential was rejected
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request was superseded before it completed
    #[error("Request cancelled")]
    Cancelled,
}

/// Errors that can occur while translating a word or page
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// Error from the translation provider
    #[error("Provider error: {0}")]
    Provider(ProviderError),

    /// The translation service rejected the credential
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The credential was rejected earlier in this session
    #[error("Credential was rejected; re-authentication required")]
    CredentialRejected,

    /// The service answered with an empty translation
    #[error("Service returned an empty translation")]
    EmptyTranslation,

    /// A newer request superseded this one
    #[error("Translation cancelled")]
    Cancelled,
}

impl TranslationError {
    /// Whether the error requires the user to re-authenticate
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::CredentialRejected)
    }
}

impl From<ProviderError> for TranslationError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::AuthenticationError(message) => Self::Auth(message),
            ProviderError::Cancelled => Self::Cancelled,
            other => Self::Provider(other),
        }
    }
}

/// Errors that can occur when reading alignment tables
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlignmentError {
    /// Payload is not a valid table
    #[error("Malformed alignment table: {0}")]
    Malformed(String),

    /// Indexed table with a non-numeric key
    #[error("Invalid paragraph index in alignment table: {0}")]
    InvalidKey(String),
}

/// Errors that can occur in the saved-word dictionary
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// Entry rejected before reaching storage
    #[error("Invalid dictionary entry: {0}")]
    InvalidEntry(String),

    /// Storage failure
    #[error("Dictionary storage error: {0}")]
    Storage(String),
}

impl From<anyhow::Error> for DictionaryError {
    fn from(error: anyhow::Error) -> Self {
        Self::Storage(format!("{:#}", error))
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from alignment table handling
    #[error("Alignment error: {0}")]
    Alignment(#[from] AlignmentError),

    /// Error from the dictionary
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
