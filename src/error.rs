//! Error types for translation loading and resolution

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Boxed error returned by a failing [`MissingTranslationHandler`](crate::MissingTranslationHandler)
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced by a [`TranslateLoader`](crate::TranslateLoader)
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The translation source could not be read
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The translation source is not valid JSON
    #[error("failed to parse JSON from '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The translation source parsed, but its root is not an object
    #[error("invalid translations in '{}': root must be an object", path.display())]
    NotAnObject { path: PathBuf },
    /// The loader has no translations for the requested language
    #[error("no translations available for language '{0}'")]
    NotFound(String),
    /// Any other loader-specific failure
    #[error("{0}")]
    Other(String),
}

/// Errors surfaced by [`TranslateService`](crate::TranslateService) operations
///
/// Cloneable so that one failed load can be handed to every caller awaiting it.
#[derive(Debug, Clone, Error)]
pub enum TranslateError {
    /// The loader failed for `lang`; nothing was committed for that language
    #[error("failed to load translations for '{lang}': {source}")]
    Load {
        lang: String,
        #[source]
        source: Arc<LoaderError>,
    },
    /// The missing-translation handler failed while recovering `key`
    #[error("missing translation handler failed for '{key}': {source}")]
    Handler {
        key: String,
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
    /// A key (or a list of keys) was required but empty
    #[error("parameter \"key\" required")]
    EmptyKey,
    /// No language was given and none is current
    #[error("no language given and no current language set")]
    NoLanguage,
}

impl TranslateError {
    pub(crate) fn load(lang: &str, source: LoaderError) -> Self {
        TranslateError::Load {
            lang: lang.to_string(),
            source: Arc::new(source),
        }
    }

    pub(crate) fn handler(key: &str, source: HandlerError) -> Self {
        TranslateError::Handler {
            key: key.to_string(),
            source: Arc::from(source),
        }
    }
}

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Result type for translation service operations
pub type TranslateResult<T> = Result<T, TranslateError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_load_error_wraps_cause() {
        let err = TranslateError::load("fr", LoaderError::NotFound("fr".to_string()));
        assert_eq!(
            err.to_string(),
            "failed to load translations for 'fr': no translations available for language 'fr'"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = LoaderError::Io {
            path: PathBuf::from("/tmp/i18n/en.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let message = err.to_string();
        assert!(message.contains("/tmp/i18n/en.json"));
        assert!(message.contains("gone"));
    }

    #[test]
    fn test_handler_error_is_cloneable() {
        let err = TranslateError::handler("KEY", "boom".into());
        let copy = err.clone();
        assert_eq!(err.to_string(), copy.to_string());
        assert!(copy.to_string().contains("KEY"));
    }
}
