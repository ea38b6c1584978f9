//! Recovery strategy for keys that resolve in neither the current nor the default language

use futures::future::BoxFuture;
use serde_json::Value;

use crate::error::HandlerError;
use crate::service::TranslateService;

/// Everything a handler gets to know about the unresolved key
#[derive(Clone, Copy)]
pub struct MissingTranslationHandlerParams<'a> {
    /// The key that could not be resolved
    pub key: &'a str,
    /// The service performing the lookup
    pub translate_service: &'a TranslateService,
    /// The interpolation parameters passed with the lookup, if any
    pub interpolate_params: Option<&'a Value>,
}

/// What a handler came up with
pub enum MissingTranslation<'a> {
    /// A substitute available right away, used verbatim
    Value(String),
    /// A substitute produced asynchronously. `get` awaits it; `instant` drops it and
    /// falls back to the key.
    Pending(BoxFuture<'a, Result<String, HandlerError>>),
    /// No substitute: the key itself is used
    Absent,
}

pub trait MissingTranslationHandler: Send + Sync {
    /// Produce a substitute for `params.key`. An error is surfaced to the caller of
    /// `get`/`instant` as is.
    fn handle<'a>(
        &'a self,
        params: MissingTranslationHandlerParams<'a>,
    ) -> Result<MissingTranslation<'a>, HandlerError>;
}

/// Handler that answers with the key itself
#[derive(Debug, Clone, Default)]
pub struct FakeMissingTranslationHandler;

impl MissingTranslationHandler for FakeMissingTranslationHandler {
    fn handle<'a>(
        &'a self,
        params: MissingTranslationHandlerParams<'a>,
    ) -> Result<MissingTranslation<'a>, HandlerError> {
        Ok(MissingTranslation::Value(params.key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fake_handler_answers_with_key() {
        let service = TranslateService::builder().build();
        let params = json!({ "name": "Bob" });
        let result = FakeMissingTranslationHandler
            .handle(MissingTranslationHandlerParams {
                key: "MISSING.KEY",
                translate_service: &service,
                interpolate_params: Some(&params),
            })
            .unwrap();
        assert!(matches!(result, MissingTranslation::Value(ref v) if v == "MISSING.KEY"));
    }
}
