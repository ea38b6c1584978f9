//! Translation resolution with pluggable strategies
//!
//! [`TranslateService`] answers "what is the text for key K in the current language,
//! with these parameters", either asynchronously ([`TranslateService::get`], waiting
//! for translations still being loaded) or synchronously
//! ([`TranslateService::instant`], using only what is cached).
//!
//! Loading, compiling, parsing and recovering missing keys are strategies supplied
//! by the caller; see [`TranslateLoader`], [`TranslateCompiler`], [`TranslateParser`]
//! and [`MissingTranslationHandler`].

pub mod compiler;
pub mod config;
pub mod error;
pub mod loader;
pub mod missing;
mod pending;
pub mod parser;
pub mod service;
pub mod store;
pub mod value;


pub use compiler::{TranslateCompiler, TranslateFakeCompiler};
pub use config::TranslateConfig;
pub use error::{HandlerError, LoaderError, LoaderResult, TranslateError, TranslateResult};
pub use loader::{
    FileTranslateLoader, StaticLoader, TranslateFakeLoader, TranslateLoader,
    load_translations_from_file,
};
pub use missing::{
    FakeMissingTranslationHandler, MissingTranslation, MissingTranslationHandler,
    MissingTranslationHandlerParams,
};
pub use parser::{TranslateDefaultParser, TranslateParser, get_path};
pub use service::{Translated, TranslateService, TranslateServiceBuilder, TranslationKeys};
pub use store::{
    ChangeEvent, DefaultLangChangeEvent, LangChangeEvent, TranslateStore,
    TranslationChangeEvent,
};
pub use value::{Deferred, TranslationValue, Translations, translations_from_json};
