use banana_translate::{
    FileTranslateLoader, TranslateConfig, TranslateService, Translated, TranslationKeys,
};
use clap::{Arg, ArgAction, Command};
use serde_json::{Map, Value};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("banana-translate")
        .version("0.1.0")
        .about("Resolve translation keys from a directory of JSON translation files")
        .arg(
            Arg::new("keys")
                .help("Translation keys to resolve (dotted paths)")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("dir")
                .long("dir")
                .short('d')
                .help("Directory holding one <lang>.json file per language")
                .default_value("."),
        )
        .arg(
            Arg::new("lang")
                .long("lang")
                .short('l')
                .help("Language to translate into")
                .required(true),
        )
        .arg(
            Arg::new("default-lang")
                .long("default-lang")
                .help("Fallback language for keys missing in --lang"),
        )
        .arg(
            Arg::new("no-default-lang")
                .long("no-default-lang")
                .help("Never fall back to the default language")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("param")
                .long("param")
                .short('p')
                .help("Interpolation parameter as name=value (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the result as JSON")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let keys: Vec<String> = matches
        .get_many::<String>("keys")
        .unwrap_or_default()
        .cloned()
        .collect();
    let dir = matches
        .get_one::<String>("dir")
        .map(String::as_str)
        .unwrap_or(".");
    let lang = matches
        .get_one::<String>("lang")
        .ok_or("missing --lang")?;

    let mut config = TranslateConfig::from_env();
    if matches.get_flag("no-default-lang") {
        config = config.with_use_default_lang(false);
    }

    let params = parse_params(matches.get_many::<String>("param").unwrap_or_default())?;

    let translate = TranslateService::builder()
        .with_loader(FileTranslateLoader::new(dir))
        .with_config(config)
        .build();

    if let Some(default_lang) = matches.get_one::<String>("default-lang") {
        translate.set_default_lang(default_lang).await?;
    }
    translate.use_lang(lang).await?;
    debug!(langs = ?translate.langs(), "translations loaded");

    let keys = if keys.len() == 1 {
        TranslationKeys::One(keys[0].clone())
    } else {
        TranslationKeys::Many(keys)
    };
    let translated = translate.get(keys, params.as_ref()).await?;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&translated)?);
        return Ok(());
    }
    match translated {
        Translated::Single(value) => println!("{}", value),
        Translated::Multiple(pairs) => {
            for (key, value) in pairs {
                println!("{}: {}", key, value);
            }
        }
    }
    Ok(())
}

/// `name=value` pairs into a parameter object; dotted names build nested objects
fn parse_params<'a>(
    pairs: impl Iterator<Item = &'a String>,
) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let mut params = Map::new();
    for pair in pairs {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("invalid parameter '{}', expected name=value", pair))?;

        let mut segments: Vec<&str> = name.split('.').collect();
        let last = segments.pop().unwrap_or(name);
        let mut node = &mut params;
        for segment in segments {
            let entry = node
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            node = match entry {
                Value::Object(map) => map,
                _ => return Err(format!("invalid parameter name '{}'", name).into()),
            };
        }
        node.insert(last.to_string(), Value::String(value.to_string()));
    }
    Ok((!params.is_empty()).then_some(Value::Object(params)))
}
