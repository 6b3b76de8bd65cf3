//! Applies a selector to a list inside a JSON or YAML document.
//!
//! ```text
//! aldb <document.json|document.yaml> <path> <selector>
//! aldb week.yaml /days '[#-4,#-2['
//! ```
//!
//! The path is a JSON pointer (`""` for the document root). Value based
//! selectors print a JSON array, positional ones an object keyed by extended
//! index. Logging goes to stderr and is configured through `aldb.toml` or
//! `ALDB_LOG_FILTER`.

use std::env;
use std::fs;
use std::process::ExitCode;

// logging goes to stderr, the selection to stdout
use tracing::{debug, error, info};

use aldb::error::{AldbError, Result};
use aldb::path::Path;
use aldb::selector::Selector;
use aldb::settings::Settings;
use aldb::value::Value;

const USAGE: &str = "usage: aldb <document.json|document.yaml> <path> <selector>";

fn init_logging(settings: &Settings) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_document(file: &str) -> Result<Value> {
    let text = fs::read_to_string(file)?;
    if file.ends_with(".yaml") || file.ends_with(".yml") {
        let yaml: serde_yaml::Value = serde_yaml::from_str(&text)?;
        Value::try_from(yaml)
    } else {
        let json: serde_json::Value = serde_json::from_str(&text)?;
        Value::try_from(json)
    }
}

fn run(settings: &Settings, file: &str, path: &str, selector: &str) -> Result<String> {
    let document = load_document(file)?;
    let path: Path = path.parse()?;
    let items: Vec<String> = document
        .get(&path)?
        .cast_list()?
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    let selector: Selector<String> = selector.parse()?;
    debug!(%path, items = items.len(), %selector, "selecting");

    let selected = match selector.select_indexed(&items) {
        Some(picked) => to_json(settings, &picked)?,
        None => to_json(settings, &selector.select(&items)?)?,
    };
    Ok(selected)
}

fn to_json<S: serde::Serialize>(settings: &Settings, selected: &S) -> Result<String> {
    let json = if settings.pretty {
        serde_json::to_string_pretty(selected)
    } else {
        serde_json::to_string(selected)
    };
    json.map_err(AldbError::from)
}

fn main() -> ExitCode {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&settings);

    let args: Vec<String> = env::args().skip(1).collect();
    let [file, path, selector] = args.as_slice() else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };
    info!(file = %file, "loading document");
    match run(&settings, file, path, selector) {
        Ok(selected) => {
            println!("{}", selected);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "selection failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
