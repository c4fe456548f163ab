//! Command-line fire-diamond lookup.
//!
//! # Responsibility
//! - Collect one rating combination from arguments and print matching names.
//! - Wire config, datasets and (with the `http` feature) identifier providers.

use clap::Parser;
use log::{error, info};
use nfpa_core::dataset::parse_special_tokens;
use nfpa_core::{
    default_log_level, init_logging, init_stderr_logging, HazardProfile, LookupConfig,
    LookupService, SpecialSymbols, Transport,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "nfpa_lookup", version, about = "Look up chemicals by NFPA 704 ratings")]
struct Args {
    /// Health rating (0-4).
    #[arg(long = "health", short = 'H')]
    health: Option<u8>,
    /// Flammability rating (0-4).
    #[arg(long = "flammability", short = 'F')]
    flammability: Option<u8>,
    /// Reactivity rating (0-4).
    #[arg(long = "reactivity", short = 'R')]
    reactivity: Option<u8>,
    /// Special symbols, e.g. `OX,W`. Passing this also compares specials.
    #[arg(long = "special")]
    special: Option<String>,
    /// Compare specials even when none are given (matches "no symbol").
    #[arg(long = "strict-specials")]
    strict_specials: bool,
    /// JSON lookup config.
    #[arg(long = "config", conflicts_with = "sources")]
    config: Option<PathBuf>,
    /// Dataset files, used when no config is given.
    #[arg(long = "source")]
    sources: Vec<PathBuf>,
    /// Absolute directory for rolling log files; logs go to stderr otherwise.
    #[arg(long = "log-dir")]
    log_dir: Option<String>,
    #[arg(long = "log-level")]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(rendered) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            error!("event=cli_lookup module=cli status=error error={}", message);
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String, String> {
    let level = args.log_level.as_deref().unwrap_or(default_log_level());
    match args.log_dir.as_deref() {
        Some(dir) => init_logging(level, dir)?,
        None => init_stderr_logging(level)?,
    }

    let specials = args
        .special
        .as_deref()
        .map(parse_special_tokens)
        .unwrap_or_else(SpecialSymbols::none);
    let include_specials = args.special.is_some() || args.strict_specials;
    let query = HazardProfile::from_parts(args.health, args.flammability, args.reactivity, specials)
        .map_err(|err| err.to_string())?;

    let config = match &args.config {
        Some(path) => LookupConfig::from_path(path).map_err(|err| err.to_string())?,
        None => {
            let config = LookupConfig::with_sources(args.sources.clone());
            config.validate().map_err(|err| err.to_string())?;
            config
        }
    };

    let index = config
        .build_index(transport(&config)?)
        .map_err(|err| err.to_string())?;
    let service = LookupService::new(index);
    info!(
        "event=cli_lookup module=cli status=ready sources={} records={} dedup={} dedup_kind={}",
        service.index().sources().len(),
        service.index().record_count(),
        service.index().deduplicates(),
        service.index().dedup_kind()
    );
    Ok(service.lookup(&query, include_specials).render())
}

#[cfg(feature = "http")]
fn transport(config: &LookupConfig) -> Result<Option<Arc<dyn Transport>>, String> {
    let transport = nfpa_core::HttpTransport::new(config.request_timeout())
        .map_err(|err| err.to_string())?;
    Ok(Some(Arc::new(transport)))
}

/// Without HTTP support declared providers are unusable; results are not
/// de-duplicated.
#[cfg(not(feature = "http"))]
fn transport(config: &LookupConfig) -> Result<Option<Arc<dyn Transport>>, String> {
    if !config.providers.is_empty() {
        log::warn!(
            "event=cli_transport module=cli status=skip reason=http_feature_disabled providers={}",
            config.providers.len()
        );
        eprintln!(
            "warning: {} identifier provider(s) configured but this build has no HTTP support; \
             results are not de-duplicated",
            config.providers.len()
        );
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::{transport, Args};
    use clap::Parser;
    use nfpa_core::LookupConfig;
    use std::path::Path;

    fn bundled_config() -> LookupConfig {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/lookup.json");
        LookupConfig::from_path(path).expect("bundled config should load")
    }

    #[test]
    fn parses_ratings_and_specials() {
        let args = Args::try_parse_from([
            "nfpa_lookup", "-H", "1", "-F", "3", "-R", "0", "--special", "OX,W",
        ])
        .expect("arguments should parse");
        assert_eq!(
            (args.health, args.flammability, args.reactivity),
            (Some(1), Some(3), Some(0))
        );
        assert_eq!(args.special.as_deref(), Some("OX,W"));
        assert!(args.sources.is_empty());
    }

    #[test]
    fn config_and_sources_conflict() {
        let parsed = Args::try_parse_from([
            "nfpa_lookup", "--config", "lookup.json", "--source", "set.json",
        ]);
        assert!(parsed.is_err());
    }

    #[cfg(feature = "http")]
    #[test]
    fn default_build_deduplicates_bundled_config() {
        let config = bundled_config();
        let transport = transport(&config).expect("transport should build");
        assert!(transport.is_some());

        let index = config.build_index(transport).expect("index should build");
        assert!(index.deduplicates());
    }

    #[cfg(not(feature = "http"))]
    #[test]
    fn build_without_http_has_no_transport() {
        let config = bundled_config();
        assert!(transport(&config).expect("no transport is not an error").is_none());
        assert!(!config.build_index(None).expect("index").deduplicates());
    }
}
