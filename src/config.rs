// src/config.rs

use crate::error::{BatchError, Result};
use clap::{builder::BoolishValueParser, ArgAction, Parser, ValueEnum};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    time::Duration,
};
use url::Url;

/// Address parser endpoints, one per environment.
pub const DEV_ENDPOINT: &str = "http://127.0.0.1:8080/address/parse";
pub const PROD_ENDPOINT: &str = "https://address-parser.prod.internal/address/parse";

pub const DEFAULT_INPUT_DIR: &str = "data/input";
pub const DEFAULT_OUTPUT_PATH: &str = "data/output/output.csv";

const PROMPT: &str = "Please select environment, just press Enter key for prod environment \
                      or type dev for selecting dev environment :: ";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    #[value(name = "dev")]
    Development,
    #[value(name = "prod")]
    Production,
}

impl Environment {
    /// Maps a prompt answer: empty is prod, `dev` is dev, anything else is rejected.
    pub fn from_selector(answer: &str) -> Option<Self> {
        match answer {
            "" => Some(Environment::Production),
            "dev" => Some(Environment::Development),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Environment::Development => "dev",
            Environment::Production => "prod",
        }
    }
}

/// Shows the environment prompt on `out` and reads one answer from `input`.
/// EOF counts as an invalid answer.
pub fn prompt_environment(
    mut input: impl BufRead,
    mut out: impl Write,
) -> io::Result<Option<Environment>> {
    write!(out, "{}", PROMPT)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Environment::from_selector(line.trim_end_matches(['\r', '\n'])))
}

#[derive(Debug, Parser)]
#[command(
    name = "address-batch",
    version,
    about = "Send address files to the address parser service and write the parsed CSV"
)]
pub struct Cli {
    /// Directory holding .csv/.txt/.xlsx/.xls input files.
    #[arg(long, env = "ADDRESS_BATCH_INPUT_DIR", default_value = DEFAULT_INPUT_DIR)]
    pub input_dir: PathBuf,

    /// Output CSV path, overwritten on every run.
    #[arg(long, env = "ADDRESS_BATCH_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Skip the interactive prompt.
    #[arg(long, value_enum)]
    pub env: Option<Environment>,

    #[arg(long, env = "ADDRESS_PARSER_DEV_URL", default_value = DEV_ENDPOINT)]
    pub dev_url: String,

    #[arg(long, env = "ADDRESS_PARSER_PROD_URL", default_value = PROD_ENDPOINT)]
    pub prod_url: String,

    /// Request timeout; the HTTP client default (none) applies when unset.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Emit JSON log lines. The env form takes 1/0, true/false, yes/no, on/off.
    #[arg(
        long,
        env = "LOG_STRUCTURED",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: bool,
}

/// Resolved settings for one batch run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_path: PathBuf,
    pub dev_endpoint: Url,
    pub prod_endpoint: Url,
    pub timeout: Option<Duration>,
}

impl RunConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Ok(Self {
            input_dir: cli.input_dir.clone(),
            output_path: cli.output.clone(),
            dev_endpoint: parse_endpoint(&cli.dev_url)?,
            prod_endpoint: parse_endpoint(&cli.prod_url)?,
            timeout: cli.timeout_secs.map(Duration::from_secs),
        })
    }

    /// Exactly one endpoint per environment.
    pub fn endpoint(&self, env: Environment) -> &Url {
        match env {
            Environment::Development => &self.dev_endpoint,
            Environment::Production => &self.prod_endpoint,
        }
    }
}

fn parse_endpoint(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|source| BatchError::InvalidEndpoint {
        url: raw.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn selector_answers() {
        assert_eq!(Environment::from_selector(""), Some(Environment::Production));
        assert_eq!(Environment::from_selector("dev"), Some(Environment::Development));
        assert_eq!(Environment::from_selector("xyz"), None);
        assert_eq!(Environment::from_selector("DEV"), None);
    }

    #[test]
    fn prompt_reads_one_line() -> anyhow::Result<()> {
        let mut shown = Vec::new();
        let env = prompt_environment(Cursor::new("dev\r\n"), &mut shown)?;
        assert_eq!(env, Some(Environment::Development));
        assert!(String::from_utf8(shown)?.starts_with("Please select environment"));

        let env = prompt_environment(Cursor::new("\n"), Vec::new())?;
        assert_eq!(env, Some(Environment::Production));

        let env = prompt_environment(Cursor::new(""), Vec::new())?;
        assert_eq!(env, None);
        Ok(())
    }

    #[test]
    fn dev_selects_dev_endpoint() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(["address-batch", "--env", "dev"])?;
        let cfg = RunConfig::from_cli(&cli)?;
        assert_eq!(cli.env, Some(Environment::Development));
        assert_eq!(cfg.endpoint(Environment::Development).as_str(), DEV_ENDPOINT);
        assert_eq!(cfg.endpoint(Environment::Production).as_str(), PROD_ENDPOINT);
        assert!(cfg.timeout.is_none());
        Ok(())
    }

    #[test]
    fn structured_logging_env_accepts_numeric_bools() -> anyhow::Result<()> {
        std::env::set_var("LOG_STRUCTURED", "1");
        let on = Cli::try_parse_from(["address-batch"]);
        std::env::set_var("LOG_STRUCTURED", "0");
        let off = Cli::try_parse_from(["address-batch"]);
        std::env::remove_var("LOG_STRUCTURED");

        assert!(on?.log_json);
        assert!(!off?.log_json);
        assert!(Cli::try_parse_from(["address-batch", "--log-json"])?.log_json);
        Ok(())
    }

    #[test]
    fn rejects_bad_endpoint() {
        let cli = Cli::try_parse_from(["address-batch", "--dev-url", "not a url"])
            .expect("arguments should parse");
        let err = RunConfig::from_cli(&cli).unwrap_err();
        assert!(matches!(err, BatchError::InvalidEndpoint { .. }));
    }
}
