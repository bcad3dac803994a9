use address_batch::{
    config::{prompt_environment, Cli, RunConfig},
    run,
};
use chrono::Local;
use clap::Parser;
use std::{io, process::ExitCode};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

const EXIT_INVALID_ENVIRONMENT: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.log_json {
        fmt().json().with_env_filter(env_filter).init();
    } else {
        fmt().with_env_filter(env_filter).init();
    }

    let started = Local::now();
    info!(started = %started.to_rfc3339(), "startup");

    // ─── 2) resolve endpoints ────────────────────────────────────────
    let config = match RunConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    // ─── 3) pick the environment ─────────────────────────────────────
    let selected = match cli.env {
        Some(env) => Some(env),
        None => match prompt_environment(io::stdin().lock(), io::stdout()) {
            Ok(answer) => answer,
            Err(e) => {
                error!("reading environment selection: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };
    let Some(env) = selected else {
        warn!("invalid environment");
        warn!("exiting the execution");
        return ExitCode::from(EXIT_INVALID_ENVIRONMENT);
    };
    info!("{} environment", env.as_str());

    // ─── 4) load → encode → submit → write ───────────────────────────
    match run(&config, env).await {
        Ok(summary) => {
            let elapsed = (Local::now() - started).to_std().unwrap_or_default();
            info!(
                files = summary.files_read,
                submitted = summary.rows_submitted,
                written = summary.rows_written,
                output = %summary.output_path.display(),
                "Response time is: {:?}",
                elapsed
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            let code = e.exit_code();
            error!("{:#}", anyhow::Error::from(e));
            ExitCode::from(code)
        }
    }
}
