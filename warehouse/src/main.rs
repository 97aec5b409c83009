use anyhow::{Context, bail};
use clap::{Arg, ArgMatches, Command};
use common::config::{DEFAULT_CONFIG_PATH, Settings};
use tracing::info;
use warehouse::pipeline::Mode;

fn input_arg() -> Arg {
    Arg::new("input")
        .short('i')
        .long("input")
        .value_name("FILE")
        .help("Newline-delimited JSON events to process (overrides input.path)")
}

fn cli() -> Command {
    Command::new("Referral Metrics ETL")
        .version("1.0")
        .about("Validates referral events and computes hourly engagement metrics")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .global(true)
                .help("Sets a custom config file"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("batch")
                .about("Load the whole file, deduplicate, then aggregate")
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("stream")
                .about("Process the file line by line with running aggregates")
                .arg(input_arg()),
        )
}

fn mode_of(matches: &ArgMatches) -> anyhow::Result<(Mode, &ArgMatches)> {
    match matches.subcommand() {
        Some(("batch", sub)) => Ok((Mode::Batch, sub)),
        Some(("stream", sub)) => Ok((Mode::Stream, sub)),
        _ => bail!("Please specify a valid subcommand: batch or stream"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let (mode, sub_matches) = mode_of(&matches)?;

    let config_path = matches
        .get_one::<String>("config")
        .map(|s| s.as_str())
        .unwrap_or(DEFAULT_CONFIG_PATH);
    let mut settings = Settings::new(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;
    if let Some(input) = sub_matches.get_one::<String>("input") {
        settings.input.path = input.clone();
    }

    common::logging::init(&settings.logging).context("Failed to initialise logging")?;

    info!(mode = %mode, config = config_path, "{} processing started", mode);
    let summary = warehouse::run_referral_pipeline(mode, &settings)
        .await
        .with_context(|| format!("{} processing failed", mode))?;
    info!(?summary, "{} processing completed", mode);

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
