use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use super::ui;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::services::AskOutcome;
use crate::domain::services::ConversationController;
use crate::infrastructure::clients::NotesApiManager;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

fn config_arg(key: ConfigKey, help: &str) -> Arg {
    Arg::new(key.to_string())
        .long(key.to_string())
        .env(format!("LMNOTES_{}", key.to_string().to_uppercase().replace('-', "_")))
        .num_args(1)
        .global(true)
        .help(help.to_string())
}

fn subcommand_config() -> Command {
    Command::new("config")
        .about("Configuration file options")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("default").about("Print the default config.toml"))
}

fn subcommand_ask() -> Command {
    Command::new("ask")
        .about("Ask a single question, print the answer with its sources and exit")
        .arg(
            Arg::new("question")
                .required(true)
                .num_args(1..)
                .action(ArgAction::Append)
                .help("The question to ask"),
        )
}

pub fn build() -> Command {
    Command::new("lmnotes")
        .about("Notes, semantic search and conversational Q&A from the terminal")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(subcommand_ask())
        .subcommand(subcommand_config())
        .arg(
            config_arg(ConfigKey::ConfigFile, "Path to the config file")
                .short('c'),
        )
        .arg(config_arg(
            ConfigKey::ServerUrl,
            "Base URL of the notes service [default: http://localhost:8000]",
        ))
        .arg(config_arg(
            ConfigKey::RequestTimeout,
            "Request timeout in milliseconds [default: 30000]",
        ))
        .arg(config_arg(
            ConfigKey::SearchLimit,
            "Maximum number of search results [default: 10]",
        ))
        .arg(config_arg(
            ConfigKey::SearchThreshold,
            "Minimum similarity of a search result [default: 0.2]",
        ))
        .arg(config_arg(ConfigKey::LogFile, "Path of the log file"))
        .arg(
            config_arg(ConfigKey::LogLevel, "Log verbosity [default: info]")
                .value_parser(PossibleValuesParser::new(LOG_LEVELS)),
        )
}

/// Logs go to a JSON file so they never interleave with the conversation.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file = PathBuf::from(Config::get(ConfigKey::LogFile));
    let file_name = log_file
        .file_name()
        .ok_or_else(|| anyhow!("log-file must name a file: {}", log_file.display()))?
        .to_owned();
    let log_dir = log_file
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&log_dir)?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, file_name));

    let filter = EnvFilter::try_from_env("LMNOTES_LOG")
        .or_else(|_| EnvFilter::try_new(Config::get(ConfigKey::LogLevel)))?;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(writer)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logging: {err}"))?;

    Ok(guard)
}

async fn ask_once(question: &str) -> Result<()> {
    let api = NotesApiManager::get()?;
    let mut controller = ConversationController::default();

    match controller.submit_question(api.as_ref(), question).await? {
        AskOutcome::Answered => {
            println!("{}", controller.answer());
            if !controller.sources().is_empty() {
                println!();
                println!("Sources:");
                for (i, source) in controller.sources().iter().enumerate() {
                    println!(
                        "  [{}] {} ({:.2})",
                        i + 1,
                        source.display_title(),
                        source.similarity
                    );
                }
            }
            Ok(())
        }
        AskOutcome::Failed(detail) => bail!("Failed to get an answer: {detail}"),
        AskOutcome::Stale => bail!("The answer arrived for a conversation that was abandoned"),
    }
}

fn question_from(matches: &ArgMatches) -> String {
    matches
        .get_many::<String>("question")
        .map(|words| words.cloned().collect::<Vec<String>>().join(" "))
        .unwrap_or_default()
}

pub async fn run() -> Result<()> {
    let cmd = build();
    let matches = cmd.clone().get_matches();

    if let Some(("config", sub)) = matches.subcommand() {
        if let Some(("default", _)) = sub.subcommand() {
            println!("{}", Config::serialize_default(cmd));
        }
        return Ok(());
    }

    let mut arg_matches = vec![&matches];
    if let Some((_, sub)) = matches.subcommand() {
        arg_matches.push(sub);
    }
    Config::load(cmd, arg_matches).await?;

    let _guard = init_tracing()?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "lmnotes starting");

    match matches.subcommand() {
        Some(("ask", sub)) => ask_once(&question_from(sub)).await,
        _ => ui::start_loop().await,
    }
}
