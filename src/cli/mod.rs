//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments, resolves configuration and
//! dispatches to the interactive chat or one of the one-shot commands.

pub mod health;
pub mod model_list;
pub mod say;
pub mod settings;


use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::health::check_health;
use crate::cli::model_list::list_models;
use crate::cli::say::run_say;
use crate::cli::settings::{set_config_value, show_config, unset_config_value};
use crate::core::config::{Config, ResolvedSettings, SettingsOverrides, BASE_URL_ENV};
use crate::ui::run_chat;
use crate::utils::logging::{init_logging, LogTarget};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "ollama-chat")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Chat with language models behind an OpenAI-compatible API")]
#[command(
    long_about = "ollama-chat is a terminal chat client for models served behind an \
OpenAI-compatible API (for example an Ollama adapter). It lists the models the \
server offers, lets you pick one, and sends each turn as a single chat completion.\n\n\
Environment Variables:\n\
  API_URL           Base URL of the API (optional, defaults to http://localhost:8000)\n\
  RUST_LOG          Log filter for diagnostic output\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a newline\n\
  Tab / Shift+Tab   Switch to the next / previous model\n\
  Ctrl+R            Reload the model list\n\
  Esc / Ctrl+C      Quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the API (overrides API_URL and the config file)
    #[arg(short = 'u', long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Model to select once the listing loads, if the server offers it
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Write diagnostic logs to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send a single message and print the reply
    Say {
        /// Message text; multiple words are joined with spaces
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List the models the server offers, in server order
    Models,
    /// Check that the API adapter is up
    Health,
    /// Set a configuration value
    Set {
        /// Configuration key (base-url, default-model, system-prompt, temperature, max-tokens, request-timeout)
        key: String,
        /// Value for the key (multiple words are joined with spaces)
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Print the configuration file
    Config,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Commands::Chat);

    let log_target = match command {
        Commands::Chat => LogTarget::for_tui(args.log.clone()),
        _ => LogTarget::for_command(args.log.clone()),
    };
    init_logging(log_target)?;

    let overrides = SettingsOverrides {
        base_url: args.base_url,
        model: args.model,
    };

    match command {
        Commands::Chat => run_chat(resolve_settings(&overrides)?).await,
        Commands::Say { prompt } => run_say(resolve_settings(&overrides)?, prompt).await,
        Commands::Models => list_models(resolve_settings(&overrides)?).await,
        Commands::Health => check_health(resolve_settings(&overrides)?).await,
        Commands::Set { key, value } => set_config_value(&key, &value.join(" ")),
        Commands::Unset { key } => unset_config_value(&key),
        Commands::Config => show_config(),
    }
}

fn resolve_settings(overrides: &SettingsOverrides) -> Result<ResolvedSettings, Box<dyn Error>> {
    let config = Config::load()?;
    let env_base_url = std::env::var(BASE_URL_ENV).ok();
    Ok(config.resolve(overrides, env_base_url)?)
}
