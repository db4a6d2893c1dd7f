//! Hearth CLI - Talk to conversation agents
//!
//! Simple CLI for the Hearth API: single sentences, interactive chat and
//! agent listing.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Input, Password};

use api::{HearthClient, ProcessRequest, ProcessResponse};
use config::Config;

#[derive(Parser)]
#[command(name = "hearth")]
#[command(about = "Hearth CLI - Talk to conversation agents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one sentence to an agent
    Converse {
        /// Sentence to process
        text: String,
        /// Agent entry id or entity id (defaults to the configured agent)
        #[arg(short, long)]
        agent: Option<String>,
        /// Continue an existing conversation
        #[arg(short, long)]
        conversation_id: Option<String>,
        /// Language code (defaults to the server language)
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Interactive chat that keeps the conversation going
    Chat {
        /// Agent entry id or entity id
        #[arg(short, long)]
        agent: Option<String>,
        /// Language code
        #[arg(short, long)]
        language: Option<String>,
    },

    /// List conversation agents
    Agents,

    /// Store the API token and server URL
    Login {
        /// API token (will prompt if not provided)
        #[arg(short, long)]
        token: Option<String>,
        /// Server URL
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Converse {
            text,
            agent,
            conversation_id,
            language,
        } => cmd_converse(text, agent, conversation_id, language).await,
        Commands::Chat { agent, language } => cmd_chat(agent, language).await,
        Commands::Agents => cmd_agents().await,
        Commands::Login { token, url } => cmd_login(token, url).await,
        Commands::Config => cmd_config(),
    }
}

// ============================================
// Command Implementations
// ============================================

fn client(config: &Config) -> HearthClient {
    HearthClient::new(&config.base_url, config.api_token.as_deref())
}

/// Print the speech of a turn; errors in red with their code
fn print_response(response: &ProcessResponse) {
    match response.error_code() {
        Some(code) => println!("{} {}", format!("[{}]", code).red(), response.speech().red()),
        None => println!("{}", response.speech()),
    }
}

async fn cmd_converse(
    text: String,
    agent: Option<String>,
    conversation_id: Option<String>,
    language: Option<String>,
) -> Result<()> {
    let config = Config::load()?;
    let client = client(&config);

    let response = client
        .process(&ProcessRequest {
            text: &text,
            conversation_id: conversation_id.as_deref(),
            language: language.as_deref().or(config.language.as_deref()),
            agent_id: config.agent(agent.as_deref()),
        })
        .await?;

    print_response(&response);

    if let Some(id) = &response.conversation_id {
        eprintln!("{} {}", "conversation:".dimmed(), id.dimmed());
    }

    Ok(())
}

async fn cmd_chat(agent: Option<String>, language: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let client = client(&config);
    let agent_id = config.agent(agent.as_deref());
    let language = language.as_deref().or(config.language.as_deref());

    println!(
        "{} {}",
        "Chatting with".dimmed(),
        agent_id.unwrap_or("the default agent").cyan()
    );
    println!("{}", "Empty line or 'exit' to quit.".dimmed());

    let mut conversation_id: Option<String> = None;

    loop {
        let text: String = Input::new()
            .with_prompt(">")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read input")?;

        let text = text.trim();
        if text.is_empty() || text == "exit" {
            break;
        }

        let response = client
            .process(&ProcessRequest {
                text,
                conversation_id: conversation_id.as_deref(),
                language,
                agent_id,
            })
            .await?;

        print_response(&response);

        if response.conversation_id.is_some() {
            conversation_id = response.conversation_id;
        }
    }

    Ok(())
}

async fn cmd_agents() -> Result<()> {
    let config = Config::load()?;
    let agents = client(&config).list_agents().await?;

    if agents.is_empty() {
        println!("No agents registered.");
        return Ok(());
    }

    println!("{}", "Agents:".bold());
    for agent in agents {
        let is_default = config.default_agent.as_deref() == Some(agent.entity_id.as_str())
            || config.default_agent.as_deref() == Some(agent.id.as_str());
        let default_marker = if is_default {
            " (default)".green().to_string()
        } else {
            String::new()
        };

        let languages = match &agent.supported_languages {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(list) => list
                .iter()
                .filter_map(|l| l.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            _ => "-".to_string(),
        };

        println!(
            "  {} {} [{}] {}{}",
            agent.entity_id.cyan().bold(),
            agent.name,
            languages,
            agent.id.dimmed(),
            default_marker
        );
    }

    Ok(())
}

async fn cmd_login(token: Option<String>, url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(url) = url {
        config.base_url = url.trim_end_matches('/').to_string();
    }

    let api_token = match token {
        Some(t) => t,
        None => Password::new()
            .with_prompt("API Token")
            .interact()
            .context("Failed to read API token")?,
    };

    let client = HearthClient::new(&config.base_url, Some(&api_token));
    print!("Testing connection... ");

    match client.health().await {
        Ok(true) => {}
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not connect to Hearth API at {}", config.base_url);
        }
    }

    if let Err(e) = client.verify_token().await {
        println!("{}", "Failed".red());
        bail!("Token rejected: {}", e);
    }
    println!("{}", "OK".green());

    config.api_token = Some(api_token);
    config.save()?;

    println!("{} Token saved to {:?}", "✓".green(), Config::config_path()?);

    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  API Token: {}",
        if config.api_token.is_some() {
            "Set".green()
        } else {
            "Not set".red()
        }
    );
    println!(
        "  Default Agent: {}",
        config.default_agent.as_deref().unwrap_or("None").cyan()
    );
    println!(
        "  Language: {}",
        config.language.as_deref().unwrap_or("server default")
    );

    Ok(())
}
