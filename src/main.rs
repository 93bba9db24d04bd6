use std::sync::Arc;
use std::time::Duration;
use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use continuity_core::{render_message, AgentClient, Endpoint, Message, Notice, Role, Session, KNOWLEDGE_LABEL};

mod app;
mod config;
mod handler;
mod logging;
#[cfg(test)]
mod testing;
mod tui;
mod ui;

use app::App;
use config::{Config, ENDPOINT_ENV};

#[derive(Parser)]
#[command(name = "continuity")]
#[command(about = "Chat with the AI knowledge continuity agent and teach it new solutions")]
struct Cli {
    /// Backend base address (overrides config and $CONTINUITY_ENDPOINT)
    #[arg(short, long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat (default)
    Chat,
    /// Ask a single question and print the answer
    Ask {
        /// Your question
        question: String,
    },
    /// Teach the agent an issue and its solution
    Teach {
        /// The IT issue
        #[arg(short, long)]
        issue: String,
        /// How it was solved
        #[arg(short, long)]
        solution: String,
    },
    /// Check that the backend is reachable
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|err| {
        eprintln!("{}: {}", "Ignoring unreadable config".yellow(), err);
        Config::default()
    });
    let endpoint = Endpoint::new(config.resolve_endpoint(
        cli.endpoint.as_deref(),
        std::env::var(ENDPOINT_ENV).ok(),
    ));

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(&config, endpoint).await,
        Commands::Ask { question } => {
            logging::init_stderr();
            ask_once(endpoint, &question).await
        }
        Commands::Teach { issue, solution } => {
            logging::init_stderr();
            teach_once(endpoint, &issue, &solution).await
        }
        Commands::Status => {
            logging::init_stderr();
            check_status(&endpoint).await
        }
    }
}

async fn run_chat(config: &Config, endpoint: Endpoint) -> Result<()> {
    let log_dir = Config::config_dir()?;
    std::fs::create_dir_all(&log_dir)?;
    logging::init_file(&log_dir);
    tracing::info!(%endpoint, "starting chat session");

    let session = Session::new(Arc::new(AgentClient::new()), endpoint);
    let mut app = App::new(session, Duration::from_secs(config.notice_seconds()));

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;
            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event).await?,
                None => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    tracing::info!("chat session ended");
    result
}

async fn ask_once(endpoint: Endpoint, question: &str) -> Result<()> {
    let mut session = Session::new(Arc::new(AgentClient::new()), endpoint);
    let mut notices: Vec<Notice> = Vec::new();

    if !session.submit_question(question) {
        bail!("Question cannot be empty");
    }
    session.settle(&mut notices).await;

    for message in session.conversation.messages() {
        print_message(message);
    }
    report(&notices)
}

async fn teach_once(endpoint: Endpoint, issue: &str, solution: &str) -> Result<()> {
    let mut session = Session::new(Arc::new(AgentClient::new()), endpoint);
    let mut notices: Vec<Notice> = Vec::new();

    session.submit_memory(issue, solution, &mut notices);
    session.settle(&mut notices).await;

    report(&notices)
}

async fn check_status(endpoint: &Endpoint) -> Result<()> {
    println!("🔌 Checking {}", endpoint.to_string().bold().cyan());
    match AgentClient::new().status(endpoint.url()).await {
        Ok(message) => {
            println!("{} {}", "Backend is up:".bold().green(), message);
            Ok(())
        }
        Err(err) => {
            println!("{}: {}", "Backend unreachable".red(), err);
            println!("Set another address with {} or {}", "--endpoint".bold(), ENDPOINT_ENV.bold());
            bail!("backend status check failed")
        }
    }
}

fn print_message(message: &Message) {
    let rendered = render_message(message);
    let label = format!("{}:", rendered.label);
    let label = match rendered.role {
        Role::User => label.bold().cyan(),
        Role::Assistant => label.bold().yellow(),
    };
    println!("{}", label);
    for line in &rendered.body {
        println!("{}", line);
    }
    if let Some(knowledge) = &rendered.knowledge {
        println!("{}", format!("│ {}", KNOWLEDGE_LABEL.to_uppercase()).dimmed().bold());
        for line in knowledge {
            println!("{}", format!("│ {}", line).dimmed());
        }
    }
    println!();
}

/// Print notices; fail if any of them reports a problem.
fn report(notices: &[Notice]) -> Result<()> {
    for notice in notices {
        if notice.is_error() {
            eprintln!("{}: {}", notice.title.red().bold(), notice.description);
        } else {
            println!("{}: {}", notice.title.green().bold(), notice.description);
        }
    }
    if let Some(failure) = notices.iter().find(|n| n.is_error()) {
        bail!("{}", failure.title);
    }
    Ok(())
}
