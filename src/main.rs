//! `coding-agent` command-line interface.

use clap::{Args, Parser, Subcommand};
use coding_agent::agent::{Orchestrator, SubAgentFactory};
use coding_agent::config::{load_settings, GATEWAY_NAME};
use coding_agent::error::AgentError;
use coding_agent::llm::{AnthropicClient, LLMError};
use coding_agent::logging;
use coding_agent::memory::MemoryStore;
use coding_agent::tools::{PermissionMode, Sandbox, ToolRegistry};
use coding_agent::types::SessionId;
use coding_agent::workspace::{ephemeral_copy, prepare_repository, MissingRepository};
use indicatif::{ProgressBar, ProgressStyle};
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Repository-aware coding agent
#[derive(Parser, Debug)]
#[command(name = "coding-agent")]
#[command(about = "A coding agent with tool use, sub-agent delegation, and persistent memory")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start an interactive chat session
    Chat {
        #[command(flatten)]
        options: RunOptions,
    },
    /// Send a single prompt and print the answer
    Oneshot {
        /// The prompt to send to the agent
        prompt: String,
        #[command(flatten)]
        options: RunOptions,
    },
}

#[derive(Args, Debug, Clone)]
struct RunOptions {
    /// Path to the repository to work with
    #[arg(short, long, default_value = "demo/sample_repo")]
    repo: PathBuf,

    /// Model to use (overrides the config file)
    #[arg(short, long)]
    model: Option<String>,

    /// Work on a temporary copy of the repository (default)
    #[arg(long, overrides_with = "no_ephemeral")]
    ephemeral: bool,

    /// Work on the repository in place
    #[arg(long)]
    no_ephemeral: bool,

    /// Allow the agent to write files (default)
    #[arg(long, overrides_with = "read_only")]
    allow_write: bool,

    /// Disable file-writing tools
    #[arg(long)]
    read_only: bool,

    /// Directory writes are confined to
    #[arg(long, value_name = "PATH")]
    write_root: Option<PathBuf>,

    /// Completion requests per message
    #[arg(long, value_name = "N")]
    max_turns: Option<u32>,

    /// Show per-turn and per-tool logs
    #[arg(short, long)]
    verbose: bool,
}

impl RunOptions {
    fn is_ephemeral(&self) -> bool {
        self.ephemeral || !self.no_ephemeral
    }

    fn mode(&self) -> PermissionMode {
        if self.read_only && !self.allow_write {
            PermissionMode::ReadOnly
        } else {
            PermissionMode::ReadWrite
        }
    }
}

/// A ready-to-run top-level agent.
struct Session {
    orchestrator: Orchestrator,
    registry: ToolRegistry,
    ephemeral: bool,
}

impl Session {
    fn init(options: &RunOptions, missing: MissingRepository) -> Result<Self, AgentError> {
        let cwd = std::env::current_dir().map_err(|e| AgentError::workspace(".", e.to_string()))?;

        let mut settings = load_settings(&cwd)?;
        if let Some(model) = &options.model {
            settings = settings.with_model(model.clone());
        }
        if let Some(max_turns) = options.max_turns {
            settings = settings.with_max_turns(max_turns);
        }
        if let Some(write_root) = &options.write_root {
            settings = settings.with_write_root(write_root, &cwd);
        }

        logging::init(&settings.logging.clone().with_verbose(options.verbose))?;
        tracing::debug!(?settings, "settings resolved");

        prepare_repository(&options.repo, missing)?;
        let repo = if options.is_ephemeral() {
            let copy = ephemeral_copy(&options.repo, &SessionId::new())?;
            println!("Ephemeral repo: {}", copy.display());
            copy
        } else {
            options.repo.clone()
        };

        let root = repo
            .canonicalize()
            .map_err(|e| AgentError::workspace(&repo, e.to_string()))?;
        let sandbox = Sandbox::new(&root, settings.write_root_for(&root))
            .map_err(|e| AgentError::workspace(&root, e.to_string()))?;

        let client = Arc::new(AnthropicClient::new(settings.provider_config())?);
        let memory = Arc::new(MemoryStore::new(sandbox.root()));
        let config = settings.orchestrator_config();

        let factory = SubAgentFactory::new(client.clone(), config.clone(), sandbox.clone(), memory.clone())
            .with_gateway(settings.gateway.clone())
            .with_max_depth(settings.max_delegation_depth);
        let registry = ToolRegistry::new(sandbox, options.mode())
            .with_memory(memory)
            .with_gateway(settings.gateway.clone())
            .with_delegation(Arc::new(factory), 0, settings.max_delegation_depth);
        let orchestrator = Orchestrator::new(client, config);

        tracing::info!(
            session = %orchestrator.session_id(),
            root = %registry.sandbox().root().display(),
            mode = %registry.mode(),
            "agent ready"
        );
        Ok(Self {
            orchestrator,
            registry,
            ephemeral: options.is_ephemeral(),
        })
    }

    fn print_banner(&self) {
        println!("AI Coding Agent");
        println!("Model: {}", self.orchestrator.model());
        println!("Repository: {}", self.registry.sandbox().root().display());
        println!(
            "Mode: {} / {}",
            if self.ephemeral { "Ephemeral" } else { "Direct" },
            self.registry.mode()
        );
        println!("Writes allowed under: {}", self.registry.sandbox().write_root().display());
        println!("\nAvailable tools:");
        for definition in self.registry.client_definitions() {
            let summary = definition.description.lines().next().unwrap_or_default();
            println!("  - {}: {}", definition.name, summary);
        }
        println!("  - web_search: Search the web (server tool)");
        if let Some(gateway) = self.registry.gateway() {
            println!("  - {GATEWAY_NAME}: external tools at {}", gateway.url());
        }
        println!("\nType 'exit' or 'quit' to end the session, 'clear' to reset history.\n");
    }
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Agent: Thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Formats a failed run, noting when sending the message again may work.
fn failure_message(error: &LLMError) -> String {
    if error.is_transient() {
        format!("Error: {error} (temporary failure; send the message again)")
    } else {
        format!("Error: {error}")
    }
}

fn is_exit_command(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "exit" | "quit" | "q")
}

async fn chat(mut session: Session, verbose: bool) -> ExitCode {
    session.print_banner();

    let mut line_editor = Reedline::create();
    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("You".to_string()),
        DefaultPromptSegment::Empty,
    );

    loop {
        let input = match line_editor.read_line(&prompt) {
            Ok(Signal::Success(buffer)) => buffer,
            Ok(Signal::CtrlC) => {
                println!("Interrupted. Type 'exit' to quit.");
                continue;
            }
            Ok(Signal::CtrlD) => {
                println!("Goodbye!");
                break;
            }
            #[allow(unreachable_patterns)]
            Ok(_) => continue,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        };

        if is_exit_command(&input) {
            println!("Goodbye!");
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("clear") {
            session.orchestrator.clear_history();
            println!("History cleared.");
            continue;
        }

        let spinner = (!verbose).then(thinking_spinner);
        let outcome = tokio::select! {
            result = session.orchestrator.run(input, &session.registry) => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        };
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        match outcome {
            Some(Ok(answer)) => {
                println!("Agent:");
                termimad::print_text(&answer);
                println!();
            }
            Some(Err(e)) => eprintln!("{}", failure_message(&e)),
            None => println!("\nInterrupted. Type 'exit' to quit."),
        }
    }
    ExitCode::SUCCESS
}

async fn oneshot(mut session: Session, prompt: &str) -> ExitCode {
    match session.orchestrator.run(prompt, &session.registry).await {
        Ok(answer) => {
            println!("{answer}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", failure_message(&e));
            ExitCode::FAILURE
        }
    }
}

fn init_or_report(options: &RunOptions, missing: MissingRepository) -> Option<Session> {
    match Session::init(options, missing) {
        Ok(session) => Some(session),
        Err(e) => {
            eprintln!("Error initializing agent: {e}");
            None
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Chat { options } => match init_or_report(&options, MissingRepository::Create) {
            Some(session) => chat(session, options.verbose).await,
            None => ExitCode::FAILURE,
        },
        Command::Oneshot { prompt, options } => match init_or_report(&options, MissingRepository::Reject) {
            Some(session) => oneshot(session, &prompt).await,
            None => ExitCode::FAILURE,
        },
    }
}
