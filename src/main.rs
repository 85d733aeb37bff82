use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use nightshift::domain::ToolKind;

mod cli;

#[derive(Parser)]
#[command(name = "nightshift")]
#[command(about = "Chains AI coding CLIs so the next session picks up where the last one stopped")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install continuation hooks and prepare the host tool configs
    Install {
        /// Back up legacy configuration files before touching anything
        #[arg(long)]
        backup_legacy: bool,

        /// Rewrite hook entries left behind by the predecessor scripts
        #[arg(long)]
        migrate: bool,
    },

    /// Remove installed hooks and restore default configurations
    Uninstall,

    /// Enable continuation automation for a tool
    Enable { tool: ToolKind },

    /// Disable continuation automation for a tool
    Disable { tool: ToolKind },

    /// Show hook and install state for all tools
    Status,

    /// Launch one of the supported CLIs with continuation-friendly defaults
    Run {
        tool: ToolKind,

        /// Working directory for the launched tool
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Codex profile (passed via -m)
        #[arg(long)]
        profile: Option<String>,

        /// Run Codex in exec mode (-p -e)
        #[arg(long)]
        exec: bool,

        /// Claude model identifier
        #[arg(long)]
        model: Option<String>,

        /// Initial prompt for the launched tool
        #[arg(long)]
        prompt: Option<String>,
    },

    /// Manage continuation routing
    Continuation {
        #[command(subcommand)]
        command: ContinuationCommands,
    },

    /// Manage continuation prompt templates
    Prompt {
        #[command(subcommand)]
        command: PromptCommands,
    },

    /// Manage hand-off notifications
    Notify {
        #[command(subcommand)]
        command: NotifyCommands,
    },

    /// Manage terminal launch commands
    Terminal {
        #[command(subcommand)]
        command: TerminalCommands,
    },

    /// Operate on shared instruction files (CLAUDE.md and friends)
    Rules {
        /// Link copies of each instruction file to a canonical parent
        #[arg(long)]
        sync: bool,

        /// Append text to each instruction file
        #[arg(long)]
        append: Option<String>,

        /// Search instruction files for a substring
        #[arg(long)]
        search: Option<String>,

        /// Replace text across instruction files
        #[arg(long, num_args = 2, value_names = ["SEARCH", "REPLACE"])]
        replace: Option<Vec<String>>,

        /// Operate on the global config directories instead of the cwd
        #[arg(long = "global")]
        global_mode: bool,
    },

    /// Check for or apply CLI toolchain updates
    Update {
        /// Show current and available versions
        #[arg(long)]
        check: bool,

        /// Update the CLI tools only
        #[arg(long)]
        cli: bool,

        /// Update the nightshift package only
        #[arg(long)]
        self_update: bool,

        /// Update both the CLI tools and the package
        #[arg(long)]
        all: bool,

        /// Log what would run without executing anything
        #[arg(long)]
        dry_run: bool,

        /// Tool names to skip during updates
        #[arg(long)]
        skip: Vec<String>,
    },

    /// Tag the current git HEAD with the next patch version and push
    Bump,

    /// Continuation stop-hook entry point (invoked by the host tools)
    #[command(hide = true)]
    Hook {
        tool: ToolKind,

        /// Run the continuation in-process instead of a new terminal
        #[arg(long)]
        direct: bool,
    },

    /// Execute a previously written hand-off plan
    #[command(hide = true)]
    Resume {
        /// Path to the hand-off plan file
        #[arg(long)]
        config: PathBuf,
    },

    /// Legacy demonstration of the data-summarisation helper
    #[command(hide = true)]
    Summarize,
}

#[derive(Subcommand)]
enum ContinuationCommands {
    /// Route continuations from SOURCE to TARGET and enable them
    Set { source: ToolKind, target: ToolKind },

    /// Turn continuation off for SOURCE
    Disable { source: ToolKind },

    /// Show the continuation routing table
    Status,
}

#[derive(Subcommand)]
enum PromptCommands {
    /// Store a continuation prompt template for TOOL
    Set { tool: ToolKind, template: String },

    /// Print the stored prompt template for TOOL
    Show { tool: ToolKind },
}

#[derive(Subcommand)]
enum NotifyCommands {
    /// Override the notification message and/or toggle delivery
    Set {
        #[arg(long)]
        message: Option<String>,

        #[arg(long)]
        enabled: Option<bool>,
    },

    /// Set the notification sound
    Sound { name: String },

    /// Show the notification preferences
    Show,
}

#[derive(Subcommand)]
enum TerminalCommands {
    /// Store a terminal launch command for a platform
    Set {
        /// Platform key: darwin, linux, or windows
        platform: String,

        /// Command template; the last argument must contain {command}
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 1..)]
        command: Vec<String>,
    },

    /// Print the stored terminal command for a platform
    Show { platform: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    match cli.command {
        Commands::Install {
            backup_legacy,
            migrate,
        } => cli::install::install_command(backup_legacy, migrate)?,
        Commands::Uninstall => cli::install::uninstall_command()?,
        Commands::Enable { tool } => cli::install::enable_command(tool)?,
        Commands::Disable { tool } => cli::install::disable_command(tool)?,
        Commands::Status => cli::status::status_command()?,
        Commands::Run {
            tool,
            cwd,
            profile,
            exec,
            model,
            prompt,
        } => cli::run::run_command(tool, cwd, profile, exec, model, prompt).await?,
        Commands::Continuation { command } => match command {
            ContinuationCommands::Set { source, target } => {
                cli::continuation::set_command(source, target)?
            }
            ContinuationCommands::Disable { source } => {
                cli::continuation::disable_command(source)?
            }
            ContinuationCommands::Status => cli::continuation::status_command()?,
        },
        Commands::Prompt { command } => match command {
            PromptCommands::Set { tool, template } => cli::prompt::set_command(tool, template)?,
            PromptCommands::Show { tool } => cli::prompt::show_command(tool)?,
        },
        Commands::Notify { command } => match command {
            NotifyCommands::Set { message, enabled } => {
                cli::notify::set_command(message, enabled)?
            }
            NotifyCommands::Sound { name } => cli::notify::sound_command(&name)?,
            NotifyCommands::Show => cli::notify::show_command()?,
        },
        Commands::Terminal { command } => match command {
            TerminalCommands::Set { platform, command } => {
                cli::terminal::set_command(&platform, command)?
            }
            TerminalCommands::Show { platform } => cli::terminal::show_command(&platform)?,
        },
        Commands::Rules {
            sync,
            append,
            search,
            replace,
            global_mode,
        } => cli::rules::rules_command(sync, append, search, replace, global_mode)?,
        Commands::Update {
            check,
            cli: cli_tools,
            self_update,
            all,
            dry_run,
            skip,
        } => cli::update::update_command(check, cli_tools, self_update, all, dry_run, skip).await?,
        Commands::Bump => cli::bump::bump_command(cli.verbose)?,
        Commands::Hook { tool, direct } => cli::hook::hook_command(tool, direct)?,
        Commands::Resume { config } => cli::resume::resume_command(&config)?,
        Commands::Summarize => cli::summarize::summarize_command()?,
    }

    Ok(())
}
