use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Output format for CLI commands
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Folio - portfolio profile, projects and contact chat")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Chat backend base URL
    #[arg(long, global = true, env = "FOLIO_AGENT_BACKEND")]
    pub backend_url: Option<String>,

    /// Main server base URL for profile and projects
    #[arg(long, global = true, env = "FOLIO_MAIN_SERVER")]
    pub server_url: Option<String>,

    /// Config file (defaults to ~/.config/folio/config.toml)
    #[arg(long, global = true, env = "FOLIO_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chat with the contact agent
    Chat(ChatArgs),

    /// Show the portfolio owner's profile
    Profile,

    /// List portfolio projects
    Projects(ProjectsArgs),

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct ChatArgs {
    /// Send one message, print the reply and exit
    #[arg(short, long)]
    pub message: Option<String>,

    /// Skip the opening greeting
    #[arg(long)]
    pub no_greeting: bool,
}

#[derive(Args)]
pub struct ProjectsArgs {
    /// Page number (1-based)
    #[arg(short, long)]
    pub page: Option<u32>,
}
