use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "budgetbot")]
#[command(author, version, about = "Telegram bot for shared budget sheets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (long polling)
    Run,

    /// Apply pending database migrations and exit
    Migrate,

    /// Print the resolved configuration (token redacted) and exit
    CheckConfig,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
