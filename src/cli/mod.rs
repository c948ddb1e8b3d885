pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "academic-records")]
#[command(about = "Academic records API - students, courses, professors, enrollments and grades")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on, overriding configuration")]
        port: Option<u16>,
    },

    #[command(about = "Create any missing database tables and exit")]
    Migrate,

    #[command(about = "Print a bearer token for the given username")]
    Token {
        #[arg(help = "Username to embed in the token")]
        username: String,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    tracing::info!("Loaded {:?} configuration", config.environment);

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => commands::serve::handle(config, port).await,
        Commands::Migrate => commands::migrate::handle(config).await,
        Commands::Token { username } => commands::token::handle(config, &username),
    }
}
