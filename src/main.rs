mod cli;

use clap::Parser;
use cli::{Cli, Command, Services};
use spark_youth::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spark_youth=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cfg = Config::load()?;

    match cli.command {
        Command::Challenge => cli::inspire::challenge(&cfg).await,
        Command::Affirm { mood } => cli::inspire::affirm(&cfg, &mood).await,
        Command::Config { init } => cli::config::run(&cfg, init),
        Command::Signup { email, username } => {
            cli::account::signup(&Services::open(&cfg)?, email, username).await
        }
        Command::Login { email } => cli::account::login(&Services::open(&cfg)?, email).await,
        Command::Logout => cli::account::logout(&Services::open(&cfg)?).await,
        Command::Home => cli::home::run(&Services::open(&cfg)?).await,
        Command::Profile { edit } => cli::profile::run(&Services::open(&cfg)?, edit).await,
        Command::Settings { name, mood, clear } => {
            cli::settings::run(&Services::open(&cfg)?, name, mood, clear).await
        }
    }
}
