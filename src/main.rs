use agent_form::cli::{self, Cli, Command};
use agent_form::config::AppConfig;
use agent_form::AgentClient;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agent_form=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Cli::parse();
    let config = args.resolve_config(AppConfig::from_env());
    let colored = !args.no_color;
    debug!(?config, "resolved configuration");

    match &args.command {
        Command::Ask { query } => {
            let client = AgentClient::new(&config.form_url);
            let answer = cli::ask(&client, &query.join(" ")).await?;
            println!("{answer}");
        }
        Command::Repl => {
            let client = AgentClient::new(&config.form_url);
            let mut stdout = std::io::stdout();
            cli::repl(&client, tokio::io::stdin(), &mut stdout, colored).await?;
        }
        Command::Serve { .. } => cli::serve(&config).await?,
    }

    Ok(())
}
