use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::client::AgentRunner;
use crate::config::AppConfig;
use crate::form::{FormController, FormState};
use crate::render;
use crate::{build_app, run_server, AppState};

#[derive(Debug, Parser)]
#[command(name = "agent-form", version, about = "Ask the meeting-room agent")]
pub struct Cli {
    /// Base URL the form posts `/api/run` to
    #[arg(long, global = true, env = "AGENT_FORM_URL")]
    pub url: Option<String>,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit one query and print the answer
    Ask {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Read queries from stdin, one per line
    Repl,
    /// Serve the /api gateway in front of the agent backend
    Serve {
        #[arg(long)]
        port: Option<u16>,
        /// Agent backend base URL
        #[arg(long)]
        backend: Option<String>,
        /// Upstream timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
}

impl Cli {
    pub fn resolve_config(&self, mut config: AppConfig) -> AppConfig {
        if let Some(url) = &self.url {
            config.form_url = url.clone();
        }
        if let Command::Serve {
            port,
            backend,
            timeout_ms,
        } = &self.command
        {
            if let Some(port) = port {
                config.port = *port;
            }
            if let Some(backend) = backend {
                config.backend_url = backend.clone();
            }
            if let Some(timeout_ms) = timeout_ms {
                config.timeout_ms = *timeout_ms;
            }
        }
        config
    }
}

pub async fn ask<R>(runner: &R, query: &str) -> Result<String>
where
    R: AgentRunner + ?Sized,
{
    let mut form = FormController::new();
    form.set_input(query);
    if !form.submit(runner).await {
        bail!("query must not be empty");
    }
    match form.state() {
        FormState::Answered(answer) => Ok(answer.clone()),
        FormState::Failed(message) => bail!("{message}"),
        state => bail!("unexpected form state: {state:?}"),
    }
}

pub async fn repl<R, I, W>(runner: &R, input: I, out: &mut W, colored: bool) -> Result<()>
where
    R: AgentRunner + ?Sized,
    I: tokio::io::AsyncRead + Unpin,
    W: Write,
{
    let mut form = FormController::new();
    let mut lines = BufReader::new(input).lines();

    write!(out, "{}", render::render_header(colored))?;
    writeln!(out, "{}", render::render_prompt(&form))?;
    out.flush()?;

    while let Some(line) = lines.next_line().await.context("failed to read query")? {
        form.set_input(line);
        let Some(query) = form.begin_submit() else {
            continue;
        };
        writeln!(out, "{}", render::render_prompt(&form))?;
        out.flush()?;

        let result = runner.run(&query).await;
        form.settle(result);

        writeln!(out, "{}", render::render_state(form.state(), colored))?;
        form.set_input(String::new());
        writeln!(out, "{}", render::render_prompt(&form))?;
        out.flush()?;
    }
    Ok(())
}

pub async fn serve(config: &AppConfig) -> Result<()> {
    let app = build_app(AppState::from_config(config));
    run_server(app, config.port)
        .await
        .with_context(|| format!("gateway failed on port {}", config.port))
}
