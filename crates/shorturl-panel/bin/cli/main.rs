mod cli;
mod terminal;

use crate::cli::{Command, CLI};
use crate::terminal::TerminalView;
use anyhow::{bail, Context};
use clap::Parser;
use shorturl_client::HttpAdminClient;
use shorturl_core::{AdminApi, ShortCode};
use shorturl_panel::{AdminPanel, Dispatch, HtmlTableView, InitOutcome, PanelEvent, View};
use tracing::info;
use tracing_subscriber::EnvFilter;

const MISSING_KEY: &str =
    "no api key: pass --api-key, set SHORTURL_ADMIN_API_KEY or use a page url with ?apikey=";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = CLI::parse();
    let session = config.session()?;

    info!(
        origin = %config.origin,
        variant = %session.variant,
        host = %session.host,
        "starting shorturl admin"
    );

    let client = HttpAdminClient::new(&config.origin, session.variant.clone(), session.api_key.clone())?;

    match config.command {
        Command::Logs => {
            let panel = AdminPanel::new(session, client, TerminalView::default());
            authorized(panel.authenticate().await?)?;
            print_logs(panel.api()).await
        }
        Command::Html => {
            let panel = AdminPanel::new(session, client, HtmlTableView::new());
            activate(&panel).await?;
            println!("{}", panel.view().markup());
            Ok(())
        }
        Command::List => {
            let panel = AdminPanel::new(session, client, TerminalView::default());
            activate(&panel).await?;
            panel.view().print();
            Ok(())
        }
        Command::Add {
            long_url,
            short_code,
        } => {
            let panel = AdminPanel::new(session, client, TerminalView::default());
            activate(&panel).await?;
            let outcome = panel
                .dispatch(PanelEvent::Submit {
                    long_url,
                    short_code,
                })
                .await?;
            panel.view().print();
            check(outcome)
        }
        Command::Delete { short_code } => {
            let panel = AdminPanel::new(session, client, TerminalView::default());
            activate(&panel).await?;
            let outcome = panel
                .dispatch(PanelEvent::Delete(ShortCode::new(short_code)))
                .await?;
            panel.view().print();
            check(outcome)
        }
    }
}

async fn activate<V: View>(panel: &AdminPanel<HttpAdminClient, V>) -> anyhow::Result<()> {
    let outcome = panel
        .initialize()
        .await
        .context("failed to initialize admin panel")?;
    authorized(outcome)
}

fn authorized(outcome: InitOutcome) -> anyhow::Result<()> {
    match outcome {
        InitOutcome::Active => Ok(()),
        InitOutcome::MissingApiKey => bail!(MISSING_KEY),
        InitOutcome::Unauthorized => bail!("the backend refused the api key"),
    }
}

fn check(outcome: Dispatch) -> anyhow::Result<()> {
    match outcome {
        Dispatch::Applied => Ok(()),
        Dispatch::Failed(err) => Err(err.into()),
        Dispatch::Ignored => bail!("no such row"),
    }
}

async fn print_logs(client: &HttpAdminClient) -> anyhow::Result<()> {
    let logs = client.access_logs().await?;
    if logs.is_empty() {
        println!("(no access logs)");
        return Ok(());
    }

    println!("CODE\tCOUNT\tLAST ACCESS\tURL");
    for log in logs {
        println!(
            "{}\t{}\t{}\t{}",
            log.code,
            log.access_count,
            log.last_access.as_deref().unwrap_or("-"),
            log.url.as_deref().unwrap_or("(deleted)")
        );
    }
    Ok(())
}
