use std::io::IsTerminal;
use std::sync::Arc;

use color_eyre::Result;
use tokio::io::BufReader;

use chatloom::app::App;
use chatloom::cli::{parse_args, usage, version_line, CliCommand};
use chatloom::config::AppConfig;
use chatloom::input::ComposeBox;
use chatloom::logging;
use chatloom::names::NameIndex;
use chatloom::responder::{MockResponder, RandomPolicy};
use chatloom::server::start_mention_server_on;
use chatloom::session::ChatSession;

fn main() -> Result<()> {
    // Answer --version / --help before any initialization
    let options = match parse_args(std::env::args()) {
        CliCommand::Version => {
            println!("{}", version_line());
            return Ok(());
        }
        CliCommand::Help => {
            print!("{}", usage());
            return Ok(());
        }
        CliCommand::Invalid(message) => {
            eprintln!("error: {}\n\n{}", message, usage());
            std::process::exit(2);
        }
        CliCommand::Run(options) => options,
    };

    color_eyre::install()?;
    logging::init();

    let config = AppConfig::from_env().with_run_options(&options);
    tracing::debug!(?config, "Configuration loaded");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(config))
}

async fn run(config: AppConfig) -> Result<()> {
    let count = config.name_count;
    let started = std::time::Instant::now();
    let names = tokio::task::spawn_blocking(move || NameIndex::synthetic(count)).await?;
    let names = Arc::new(names);
    tracing::info!(
        names = names.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Name index built"
    );

    let server = if config.mention_server {
        match start_mention_server_on(config.server_addr(), Arc::clone(&names)).await {
            Ok((handle, _addr)) => Some(handle),
            // The chat still works without the lookup endpoint
            Err(e) if !config.server_only => {
                tracing::warn!("Mention server not started: {}", e);
                None
            }
            Err(e) => return Err(e),
        }
    } else {
        None
    };

    if config.server_only {
        if let Some(handle) = server {
            tokio::select! {
                _ = handle => {}
                _ = tokio::signal::ctrl_c() => tracing::info!("Shutting down"),
            }
        }
        return Ok(());
    }

    let responder = Arc::new(MockResponder::new(Arc::new(RandomPolicy::new())));
    let session = ChatSession::restore(config.persistence(), responder);
    let stdout = std::io::stdout();
    let styled = stdout.is_terminal();

    let mut app = App::new(session, ComposeBox::new(names), stdout).with_styling(styled);
    app.run(BufReader::new(tokio::io::stdin())).await?;

    if let Some(handle) = server {
        handle.abort();
    }
    Ok(())
}
