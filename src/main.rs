use anyhow::{Context, Result};
use clap::Parser;
use socket_finder_lib::config::{load_config, PartialConfig};
use socket_finder_lib::report::{save_report, DEFAULT_REPORT_FILE};
use socket_finder_lib::shutdown::{register_signal_handlers, ShutdownState};
use socket_finder_lib::{
    FormInput, HtmlRenderer, HttpSearchBackend, SearchError, SearchSessionController, SessionPhase,
    TerminalPresenter, Website,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Socket Finder - look up programmer sockets and adapters for a part number
#[derive(Parser, Debug)]
#[command(name = "socket-finder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Part number to search for (prompted for when omitted)
    part_number: Option<String>,

    /// Website to search; repeat for several (systemgeneral, dataio, bpmicro).
    /// Defaults to the configured websites
    #[arg(short = 's', long = "site")]
    sites: Vec<Website>,

    /// Base URL of the search service
    #[arg(long, env = "SOCKET_FINDER_URL")]
    url: Option<String>,

    /// Milliseconds between status checks
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Config file to use instead of ~/.socket-finder/config.yaml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write the results as HTML to this file
    #[arg(long)]
    html: Option<PathBuf>,

    /// Also write a plain-text report, to search_results.txt unless a path is given
    #[arg(
        long,
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = DEFAULT_REPORT_FILE
    )]
    save: Option<PathBuf>,
}

type Controller = SearchSessionController<HttpSearchBackend, TerminalPresenter>;

fn prompt_part_number() -> Result<String> {
    print!("Enter the part number to search for: ");
    std::io::stdout().flush().context("Failed to write prompt")?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read part number")?;
    Ok(line.trim().to_string())
}

async fn run_search(controller: &Controller) -> Result<SessionPhase, SearchError> {
    controller.start_search().await?;
    Ok(controller.wait_until_settled().await)
}

fn write_outputs(cli: &Cli, controller: &Controller, part_number: &str) -> Result<()> {
    let Some(view) = controller.presenter().last_view() else {
        return Ok(());
    };

    if let Some(path) = &cli.html {
        let html = HtmlRenderer::new()?.render(&view)?;
        std::fs::write(path, html)
            .with_context(|| format!("Failed to write HTML to {}", path.display()))?;
        log::info!("HTML results written to {}", path.display());
    }

    if let Some(path) = &cli.save {
        save_report(path, part_number, &view)?;
    }

    Ok(())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::init();

    let overrides = PartialConfig {
        base_url: cli.url.clone(),
        poll_interval_ms: cli.interval_ms,
        request_timeout_secs: None,
        websites: Some(cli.sites.clone()),
    };
    let config = load_config(cli.config.as_deref(), Some(overrides))?;

    let part_number = match &cli.part_number {
        Some(part_number) => part_number.clone(),
        None => prompt_part_number()?,
    };

    let backend = HttpSearchBackend::new(&config.base_url, config.request_timeout())?;
    let presenter = TerminalPresenter::new(FormInput::new(
        part_number.clone(),
        config.websites.iter().copied(),
    ));
    let controller = SearchSessionController::with_poll_interval(
        backend,
        presenter,
        config.poll_interval(),
    );

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    let outcome = rt.block_on(async {
        let shutdown_state = ShutdownState::new();
        if let Err(e) = register_signal_handlers(shutdown_state.clone()) {
            log::warn!("Failed to register signal handlers: {}", e);
        }

        tokio::select! {
            outcome = run_search(&controller) => Some(outcome),
            _ = shutdown_state.requested() => None,
        }
    });

    let phase = match outcome {
        None => {
            controller.cancel();
            eprintln!("Search cancelled");
            return Ok(ExitCode::from(130));
        }
        Some(Ok(phase)) => phase,
        // Already shown through the presenter
        Some(Err(e)) => {
            log::debug!("Search did not start: {:?}", e);
            SessionPhase::Failed
        }
    };

    write_outputs(&cli, &controller, part_number.trim())?;

    Ok(if phase == SessionPhase::Completed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
