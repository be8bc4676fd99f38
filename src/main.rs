use anyhow::{Context, Result};
use clap::Parser;
use parking_lot::RwLock;
use std::fs::File;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use conncheck::catalog::{CatalogLoader, CatalogState};
use conncheck::cli::Args;
use conncheck::config::Config;
use conncheck::controller::{SessionController, SubmitOutcome};
use conncheck::destinations;
use conncheck::export::{export_json, generate_report};
use conncheck::prefs::Prefs;
use conncheck::runner::TestRunClient;
use conncheck::tui::{SharedCatalog, Theme, UiState, run_tui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    init_tracing(&args)?;

    // CLI override > saved preference > default
    let prefs = Prefs::load();
    let config = Config::from(&args).with_prefs(&args, &prefs);

    let runner = TestRunClient::new(&config.backend_url, config.timeout)
        .context("Failed to build HTTP client")?;
    let controller =
        SessionController::new(Arc::new(runner)).with_export_dir(config.export_dir.clone());

    if args.is_batch_mode() {
        run_batch_mode(&args, &config, controller).await
    } else {
        run_interactive_mode(&args, &config, controller).await
    }
}

/// Logs go to `--log-file` if given, else stderr in batch mode.
/// The TUI owns the terminal, so without a log file it gets no subscriber.
fn init_tracing(args: &Args) -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    if let Some(ref path) = args.log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if args.is_batch_mode() {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
    Ok(())
}

/// Load the configured catalog, degrading every failure to a labeled state
async fn load_catalog(config: &Config) -> CatalogState {
    let Some(source) = config.catalog_source() else {
        return CatalogState::Empty;
    };
    let result = match CatalogLoader::new(source, config.timeout) {
        Ok(loader) => loader.load().await,
        Err(e) => Err(e),
    };
    CatalogState::from_load(result)
}

/// One submit, printed in the requested format
async fn run_batch_mode(args: &Args, config: &Config, controller: SessionController) -> Result<()> {
    let mut selections = Vec::new();
    if !args.select.is_empty() {
        let catalog = load_catalog(config).await;
        if let CatalogState::Unavailable(ref reason) = catalog {
            anyhow::bail!("{}: {}", CatalogState::UNAVAILABLE_LABEL, reason);
        }
        for wanted in &args.select {
            let index = catalog
                .position(wanted)
                .with_context(|| format!("Not in catalog: {}", wanted))?;
            selections.push(catalog.entries()[index].address.clone());
        }
    }

    let source = args.source.clone().unwrap_or_default();
    let manual = destinations::to_editable_text(&args.destinations);
    let outcome = controller.submit(&source, &manual, &selections).await;

    let state = controller.state().read().clone();
    let stdout = std::io::stdout();
    if args.json {
        export_json(&state, stdout.lock())?;
    } else if args.csv {
        if let Some(csv) = controller.export_csv() {
            print!("{}", csv);
        }
    } else {
        generate_report(&state, stdout.lock())?;
    }

    std::io::Write::flush(&mut std::io::stdout())?;

    if args.export_dir.is_some() && state.is_exportable() {
        let path = controller.export_to_file()?;
        eprintln!("Exported to {}", path.display());
    }

    match outcome {
        SubmitOutcome::Displayed => Ok(()),
        SubmitOutcome::Rejected(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        SubmitOutcome::Failed(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        SubmitOutcome::Superseded => anyhow::bail!("Test run was superseded"),
    }
}

async fn run_interactive_mode(
    args: &Args,
    config: &Config,
    controller: SessionController,
) -> Result<()> {
    // Catalog loads in the background; the form is usable immediately
    let catalog: SharedCatalog = Arc::new(RwLock::new(CatalogState::Loading));
    let slot = catalog.clone();
    let catalog_config = config.clone();
    tokio::spawn(async move {
        let loaded = load_catalog(&catalog_config).await;
        *slot.write() = loaded;
    });

    // Cancellation token for graceful shutdown
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        cancel_clone.cancel();
    });

    let saved = Prefs::load();
    let ui_state = UiState {
        source: args
            .source
            .clone()
            .or_else(|| saved.last_source.clone())
            .unwrap_or_default(),
        destinations_text: destinations::to_editable_text(&args.destinations),
        preselect: args.select.clone(),
        theme_index: Theme::index_of(&config.theme),
        ..Default::default()
    };

    let outcome = run_tui(controller, catalog, ui_state, cancel).await?;

    // Save preferences (best effort, don't fail on save error)
    let mut prefs = Prefs::load();
    prefs.theme = Some(outcome.theme);
    if !outcome.source.is_empty() {
        prefs.last_source = Some(outcome.source);
    }
    if let Some(ref url) = args.backend {
        prefs.backend_url = Some(url.clone());
    }
    if let Err(e) = prefs.save() {
        warn!(error = %e, "failed to save preferences");
    }

    Ok(())
}
