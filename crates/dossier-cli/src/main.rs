//! Dossier: probe orchestration and reporting from the command line.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod cli;

use anyhow::Context as _;
use clap::Parser;
use cli::Cli;
use dossier_core::AppConfig;
use dossier_probes::builtin::default_registry;
use dossier_probes::Orchestrator;
use dossier_report::{FormatSelection, ReportWriter};
use std::process::ExitCode;
use tracing::info;

/// Initialize tracing subscriber for logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose {
        "info,dossier=debug"
    } else {
        "warn,dossier=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    info!("Starting Dossier v{}", env!("CARGO_PKG_VERSION"));

    if cli.init_config {
        let config = AppConfig::default();
        config.save().context("failed to write configuration")?;
        println!("[+] Wrote {}", AppConfig::config_path()?.display());
        return Ok(());
    }

    let mut config =
        AppConfig::load_with_env(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(dir) = &cli.output_dir {
        config.general.output_dir.clone_from(dir);
    }

    let registry = default_registry(&config).context("failed to set up probes")?;
    if cli.list_modules {
        for name in registry.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let ctx = cli.context(&config);
    cli.validate(&ctx)?;

    let orchestrator = Orchestrator::new(registry);
    let selected = cli.selected_modules();
    println!("[*] Running modules: {}", orchestrator.plan(&selected).join(", "));
    let report = orchestrator.run_all(&ctx, &selected).await;

    println!("[*] Saving report...");
    let writer = ReportWriter::new(&config.general.output_dir, config.report.pdf_timeout());
    let formats = FormatSelection {
        html: cli.html,
        pdf: cli.pdf,
    };
    let saved = writer
        .save(&report, cli.out.as_deref(), &formats)
        .await
        .context("failed to save report")?;

    println!("[+] Saved: {}", serde_json::to_string(&saved)?);
    if saved.json.is_none() {
        anyhow::bail!(
            "JSON report was not written: {}",
            saved.json_error.as_deref().unwrap_or("unknown error")
        );
    }
    println!(
        "[+] Available modules: {}",
        orchestrator.registry().names().join(", ")
    );
    println!("[!] Reminder: use this only with permission and within each site's terms of service");
    Ok(())
}
