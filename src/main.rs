mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, Layer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use couchapp::Settings;
use couchapp::generator::{self, GeneratorKind};
use couchapp::vendor::{
    self, FetchContext, FetchOptions, Fetcher, HandlerRegistry, VendorDir, VendorOptions,
};

use cli::{Cli, Commands, FetchArgs, VendorCommands};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("couchapp error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let _guard = init_logging(cli.verbose, &settings)?;

    tracing::debug!("couchapp starting");

    match cli.command {
        Commands::Vendor { command } => run_vendor(command, settings, cli.verbose),
        Commands::Generate {
            kind,
            name,
            app_dir,
            template,
        } => {
            let settings = settings.with_project(&app_dir)?;
            let kind: GeneratorKind = kind.parse()?;
            let templates_root = settings
                .templates_dir()
                .context("cannot determine the templates directory")?;

            let written = generator::generate(
                &app_dir,
                kind,
                &name,
                template.as_deref(),
                &templates_root,
            )?;
            for path in written {
                println!("{}", path.display());
            }
            Ok(())
        }
    }
}

fn run_vendor(command: VendorCommands, settings: Settings, verbose: u8) -> Result<()> {
    let context = |app_dir: &Path| FetchContext {
        verbose,
        app_dir: app_dir.to_path_buf(),
    };

    match command {
        VendorCommands::Install {
            uri,
            app_dir,
            fetch,
        } => {
            let settings = settings.with_project(&app_dir)?;
            let registry = HandlerRegistry::from_settings(&settings);
            let fetcher = Fetcher::new(&registry, context(&app_dir), settings.staging_root());

            let report = vendor::install(&fetcher, &app_dir, &uri, &vendor_options(fetch))?;
            for name in &report.installed {
                println!("installed {name}");
            }
            Ok(())
        }
        VendorCommands::Update {
            name,
            app_dir,
            fetch,
        } => {
            let settings = settings.with_project(&app_dir)?;
            let registry = HandlerRegistry::from_settings(&settings);
            let fetcher = Fetcher::new(&registry, context(&app_dir), settings.staging_root());

            let options = vendor_options(fetch);
            let report = vendor::update(&fetcher, &app_dir, name.as_deref(), &options)?;
            for name in &report.updated {
                println!("updated {name}");
            }
            for name in &report.installed {
                println!("installed {name}");
            }
            Ok(())
        }
        VendorCommands::List { app_dir } => {
            let entries = VendorDir::of_app(&app_dir).entries()?;
            if entries.is_empty() {
                println!("no vendors installed in {}", app_dir.display());
            }
            for entry in entries {
                let source = entry.fetch_uri.as_deref().unwrap_or("(no source)");
                println!("{:<24} {source}", entry.name);
            }
            Ok(())
        }
        VendorCommands::Handlers => {
            let registry = HandlerRegistry::from_settings(&settings);
            for info in registry.handlers() {
                println!("{} [{}]", info.name, info.schemes.join(", "));
                if !info.help.is_empty() {
                    println!("    {}", info.help);
                }
                if !info.copyright.is_empty() {
                    println!("    {}", info.copyright);
                }
            }
            Ok(())
        }
    }
}

fn vendor_options(fetch: FetchArgs) -> VendorOptions {
    VendorOptions {
        force: fetch.force,
        fetch: FetchOptions {
            args: fetch.args,
            opts: fetch.opts.into_iter().collect(),
        },
    }
}

/// Stderr always; a daily log file as well when `general.log_dir` is set.
fn init_logging(verbose: u8, settings: &Settings) -> Result<Option<WorkerGuard>> {
    let default_level = match verbose {
        0 => "couchapp=warn",
        1 => "couchapp=info",
        _ => "couchapp=debug",
    };
    let filter =
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let Some(log_dir) = settings.log_dir() else {
        tracing_subscriber::registry()
            .with(stderr.with_filter(filter()))
            .init();
        return Ok(None);
    };

    let (file, guard) = file_writer(&log_dir)?;
    tracing_subscriber::registry()
        .with(stderr.with_filter(filter()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_filter(filter()),
        )
        .init();

    Ok(Some(guard))
}

fn file_writer(log_dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "couchapp.log");
    Ok(tracing_appender::non_blocking(file_appender))
}
