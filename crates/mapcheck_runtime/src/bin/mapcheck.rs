//! mapcheck CLI entry point.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mapcheck_foundation::Result;
use mapcheck_runtime::{
    Loader, ScanOptions, Session, SessionPaths, Settings, TextOptions, locate, settings,
    write_json, write_report_file, write_text,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Checks maps, archetypes, artifacts and regions for common errors.
#[derive(Parser, Debug)]
#[command(name = "mapcheck", version, about, long_about = None)]
struct Cli {
    /// Maps directory to scan.
    #[arg(short, long, default_value = "../../maps")]
    directory: PathBuf,

    /// Check only this map.
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// Directory holding the `archetypes` and `artifacts` files.
    #[arg(short, long, default_value = "../../arch")]
    arch: PathBuf,

    /// Regions file. Defaults to `regions.reg` inside the maps directory.
    #[arg(short, long)]
    regions: Option<PathBuf>,

    /// Do not descend into subdirectories.
    #[arg(long)]
    non_rec: bool,

    /// Plain output without colors, one `x y SEVERITY message` per line.
    #[arg(long, conflicts_with = "json")]
    text_only: bool,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    /// Also write results to this file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Settings file. Defaults to `config.cfg` when it exists.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log debug details to stderr.
    #[arg(short, long)]
    verbose: bool,

    /// Print the `.arc` or `.art` file defining NAME and exit.
    #[arg(long, value_name = "NAME")]
    locate: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("mapcheck=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mapcheck=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load(cli: &Cli) -> Result<Settings> {
    match &cli.config {
        Some(path) => Loader::new().with_file(path).build(),
        None => Loader::new()
            .with_optional_file(settings::USER_CONFIG_FILE)
            .build(),
    }
}

fn run(cli: &Cli) -> Result<()> {
    if let Some(name) = &cli.locate {
        match locate(&cli.arch, name) {
            Some((_, path)) => println!("{}", path.display()),
            None => println!("'{name}' is not defined under {}", cli.arch.display()),
        }
        return Ok(());
    }

    let settings = load(cli)?;
    let filter = settings.severity_filter();
    let options = ScanOptions {
        recursive: !cli.non_rec,
        ignore_events: settings.ignore.ignore_events,
    };

    let mut paths = SessionPaths::new(&cli.directory, &cli.arch);
    if let Some(regions) = &cli.regions {
        paths = paths.with_regions(regions);
    }

    let mut session = Session::open(paths, settings.rule_config(), options)?;
    match &cli.map {
        Some(map) => {
            if !session.check_file(map)? {
                info!(path = %map.display(), "not a map file");
            }
        }
        None => {
            session.scan();
        }
    }

    let diagnostics = session.diagnostics();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        write_json(&mut out, diagnostics, &filter)?;
        writeln!(out).map_err(|err| stdout_error(&err))?;
    } else {
        let text = TextOptions {
            text_only: cli.text_only,
            single_map: cli.map.is_some(),
        };
        write_text(&mut out, diagnostics, &filter, text).map_err(|err| stdout_error(&err))?;
    }

    if let Some(path) = &cli.output {
        write_report_file(path, diagnostics, &filter)?;
        info!(path = %path.display(), "wrote report");
    }
    Ok(())
}

fn stdout_error(err: &io::Error) -> mapcheck_foundation::Error {
    mapcheck_foundation::Error::io(std::path::Path::new("<stdout>"), err)
}
