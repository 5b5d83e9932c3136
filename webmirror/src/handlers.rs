use clap::ArgMatches;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use webmirror_core::crawl::{MirrorOptions, execute_mirror};
use webmirror_core::report::{MirrorReport, ReportFormat, render_report, write_report};
use webmirror_scanner::CrawlTarget;

pub const DEFAULT_MIRROR_DIR: &str = "./data";

/// Everything the mirror command needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct MirrorSettings {
    pub options: MirrorOptions,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
    pub quiet: bool,
    /// True when `--dir` was not given.
    pub default_dir: bool,
}

/// clap value parser for `--url`: must look like `http(s)://host/...`
pub fn validate_seed_url(value: &str) -> Result<String, String> {
    let value = value.trim();
    if !value.starts_with("http") {
        return Err("invalid url provided. valid ex.: https://github.com".to_string());
    }

    CrawlTarget::from_seed(value).map_err(|e| e.to_string())?;

    Ok(value.to_string())
}

/// Expand `~` in the mirror directory, falling back to the default.
pub fn resolve_mirror_dir(dir: Option<&String>) -> (PathBuf, bool) {
    match dir {
        Some(dir) => {
            let expanded = shellexpand::tilde(dir);
            (PathBuf::from(expanded.as_ref()), false)
        }
        None => (PathBuf::from(DEFAULT_MIRROR_DIR), true),
    }
}

pub fn settings_from_matches(matches: &ArgMatches) -> Result<MirrorSettings, String> {
    let url = matches
        .get_one::<String>("url")
        .ok_or_else(|| "url flag is required".to_string())?;

    let (dir, default_dir) = resolve_mirror_dir(matches.get_one::<String>("dir"));

    let format_name = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let format = ReportFormat::from_str(format_name)
        .ok_or_else(|| format!("Unknown report format '{}'", format_name))?;

    let quiet = matches.get_flag("quiet");

    let options = MirrorOptions {
        url: url.clone(),
        dir,
        max_concurrency: matches.get_one::<usize>("max-concurrency").copied(),
        timeout: matches
            .get_one::<u64>("timeout")
            .map(|secs| Duration::from_secs(*secs)),
        show_progress_bars: !quiet,
    };

    Ok(MirrorSettings {
        options,
        format,
        output: matches.get_one::<PathBuf>("output").cloned(),
        quiet,
        default_dir,
    })
}

/// Log level for `-v` repetitions; `--quiet` only lets errors through.
pub fn verbosity_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

pub fn init_tracing(verbose: u8, quiet: bool) {
    tracing_subscriber::fmt()
        .with_max_level(verbosity_level(verbose, quiet))
        .with_writer(std::io::stderr)
        .init();
}

/// Stop immediately on Ctrl-C. In-flight downloads are abandoned.
pub fn listen_for_interrupt() {
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n{}", "stopping...".yellow().bold());
            std::process::exit(1);
        }
    });
}

/// Run the mirror command; returns the process exit code.
pub async fn handle_mirror(matches: &ArgMatches) -> i32 {
    let settings = match settings_from_matches(matches) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return 1;
        }
    };

    run_mirror(settings).await
}

pub async fn run_mirror(settings: MirrorSettings) -> i32 {
    let MirrorSettings {
        options,
        format,
        output,
        quiet,
        default_dir,
    } = settings;

    let seed = options.url.clone();
    let mirror_root = options.dir.clone();

    if !quiet {
        if default_dir {
            println!(
                "{} dir flag is empty. using default {}",
                "ℹ".blue(),
                DEFAULT_MIRROR_DIR.bright_white()
            );
        }
        println!("\n🕸️  Mirroring {}", seed.bright_white());
        println!("Into: {}", mirror_root.display());
        match options.max_concurrency {
            Some(limit) => println!("Concurrency: {} pages at a time", limit),
            None => println!("Concurrency: unbounded"),
        }
        println!();
    }

    let progress_callback = Arc::new(|msg: String| {
        eprintln!("{}", msg.yellow());
    });

    let outcome = match execute_mirror(options, Some(progress_callback)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{} Mirror failed: {:#}", "✗".red().bold(), e);
            return 1;
        }
    };

    let report = MirrorReport::new(seed, &mirror_root, outcome);
    let rendered = match render_report(&report, format) {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            return 1;
        }
    };

    if let Some(path) = output {
        if let Err(e) = write_report(&rendered, &path) {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            return 1;
        }
        if !quiet {
            println!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
    } else if !quiet {
        print!("{}", rendered);
        if format == ReportFormat::Json {
            println!();
        }
    }

    if !quiet {
        println!("{} done!", "✓".green().bold());
    }

    0
}
