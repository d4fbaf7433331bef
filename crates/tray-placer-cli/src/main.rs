use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::{info, warn};
use tray_placer_core::config::{PlacerConfig, SelectionMode, TraySpec};
use tray_placer_core::{place_trays, to_ascii, to_json, RngSource};

#[derive(Parser, Debug)]
#[command(
    name = "tray-placer",
    about = "Place polyomino trays on a grid with bounded random retries",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one placement session and export the layout
    Place(PlaceArgs),
    /// Run many seeded sessions and report how often every tray was placed
    Bench(BenchArgs),
}

/// Session options shared by all commands. Flags override values from --config.
#[derive(Args, Debug, Clone)]
struct SessionArgs {
    /// JSON or YAML config file (by extension)
    #[arg(long, help_heading = "Input")]
    config: Option<PathBuf>,
    /// Board width in cells
    #[arg(long, help_heading = "Board")]
    width: Option<u32>,
    /// Board height in cells
    #[arg(long, help_heading = "Board")]
    height: Option<u32>,
    /// Tray descriptor WxH or WxH:rows (e.g. 3x2:111/100); repeat for each tray.
    /// Replaces the trays from --config when given.
    #[arg(long = "tray", help_heading = "Trays")]
    trays: Vec<String>,
    /// Selection: in_order | random_draw
    #[arg(long, help_heading = "Trays")]
    selection: Option<String>,
    /// Slots to fill in random_draw mode (defaults to the number of trays)
    #[arg(long, help_heading = "Trays")]
    draw_count: Option<usize>,
    /// Random origins tried per tray
    #[arg(long, help_heading = "Placement")]
    max_attempts: Option<u32>,
}

#[derive(Args, Debug, Clone)]
struct PlaceArgs {
    #[command(flatten)]
    session: SessionArgs,
    /// Seed for a reproducible session
    #[arg(long, help_heading = "Placement")]
    seed: Option<u64>,
    /// Write the JSON layout to this file (stdout when neither --out nor --ascii is set)
    #[arg(short, long, help_heading = "Export")]
    out: Option<PathBuf>,
    /// Print the board as text
    #[arg(long, default_value_t = false, help_heading = "Export")]
    ascii: bool,
    /// Fail with a non-zero exit code if any tray could not be placed
    #[arg(long, default_value_t = false, help_heading = "Export")]
    require_all: bool,
    /// Print the merged configuration (after file/flags) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
}

#[derive(Args, Debug, Clone)]
struct BenchArgs {
    #[command(flatten)]
    session: SessionArgs,
    /// Number of sessions
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    runs: u32,
    /// Seed of the first session; run i uses start_seed + i
    #[arg(long, default_value_t = 0)]
    start_seed: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Place(args) => run_place(args),
        Commands::Bench(b) => run_bench(b),
    }
}

fn run_place(args: &PlaceArgs) -> anyhow::Result<()> {
    let mut cfg = build_config(&args.session)?;
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }

    if args.print_config {
        match args.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let mut rng = match cfg.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };
    let start = Instant::now();
    let report = place_trays(&cfg, &mut rng).context("placement session")?;
    let stats = report.stats();
    info!(elapsed = %fmt_dur(start.elapsed()), "{}", stats.summary());

    if let Some(out) = &args.out {
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&to_json(&report))?;
        fs::write(out, json).with_context(|| format!("write {}", out.display()))?;
        info!(path = ?out, "layout written");
    }
    if args.ascii {
        print!("{}", to_ascii(&report));
    }
    if args.out.is_none() && !args.ascii {
        println!("{}", serde_json::to_string_pretty(&to_json(&report))?);
    }

    if args.require_all && !report.all_placed() {
        anyhow::bail!(
            "{} of {} trays could not be placed",
            stats.num_failed,
            stats.num_trays
        );
    }
    Ok(())
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    let cfg = build_config(&b.session)?;
    cfg.validate()?;

    let mut full = 0u64;
    let mut occupancy = 0.0f64;
    let mut trays_placed = 0u64;
    let mut trays_total = 0u64;
    let start = Instant::now();
    for i in 0..b.runs {
        let seed = b.start_seed.wrapping_add(u64::from(i));
        let report = place_trays(&cfg, &mut RngSource::seeded(seed))?;
        let s = report.stats();
        if report.all_placed() {
            full += 1;
        }
        occupancy += s.occupancy;
        trays_placed += s.num_placed as u64;
        trays_total += s.num_trays as u64;
    }
    let dur = start.elapsed();
    let runs = f64::from(b.runs);
    println!(
        "runs={} all_placed={:.2}% trays_placed={:.2}% occupancy={:.2}% time={} per_run={}",
        b.runs,
        full as f64 / runs * 100.0,
        if trays_total > 0 {
            trays_placed as f64 / trays_total as f64 * 100.0
        } else {
            0.0
        },
        occupancy / runs * 100.0,
        fmt_dur(dur),
        fmt_dur(dur / b.runs),
    );
    Ok(())
}

/// Loads --config (if any) and applies explicit flags on top.
fn build_config(args: &SessionArgs) -> anyhow::Result<PlacerConfig> {
    let mut cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => PlacerConfig::default(),
    };
    if let Some(v) = args.width {
        cfg.board_width = v;
    }
    if let Some(v) = args.height {
        cfg.board_height = v;
    }
    if let Some(v) = args.max_attempts {
        cfg.max_attempts = v;
    }
    if let Some(v) = &args.selection {
        cfg.selection = v
            .parse::<SelectionMode>()
            .map_err(|_| anyhow::anyhow!("unknown selection mode: {}", v))?;
    }
    if args.draw_count.is_some() {
        cfg.draw_count = args.draw_count;
    }
    if !args.trays.is_empty() {
        cfg.trays = args
            .trays
            .iter()
            .map(|s| {
                s.parse::<TraySpec>()
                    .with_context(|| format!("parse --tray {}", s))
            })
            .collect::<anyhow::Result<_>>()?;
    }
    if cfg.trays.is_empty() {
        warn!("no trays configured; pass --tray or a --config with trays");
    }
    Ok(cfg)
}

fn load_config(path: &Path) -> anyhow::Result<PlacerConfig> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);
    let cfg: PlacerConfig = if is_yaml {
        serde_yaml::from_str(&text).with_context(|| format!("parse yaml {}", path.display()))?
    } else {
        serde_json::from_str(&text).with_context(|| format!("parse json {}", path.display()))?
    };
    Ok(cfg)
}

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
