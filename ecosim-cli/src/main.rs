use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ecosim_core::Simulation;
use ecosim_types::{
    world_config_from_toml_str, CellTag, RunOutcome, TagGrid, TickReport, WorldConfig,
    WorldSnapshot,
};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "ecosim-cli")]
#[command(about = "Predator-prey grid simulation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Run {
        #[arg(long)]
        config: Option<PathBuf>,
        /// Tick cap for this invocation; omitted means run to termination.
        #[arg(long)]
        ticks: Option<u32>,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print the grid after every tick.
        #[arg(long, default_value_t = false)]
        watch: bool,
        #[arg(long, default_value_t = 100)]
        delay_ms: u64,
    },
    Step {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 1)]
        ticks: u32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = false)]
        print_state: bool,
    },
    Export {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 50)]
        ticks: u32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, value_enum, default_value_t = ExportFormat::Jsonl)]
        format: ExportFormat,
        #[arg(long)]
        out: PathBuf,
    },
    Replay {
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Jsonl,
    Json,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    ticks_run: u64,
    prey: u32,
    predators: u32,
    outcome: Option<RunOutcome>,
    total_meals: u64,
    total_starvations: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            ticks,
            seed,
            format,
            out,
            watch,
            delay_ms,
        } => run_command(config, ticks, seed, format, out, watch, delay_ms),
        Commands::Step {
            config,
            ticks,
            seed,
            print_state,
        } => step_command(config, ticks, seed, print_state),
        Commands::Export {
            config,
            ticks,
            seed,
            format,
            out,
        } => export_command(config, ticks, seed, format, out),
        Commands::Replay { input } => replay_command(input),
    }
}

fn run_command(
    config_path: Option<PathBuf>,
    ticks: Option<u32>,
    seed: u64,
    format: OutputFormat,
    out: Option<PathBuf>,
    watch: bool,
    delay_ms: u64,
) -> Result<()> {
    let cfg = load_config(config_path)?;
    let mut sim = Simulation::new(cfg, seed)?;

    if watch {
        watch_loop(&mut sim, ticks, delay_ms)?;
    } else {
        match ticks {
            Some(count) => {
                sim.step_n(count);
            }
            None => {
                sim.run_to_end();
            }
        }
    }

    let summary = summarize(&sim, seed);
    match format {
        OutputFormat::Pretty => {
            let text = format!(
                "seed={} ticks={} prey={} predators={} outcome={} meals={} starvations={}",
                summary.seed,
                summary.ticks_run,
                summary.prey,
                summary.predators,
                outcome_label(summary.outcome),
                summary.total_meals,
                summary.total_starvations,
            );
            write_output(text, out)?;
        }
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(&summary)?;
            write_output(text, out)?;
        }
    }
    Ok(())
}

fn watch_loop(sim: &mut Simulation, ticks: Option<u32>, delay_ms: u64) -> Result<()> {
    let mut ran = 0u32;
    loop {
        if ticks.is_some_and(|cap| ran >= cap) {
            break;
        }
        let Ok(report) = sim.tick() else {
            break;
        };
        ran += 1;

        let snapshot = sim.snapshot();
        println!("{}", render_tags(&snapshot.tags));
        println!("{}", describe_tick(&report));
        if report.outcome.is_some() {
            break;
        }
        thread::sleep(Duration::from_millis(delay_ms));
    }
    Ok(())
}

fn step_command(
    config_path: Option<PathBuf>,
    ticks: u32,
    seed: u64,
    print_state: bool,
) -> Result<()> {
    let cfg = load_config(config_path)?;
    let mut sim = Simulation::new(cfg, seed)?;
    let reports = sim.step_n(ticks.max(1));

    if let Some(last) = reports.last() {
        println!("{}", serde_json::to_string_pretty(last)?);
    }
    if print_state {
        println!("{}", serde_json::to_string_pretty(&sim.snapshot())?);
    }
    Ok(())
}

fn export_command(
    config_path: Option<PathBuf>,
    ticks: u32,
    seed: u64,
    format: ExportFormat,
    out: PathBuf,
) -> Result<()> {
    let cfg = load_config(config_path)?;
    let mut sim = Simulation::new(cfg, seed)?;
    let lines = sim.trace_jsonl(ticks);

    let payload = match format {
        ExportFormat::Jsonl => lines.join("\n"),
        ExportFormat::Json => {
            let snapshots: Vec<WorldSnapshot> = lines
                .iter()
                .map(|line| serde_json::from_str::<WorldSnapshot>(line))
                .collect::<std::result::Result<_, _>>()?;
            serde_json::to_string_pretty(&snapshots)?
        }
    };

    fs::write(&out, payload)
        .with_context(|| format!("failed writing export to {}", out.display()))?;
    println!("exported trace to {}", out.display());
    Ok(())
}

fn replay_command(input: PathBuf) -> Result<()> {
    let content = fs::read_to_string(&input)
        .with_context(|| format!("failed to read replay input {}", input.display()))?;

    let snapshots: Vec<WorldSnapshot> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(serde_json::from_str::<WorldSnapshot>)
        .collect::<std::result::Result<_, _>>()
        .context("replay input must be JSONL snapshots")?;

    let last = snapshots.last().context("replay input is empty")?;
    println!(
        "seed={} ticks={} prey={} predators={} outcome={}",
        last.rng_seed,
        last.tick,
        last.counts.prey,
        last.counts.predators,
        outcome_label(last.outcome),
    );
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<WorldConfig> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            world_config_from_toml_str(&raw)
                .with_context(|| format!("failed to parse config {}", path.display()))
        }
        None => Ok(WorldConfig::default()),
    }
}

fn summarize(sim: &Simulation, seed: u64) -> RunSummary {
    let counts = sim.world().counts();
    RunSummary {
        seed,
        ticks_run: sim.completed_ticks(),
        prey: counts.prey,
        predators: counts.predators,
        outcome: sim.outcome(),
        total_meals: sim.metrics().total_meals,
        total_starvations: sim.metrics().total_starvations,
    }
}

fn describe_tick(report: &TickReport) -> String {
    format!(
        "tick={} prey={} predators={} meals={} starvations={} outcome={}",
        report.tick,
        report.counts.prey,
        report.counts.predators,
        report.metrics.meals_last_tick,
        report.metrics.starvations_last_tick,
        outcome_label(report.outcome),
    )
}

fn render_tags(tags: &TagGrid) -> String {
    let size = tags.size as i32;
    let mut out = String::with_capacity((tags.size as usize + 1) * tags.size as usize);
    for y in 0..size {
        for x in 0..size {
            out.push(match tags.at(x, y) {
                CellTag::Empty => '.',
                CellTag::Prey => 'o',
                CellTag::Predator => 'X',
            });
        }
        out.push('\n');
    }
    out
}

fn outcome_label(outcome: Option<RunOutcome>) -> String {
    match outcome {
        None => "running".to_owned(),
        Some(RunOutcome::MaxTicksReached) => "max-ticks".to_owned(),
        Some(RunOutcome::Collapse { species }) => {
            format!("collapse-{}", format!("{species:?}").to_lowercase())
        }
    }
}

fn write_output(text: String, out: Option<PathBuf>) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(&path, text)
                .with_context(|| format!("failed writing output to {}", path.display()))?;
        }
        None => println!("{text}"),
    }
    Ok(())
}
