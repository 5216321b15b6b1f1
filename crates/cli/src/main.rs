use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use raceway::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

use provenance::{write_sidecar, Provenance};

#[derive(Parser)]
#[command(name = "raceway-cli")]
#[command(about = "Generate race tracks and solve minimum-move laps")]
struct Cmd {
    /// Log stage details (DEBUG level)
    #[arg(long, global = true)]
    verbose: bool,

    /// JSON file with a full or partial track configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Write the track layout (skeleton, walls, gate, ring lattice) as JSON
    Generate {
        #[command(flatten)]
        track: TrackArgs,
        #[arg(long)]
        out: PathBuf,
    },
    /// Generate a track and write layout plus the minimum-move lap as JSON
    Solve {
        #[command(flatten)]
        track: TrackArgs,
        #[arg(long)]
        out: PathBuf,
        /// Try this many consecutive seeds before giving up
        #[arg(long, default_value_t = 1)]
        attempts: u64,
        #[arg(long)]
        max_states: Option<usize>,
    },
    /// Print version and the effective configuration
    Report {
        #[command(flatten)]
        track: TrackArgs,
    },
}

/// Overrides applied on top of the config file (or the defaults).
#[derive(Args, Default)]
struct TrackArgs {
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    width: Option<f64>,
    #[arg(long)]
    height: Option<f64>,
    /// Minimum-separation radius of the skeleton points
    #[arg(long)]
    radius: Option<f64>,
    /// Lattice spacing
    #[arg(long)]
    spacing: Option<f64>,
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    SumSquared,
    SumLinear,
    MaxMin,
    NearestFirst,
}

impl From<ModeArg> for SpreadMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::SumSquared => SpreadMode::SumSquared,
            ModeArg::SumLinear => SpreadMode::SumLinear,
            ModeArg::MaxMin => SpreadMode::MaxMinSquared,
            ModeArg::NearestFirst => SpreadMode::NearestFirst,
        }
    }
}

impl TrackArgs {
    fn apply(&self, mut cfg: TrackCfg) -> TrackCfg {
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        if let Some(w) = self.width {
            cfg.width = w;
        }
        if let Some(h) = self.height {
            cfg.height = h;
        }
        if let Some(r) = self.radius {
            cfg.skeleton.radius = r;
        }
        if let Some(g) = self.spacing {
            cfg.boundary.spacing = g;
        }
        if let Some(m) = self.mode {
            cfg.skeleton.mode = m.into();
        }
        cfg
    }
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum SolveReport<'a> {
    Solved {
        seed: u64,
        moves: usize,
        layout: TrackLayout,
        solution: &'a Solution,
    },
    NoSolution {
        seed: u64,
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        layout: Option<TrackLayout>,
    },
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    let base = load_config(cmd.config.as_deref())?;
    match cmd.action {
        Action::Generate { track, out } => generate(&track.apply(base), &out),
        Action::Solve {
            track,
            out,
            attempts,
            max_states,
        } => {
            let mut search = SearchCfg::default();
            if let Some(n) = max_states {
                search.max_states = n;
            }
            solve(&track.apply(base), &out, attempts, &search)
        }
        Action::Report { track } => report(&track.apply(base)),
    }
}

fn load_config(path: Option<&Path>) -> Result<TrackCfg> {
    let Some(path) = path else {
        return Ok(TrackCfg::default());
    };
    let bytes = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing config {}", path.display()))
}

fn write_json<T: Serialize>(out: &Path, value: &T) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(out, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", out.display()))
}

fn generate(cfg: &TrackCfg, out: &Path) -> Result<()> {
    tracing::info!(seed = cfg.seed, out = %out.display(), "generate");
    let track = Track::generate(cfg).with_context(|| format!("generating seed {}", cfg.seed))?;
    write_json(out, &track.layout())?;
    write_sidecar(out, Provenance::new("generate", cfg))?;
    tracing::info!(
        points = track.points.len(),
        walls = track.boundary.walls.len(),
        "layout written"
    );
    Ok(())
}

fn solve(cfg: &TrackCfg, out: &Path, attempts: u64, search: &SearchCfg) -> Result<()> {
    tracing::info!(seed = cfg.seed, attempts, out = %out.display(), "solve");
    let end = cfg.seed.saturating_add(attempts.max(1));
    let outcome = retry_seeds(cfg, cfg.seed..end, search).context("no seeds to try")?;
    match outcome {
        Ok(attempt) => {
            let used = cfg.with_seed(attempt.seed);
            let report = SolveReport::Solved {
                seed: attempt.seed,
                moves: attempt.solution.moves(),
                layout: attempt.track.layout(),
                solution: &attempt.solution,
            };
            write_json(out, &report)?;
            write_sidecar(out, Provenance::new("solve", &used))?;
            tracing::info!(seed = attempt.seed, moves = attempt.solution.moves(), "lap written");
            Ok(())
        }
        Err(err) => {
            let last_seed = end - 1;
            let used = cfg.with_seed(last_seed);
            // Keep the geometry when it was the solver that failed.
            let layout = match &err {
                TrackError::Solve(_) => Track::generate(&used).ok().map(|t| t.layout()),
                _ => None,
            };
            let report = SolveReport::NoSolution {
                seed: last_seed,
                reason: err.to_string(),
                layout,
            };
            write_json(out, &report)?;
            write_sidecar(out, Provenance::new("solve", &used))?;
            bail!("no solution: {err}")
        }
    }
}

fn report(cfg: &TrackCfg) -> Result<()> {
    let obj = serde_json::json!({
        "version": raceway::VERSION,
        "code_rev": provenance::current_git_rev(),
        "config": cfg,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
