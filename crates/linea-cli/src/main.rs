mod clips;
mod regression;
mod residuals;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use linea_anim::{FrameSink, JsonLinesSink, NullSink, Runner};
use linea_core::LineaConfig;
use linea_ir::validate::validate_script;

use crate::clips::Clip;

/// Looked up in the working directory when `--config` is not given.
const DEFAULT_CONFIG: &str = "linea.toml";

#[derive(Parser)]
#[command(
    name = "linea",
    version,
    about = "Linea: scripted animations for a linear regression lesson"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available clips
    List,

    /// Play a clip and hand every frame to a sink
    Render {
        /// Clip to play
        #[arg(value_enum)]
        clip: Clip,

        /// Override the configured frame rate
        #[arg(long)]
        fps: Option<f64>,

        /// Path to a linea.toml configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write resolved frames as JSON lines to this file
        #[arg(long)]
        frames: Option<PathBuf>,
    },

    /// Validate a clip's script without playing it
    Check {
        #[arg(value_enum)]
        clip: Clip,
    },

    /// Print the least-squares fit of one of the built-in datasets
    Fit {
        #[arg(long, value_enum, default_value = "study")]
        dataset: Dataset,

        /// Also predict y at this x
        #[arg(long)]
        predict: Option<f64>,
    },

    /// Write the default configuration to a file
    Config {
        #[arg(default_value = DEFAULT_CONFIG)]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Dataset {
    /// Days studying against exam grade
    Study,
    /// The scatter used in the OLS clip
    Ols,
}

impl Dataset {
    fn data(&self) -> (&'static [f64], &'static [f64]) {
        match self {
            Dataset::Study => (&clips::real_life::DAYS, &clips::real_life::GRADES),
            Dataset::Ols => (&clips::ols::XS, &clips::ols::YS),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::List => cmd_list(),
        Commands::Render {
            clip,
            fps,
            config,
            frames,
        } => cmd_render(clip, fps, config, frames),
        Commands::Check { clip } => cmd_check(clip),
        Commands::Fit { dataset, predict } => cmd_fit(dataset, predict),
        Commands::Config { output } => cmd_config(&output),
    }
}

/// Explicit path first, then `linea.toml` if present, then defaults.
fn load_config(path: Option<&Path>) -> Result<LineaConfig> {
    match path {
        Some(path) => LineaConfig::load_from_file(path)
            .with_context(|| format!("failed to load config: {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).exists() => {
            tracing::info!("using {} from the working directory", DEFAULT_CONFIG);
            LineaConfig::load_from_file(Path::new(DEFAULT_CONFIG))
                .with_context(|| format!("failed to load config: {}", DEFAULT_CONFIG))
        }
        None => Ok(LineaConfig::default()),
    }
}

fn cmd_list() -> Result<()> {
    for clip in Clip::ALL {
        println!("{:<14} {}", clip.name(), clip.description());
    }
    Ok(())
}

fn cmd_render(
    clip: Clip,
    fps: Option<f64>,
    config_path: Option<PathBuf>,
    frames: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(config_path.as_deref())?;
    if let Some(fps) = fps {
        config.render.fps = fps;
    }
    config.validate().context("invalid configuration")?;
    // Objects read style defaults while the script is built.
    linea_core::config::install(config.clone()).context("failed to install configuration")?;
    let runner = Runner::new(Arc::new(config))?;

    let script = clip
        .build()
        .with_context(|| format!("failed to build clip '{}'", clip.name()))?;
    println!(
        "Rendering {} ({} steps, {} at {} fps)",
        clip.name(),
        script.timeline.len(),
        script.timeline.total_duration(),
        runner.config().render.fps
    );

    let started = Instant::now();
    let report = match &frames {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut sink = JsonLinesSink::new(BufWriter::new(file));
            run_with(&runner, &script, &mut sink)?
        }
        None => run_with(&runner, &script, &mut NullSink::default())?,
    };

    println!("   frames:  {}", report.frames);
    println!("   seconds: {:.2}", report.seconds);
    println!("   steps:   {}", report.steps);
    println!("   hash:    {}", report.hash);
    if let Some(path) = frames {
        println!("   written: {}", path.display());
    }
    println!("   took:    {:.2?}", started.elapsed());
    Ok(())
}

fn run_with(
    runner: &Runner,
    script: &linea_ir::Script,
    sink: &mut dyn FrameSink,
) -> Result<linea_anim::RunReport> {
    runner
        .run(script, sink)
        .with_context(|| format!("run of '{}' failed", script.name))
}

fn cmd_check(clip: Clip) -> Result<()> {
    let script = clip.build()?;
    match validate_script(&script) {
        Ok(()) => {
            println!(
                "{}: OK ({} objects, {} trackers, {} bindings, {} steps)",
                clip.name(),
                script.declarations.len(),
                script.trackers.len(),
                script.bindings.len(),
                script.timeline.len()
            );
            Ok(())
        }
        Err(errors) => {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::bail!("{} is invalid:\n  {}", clip.name(), messages.join("\n  "));
        }
    }
}

fn cmd_fit(dataset: Dataset, predict: Option<f64>) -> Result<()> {
    let (xs, ys) = dataset.data();
    let terms = regression::ols_terms(xs, ys)?;
    let fit = regression::fit_line(xs, ys)?;
    println!("n          = {}", xs.len());
    println!("x mean     = {:.4}", terms.x_mean);
    println!("y mean     = {:.4}", terms.y_mean);
    println!("slope      = {:.4}", fit.slope);
    println!("intercept  = {:.4}", fit.intercept);
    println!("SSR        = {:.4}", regression::ssr(&fit, xs, ys));
    if let Some(r2) = regression::r_squared(&fit, xs, ys) {
        println!("R^2        = {:.4}", r2);
    }
    if let Some(x) = predict {
        println!("y({})     = {:.4}", x, fit.predict(x));
    }
    Ok(())
}

fn cmd_config(output: &Path) -> Result<()> {
    if output.exists() {
        anyhow::bail!("{} already exists", output.display());
    }
    LineaConfig::default()
        .save_to_file(output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("Wrote default configuration to {}", output.display());
    Ok(())
}
