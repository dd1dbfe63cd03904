use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use curvegen_core::{
    check_catalog, coefficient_rows, conversion_matrix, generate, generation_plan, regenerate,
    ArtifactKind, Dimension, GenConfig, SplineFamily,
};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let outcome = match cli.cmd {
        Command::Regenerate {
            config,
            out,
            runtime_path,
            sequential,
        } => run_regenerate(config, out, runtime_path, sequential),
        Command::Show {
            type_name,
            family,
            matrix,
            dim,
            config,
            runtime_path,
        } => run_show(type_name, family, matrix, dim, config, runtime_path),
        Command::Convert { from, to } => run_convert(&from, &to),
        Command::Check => run_check(),
    };
    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "curvegen",
    about = "Derives spline segment formulas with exact rationals and emits Rust types"
)]
struct Cli {
    /// Log every artifact as it is generated
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Regenerate the whole spline and matrix catalog
    Regenerate {
        /// TOML settings file; missing keys keep their defaults
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output root, overrides `output_root`
        #[arg(long)]
        out: Option<PathBuf>,

        /// Module path of the runtime support types, overrides `runtime_path`
        #[arg(long)]
        runtime_path: Option<String>,

        /// Generate on the current thread only
        #[arg(long, action = ArgAction::SetTrue)]
        sequential: bool,
    },

    /// Print one generated artifact to stdout
    Show {
        /// Generated type name, e.g. BezierCubic3D or Vector2Matrix4x1
        type_name: Option<String>,

        /// Spline family (bezier, bezier-quad, hermite, bspline, catrom)
        #[arg(long, conflicts_with_all = ["type_name", "matrix"], requires = "dim")]
        family: Option<String>,

        /// Column matrix row count (3 or 4)
        #[arg(long, conflicts_with = "type_name", requires = "dim")]
        matrix: Option<u8>,

        /// Point dimension, 1 to 4
        #[arg(long)]
        dim: Option<u8>,

        /// TOML settings file, as for `regenerate`
        #[arg(long)]
        config: Option<PathBuf>,

        /// Module path of the runtime support types, overrides `runtime_path`
        #[arg(long)]
        runtime_path: Option<String>,
    },

    /// Print the exact conversion between two families of the same degree
    Convert {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,
    },

    /// Catalog regression: exact inverses, numeric rank, conversion round-trips
    Check,
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = tracing_subscriber::fmt::Subscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

/// Settings file (or defaults) with the `--runtime-path` override applied.
fn load_settings(config: Option<PathBuf>, runtime_path: Option<String>) -> Result<GenConfig> {
    let mut cfg = GenConfig::load_or_default(config.as_deref())
        .context("loading generation settings")?;
    if let Some(path) = runtime_path {
        cfg.runtime_path = path;
    }
    Ok(cfg)
}

fn run_regenerate(
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    runtime_path: Option<String>,
    sequential: bool,
) -> Result<ExitCode> {
    let mut cfg = load_settings(config, runtime_path)?;
    if let Some(out) = out {
        cfg.output_root = out;
    }
    if sequential {
        cfg.parallel = false;
    }
    let counts = regenerate(&cfg)
        .with_context(|| format!("regenerating into {}", cfg.output_root.display()))?;
    println!(
        "Generated {} spline types and {} matrix types ({} files) under {}",
        counts.splines,
        counts.matrices,
        counts.files,
        cfg.output_root.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn parse_dim(dim: Option<u8>) -> Result<Dimension> {
    let d = dim.context("--dim is required")?;
    Ok(Dimension::new(d)?)
}

fn run_show(
    type_name: Option<String>,
    family: Option<String>,
    matrix: Option<u8>,
    dim: Option<u8>,
    config: Option<PathBuf>,
    runtime_path: Option<String>,
) -> Result<ExitCode> {
    let cfg = load_settings(config, runtime_path)?;
    let kind = match (type_name, family, matrix) {
        (Some(name), _, _) => generation_plan()
            .into_iter()
            .find(|k| k.type_name() == name)
            .with_context(|| format!("no generated type is named {}", name))?,
        (None, Some(family), _) => {
            let family: SplineFamily = family.parse()?;
            ArtifactKind::Spline(family, parse_dim(dim)?)
        }
        (None, None, Some(count)) => ArtifactKind::Matrix(count, parse_dim(dim)?),
        (None, None, None) => bail!("give a type name, or --family/--matrix with --dim"),
    };
    let artifact = generate(kind, &cfg)
        .with_context(|| format!("generating {}", kind.type_name()))?;
    print!("{}", artifact.contents());
    Ok(ExitCode::SUCCESS)
}

fn run_convert(from: &str, to: &str) -> Result<ExitCode> {
    let source: SplineFamily = from.parse()?;
    let target: SplineFamily = to.parse()?;
    let m = conversion_matrix(source, target)
        .with_context(|| format!("converting {} to {}", source, target))?;
    println!("{} -> {} (target points from source points):", source, target);
    println!("{}", m);
    let source_points: Vec<&str> = source.descriptor().control_point_names().collect();
    let rows = coefficient_rows(&m, &source_points)?;
    for (name, row) in target.descriptor().control_point_names().zip(&rows) {
        println!("  {} = {}", name, row);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_check() -> Result<ExitCode> {
    let outcomes = check_catalog().context("deriving catalog")?;
    for o in &outcomes {
        println!(
            "[Regression] {} expected={}  => observed={}{}",
            o.name,
            o.expected,
            o.observed,
            if o.is_ok() { "  (OK)" } else { "  (MISMATCH)" }
        );
    }
    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    println!("\n{} checks, {} mismatches", outcomes.len(), failed);
    if failed == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_accepts_settings_flags() {
        let cli = Cli::try_parse_from([
            "curvegen",
            "show",
            "HermiteCubic2D",
            "--runtime-path",
            "mathfs",
        ])
        .unwrap();
        match cli.cmd {
            Command::Show {
                type_name,
                runtime_path,
                config,
                ..
            } => {
                assert_eq!(type_name.as_deref(), Some("HermiteCubic2D"));
                assert_eq!(runtime_path.as_deref(), Some("mathfs"));
                assert!(config.is_none());
            }
            other => panic!("parsed as {:?}", other),
        }
    }

    #[test]
    fn test_runtime_path_override_reaches_generation() {
        let cfg = load_settings(None, Some("mathfs".to_string())).unwrap();
        assert_eq!(cfg.runtime_path, "mathfs");
        let dim = Dimension::new(2).unwrap();
        let artifact = generate(ArtifactKind::Spline(SplineFamily::HermiteCubic, dim), &cfg).unwrap();
        assert!(artifact.contents().contains("use mathfs::numerics::Vector2Matrix4x1;"));
    }

    #[test]
    fn test_settings_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curvegen.toml");
        std::fs::write(&path, "runtime_path = \"engine::curves\"\nindent = \"\\t\"\n").unwrap();
        let cfg = load_settings(Some(path.clone()), None).unwrap();
        assert_eq!(cfg.runtime_path, "engine::curves");
        assert_eq!(cfg.indent, "\t");
        // The flag wins over the file.
        let cfg = load_settings(Some(path), Some("crate".to_string())).unwrap();
        assert_eq!(cfg.runtime_path, "crate");
    }
}
