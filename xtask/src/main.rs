use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "wordsync workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Model-check the cell primitives under loom
    Loom {
        /// Upper bound on preemptions explored per execution
        #[arg(long)]
        preemption_bound: Option<usize>,
    },
    /// Run cell benchmarks and write a comparison report
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
}

/// Implementation every other one is measured against.
const BASELINE_IMPL: &str = "mutex";

/// Benchmark results keyed by (group, parameter), then implementation.
type Results = BTreeMap<(String, String), BTreeMap<String, f64>>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Loom { preemption_bound } => run_loom(preemption_bound)?,
        Commands::Bench { quick, report_only } => {
            if !report_only {
                run_benchmarks(quick)?;
            }
            generate_report()?;
        }
    }

    Ok(())
}

fn run_loom(preemption_bound: Option<usize>) -> Result<()> {
    println!("Running loom model checks...");
    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.args(["test", "--release", "--features", "loom", "--test", "loom_cell"]);
    if let Some(bound) = preemption_bound {
        cmd.env("LOOM_MAX_PREEMPTIONS", bound.to_string());
    }
    cmd.args(["--", "--test-threads=1"]);

    let status = cmd.status().context("Failed to run loom tests")?;
    if !status.success() {
        anyhow::bail!("loom found a failing interleaving");
    }

    println!("Loom checks passed in {:.2?}", start.elapsed());
    Ok(())
}

fn run_benchmarks(quick: bool) -> Result<()> {
    println!("Running cell benchmarks...");

    // Build first to avoid measuring build time
    println!("Compiling benchmarks...");
    let status = Command::new("cargo")
        .args(["build", "--bench", "cell_benchmark", "--release"])
        .status()?;
    if !status.success() {
        anyhow::bail!("Failed to compile benchmarks");
    }

    let start = Instant::now();
    let mut cmd = Command::new("cargo");
    cmd.env("CARGO_INCREMENTAL", "0")
        .args(["bench", "--bench", "cell_benchmark"]);

    // Args for the test runner (Criterion) go after --
    cmd.arg("--");
    if quick {
        cmd.arg("--measurement-time").arg("0.1");
        cmd.arg("--noplot");
        cmd.arg("--sample-size").arg("10");
    }

    let status = cmd.status().context("Failed to run cell benchmarks")?;
    if !status.success() {
        anyhow::bail!("Benchmarks failed");
    }
    println!("Finished in {:.2?}", start.elapsed());

    Ok(())
}

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");

    let criterion_dir = Path::new("target/criterion");
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    let mut results = Results::new();
    collect_results(criterion_dir, criterion_dir, &mut results);

    let report_path = Path::new("benchmark_results/report.md");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }

    use std::io::Write;
    let mut file = fs::File::create(report_path)?;

    writeln!(file, "# Cell Benchmark Report")?;
    writeln!(file)?;
    writeln!(file, "| Group | Threads | Implementation | Ops/s | vs {BASELINE_IMPL} |")?;
    writeln!(file, "|---|---|---|---|---|")?;

    for ((group, param), impls) in &results {
        let baseline = impls.get(BASELINE_IMPL).copied().unwrap_or(0.0);
        for (name, ops) in impls {
            let rel = if baseline > 0.0 {
                format!("**{:.2}x**", ops / baseline)
            } else {
                "-".to_string()
            };
            writeln!(file, "| {group} | {param} | {name} | {} | {rel} |", format_ops(*ops))?;
        }
    }

    println!("Report written to {}", report_path.display());
    Ok(())
}

fn format_ops(ops: f64) -> String {
    if ops > 1_000_000.0 {
        format!("{:.2}M", ops / 1_000_000.0)
    } else if ops > 1_000.0 {
        format!("{:.2}K", ops / 1_000.0)
    } else {
        format!("{ops:.0}")
    }
}

/// Walks criterion's output tree.
///
/// Layout: `<group>/<impl>[/<param>]/new/estimates.json`, with the sibling
/// `benchmark.json` carrying the declared throughput.
fn collect_results(root: &Path, dir: &Path, results: &mut Results) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_results(root, &path, results);
            continue;
        }
        if path.file_name().and_then(|s| s.to_str()) != Some("estimates.json") {
            continue;
        }
        let Some(run_dir) = path.parent() else { continue };
        if run_dir.file_name().and_then(|s| s.to_str()) != Some("new") {
            continue;
        }
        let Some(bench_dir) = run_dir.parent() else { continue };
        let Ok(relative) = bench_dir.strip_prefix(root) else { continue };

        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| c.as_os_str().to_str().map(str::to_owned))
            .collect();
        if parts.iter().any(|p| p == "report") {
            continue;
        }
        let (group, name, param) = match parts.as_slice() {
            [group, name] => (group.clone(), name.clone(), "-".to_string()),
            [group, name, param] => (group.clone(), name.clone(), param.clone()),
            _ => continue,
        };

        // Get throughput from benchmark.json
        let mut elements = 1.0;
        if let Ok(content) = fs::read_to_string(run_dir.join("benchmark.json")) {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&content) {
                if let Some(t) = json.get("throughput").and_then(|t| t.get("Elements")) {
                    elements = t.as_f64().unwrap_or(1.0);
                }
            }
        }

        // Get time
        let Ok(content) = fs::read_to_string(&path) else { continue };
        let Ok(json) = serde_json::from_str::<serde_json::Value>(&content) else { continue };
        let time_ns = json
            .get("mean")
            .and_then(|m| m.get("point_estimate"))
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(0.0);
        if time_ns > 0.0 {
            results
                .entry((group, param))
                .or_default()
                .insert(name, (elements * 1e9) / time_ns);
        }
    }
}
