use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Binaries shipped by `dist`.
const DIST_BINARIES: [&str; 2] = ["haunted-desktop", "haunted-cli"];

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for the haunted house")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build release binaries into an emptied dist/ directory
    Dist,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            cargo("fmt --check", &["fmt", "--all", "--", "--check"])?;
            run_clippy()?;
            cargo("test", &["test", "--workspace"])?;
            cargo("doc", &["doc", "--workspace", "--no-deps"])?;
        }
        Commands::Fmt => cargo("fmt --check", &["fmt", "--all", "--", "--check"])?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => cargo("test", &["test", "--workspace"])?,
        Commands::Doc => cargo("doc", &["doc", "--workspace", "--no-deps"])?,
        Commands::Dist => run_dist()?,
    }

    Ok(())
}

fn cargo(what: &str, args: &[&str]) -> Result<()> {
    println!("==> Running cargo {what}");
    let status = Command::new("cargo")
        .args(args)
        .current_dir(workspace_root())
        .status()
        .context("spawning cargo")?;
    if !status.success() {
        bail!("cargo {what} failed");
    }
    Ok(())
}

fn run_clippy() -> Result<()> {
    cargo(
        "clippy",
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
    )
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Remove everything inside `dir`, creating it if missing.
fn empty_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).with_context(|| format!("clearing {}", dir.display()))?;
    }
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    Ok(())
}

fn run_dist() -> Result<()> {
    let root = workspace_root();
    let dist = root.join("dist");
    empty_dir(&dist)?;

    let mut args = vec!["build", "--release"];
    for bin in DIST_BINARIES {
        args.extend(["-p", bin]);
    }
    cargo("build --release", &args)?;

    let release = root.join("target").join("release");
    for bin in DIST_BINARIES {
        let name = format!("{bin}{}", std::env::consts::EXE_SUFFIX);
        let from = release.join(&name);
        fs::copy(&from, dist.join(&name))
            .with_context(|| format!("copying {}", from.display()))?;
        println!("    {name}");
    }
    println!("==> dist ready at {}", dist.display());
    Ok(())
}
