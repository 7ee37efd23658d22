//! Build automation for kube-workspace
//!
//! Usage: cargo xtask <command>
//!
//! Available commands:
//! - build: Build the project
//! - test: Run tests
//! - check: Validate a recipe with the debug binary
//! - ci: Run CI checks

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use xshell::{cmd, Shell};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for kube-workspace")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the project
    Build {
        /// Build in release mode
        #[arg(long)]
        release: bool,
    },
    /// Run tests
    Test {
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
        /// Only run tests whose name contains this string
        filter: Option<String>,
    },
    /// Validate a recipe file through the CLI
    Check {
        /// Recipe to validate
        recipe: PathBuf,
        /// Declared machine names
        #[arg(short, long = "machine")]
        machines: Vec<String>,
    },
    /// Run CI checks (format, clippy, test)
    Ci,
    /// Format code
    Format {
        /// Check formatting without modifying files
        #[arg(long)]
        check: bool,
    },
    /// Run clippy
    Clippy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    sh.change_dir(project_root()?);

    match cli.command {
        Commands::Build { release } => build(&sh, release),
        Commands::Test {
            integration,
            filter,
        } => test(&sh, integration, filter),
        Commands::Check { recipe, machines } => check(&sh, &recipe, &machines),
        Commands::Ci => ci(&sh),
        Commands::Format { check } => format(&sh, check),
        Commands::Clippy => clippy(&sh),
    }
}

fn build(sh: &Shell, release: bool) -> Result<()> {
    println!("🔨 Building kube-workspace...");

    if release {
        cmd!(sh, "cargo build --release").run()?;
        println!("✅ Release build completed: target/release/kube-workspace");
    } else {
        cmd!(sh, "cargo build").run()?;
        println!("✅ Debug build completed: target/debug/kube-workspace");
    }

    Ok(())
}

fn test(sh: &Shell, integration: bool, filter: Option<String>) -> Result<()> {
    println!("🧪 Running tests...");

    let filter = filter.into_iter();
    if integration {
        cmd!(sh, "cargo test -p kube-workspace --test environment_test {filter...}").run()?;
    } else {
        cmd!(sh, "cargo test --all {filter...}").run()?;
    }

    println!("✅ All tests passed");
    Ok(())
}

fn check(sh: &Shell, recipe: &Path, machines: &[String]) -> Result<()> {
    let recipe = sh
        .current_dir()
        .join(recipe)
        .canonicalize()
        .with_context(|| format!("Recipe not found: {}", recipe.display()))?;

    let machine_args: Vec<String> = machines
        .iter()
        .flat_map(|m| ["--machine".to_string(), m.clone()])
        .collect();

    cmd!(
        sh,
        "cargo run -q -p kube-workspace -- check --recipe {recipe} {machine_args...}"
    )
    .run()
    .context("Recipe check failed")?;
    Ok(())
}

fn ci(sh: &Shell) -> Result<()> {
    println!("🔍 Running CI checks...");

    println!("\n📝 Checking formatting...");
    format(sh, true)?;

    println!("\n🔧 Running clippy...");
    clippy(sh)?;

    println!("\n🧪 Running tests...");
    test(sh, false, None)?;

    println!("\n✅ All CI checks passed!");
    Ok(())
}

fn format(sh: &Shell, check: bool) -> Result<()> {
    if check {
        cmd!(sh, "cargo fmt --all -- --check").run()?;
        println!("✅ Code formatting is correct");
    } else {
        cmd!(sh, "cargo fmt --all").run()?;
        println!("✅ Code formatted");
    }
    Ok(())
}

fn clippy(sh: &Shell) -> Result<()> {
    cmd!(
        sh,
        "cargo clippy --all-targets --all-features -- -D warnings"
    )
    .run()?;
    println!("✅ Clippy checks passed");
    Ok(())
}

fn project_root() -> Result<PathBuf> {
    Path::new(&env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(1)
        .map(Path::to_path_buf)
        .context("xtask must live inside the workspace")
}
