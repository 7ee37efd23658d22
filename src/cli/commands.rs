// CLI command definitions

use super::check::CheckCommand;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "kube-workspace",
    version,
    about = "Assemble and validate the Kubernetes environment of a workspace",
    long_about = "Reads a workspace recipe made of Kubernetes objects, merges its pods into a single deployment when needed and validates the result"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Build the environment of a recipe and report problems
    Check(CheckCommand),
}
