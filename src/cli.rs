use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "pyvet",
    version,
    about = "Render Python code analysis results as a readable report"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Render(RenderArgs),
    Submit(SubmitArgs),
    Init,
}

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    pub files: Vec<PathBuf>,
    #[arg(long, default_value_t = 200)]
    pub status: u16,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct SubmitArgs {
    #[arg(long = "file")]
    pub files: Vec<PathBuf>,
    #[arg(long)]
    pub code: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
    #[command(flatten)]
    pub output: OutputArgs,
}
