use anyhow::{Context, Result, bail};
use clap::Parser;
use pyvet::cli::{Cli, Commands, OutputArgs, RenderArgs, SubmitArgs};
use pyvet::client::{AnalyzerClient, ClientError, SourceFile, Submission};
use pyvet::config::{self, Config, LoadedConfig};
use pyvet::core::dispatch::{self, DispatchError};
use pyvet::core::session::ReportSession;
use pyvet::core::{RawResponse, replay, report};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let exit_code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => run_render(args),
        Commands::Submit(args) => run_submit(args),
        Commands::Init => {
            let path = std::env::current_dir()?.join(config::CONFIG_FILE_NAME);
            config::write_default_config(&path)?;
            println!("created {}", path.display());
            Ok(0)
        }
    }
}

fn run_render(args: RenderArgs) -> Result<i32> {
    let loaded = load(&args.output)?;

    let mut responses = Vec::new();
    if args.files.is_empty() {
        responses.push(RawResponse {
            status: args.status,
            body: read_stdin()?,
        });
    }
    for path in &args.files {
        responses.push(RawResponse {
            status: args.status,
            body: read_input(path)?,
        });
    }

    let session = replay(&responses, loaded.config.general.failure_policy);
    emit(&session, &args.output, &loaded.config)
}

fn run_submit(args: SubmitArgs) -> Result<i32> {
    let loaded = load(&args.output)?;
    let mut analyzer = loaded.config.analyzer.clone();
    if let Some(url) = &args.url {
        analyzer.url = url.clone();
    }

    let submission = build_submission(&args)?;

    let client = AnalyzerClient::new(&analyzer);
    let mut session = ReportSession::new(loaded.config.general.failure_policy);
    match client.submit(&submission) {
        Ok(response) => session.apply(dispatch::dispatch_response(
            response.status,
            &response.body,
        )),
        Err(ClientError::Busy) => bail!("{}", ClientError::Busy),
        Err(err) => session.apply(Err(DispatchError::Transport(err.to_string()))),
    }

    emit(&session, &args.output, &loaded.config)
}

fn build_submission(args: &SubmitArgs) -> Result<Submission> {
    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| format!("{} is not a file path", path.display()))?;
        files.push(SourceFile {
            filename,
            content: read_input(path)?,
        });
    }

    let code = match &args.code {
        Some(code) => code.clone(),
        None if files.is_empty() => read_stdin()?,
        None => String::new(),
    };

    Ok(Submission { code, files })
}

fn load(output: &OutputArgs) -> Result<LoadedConfig> {
    let cwd = std::env::current_dir()?;
    config::load_config(output.config.as_deref(), &cwd)
}

fn emit(session: &ReportSession, output: &OutputArgs, cfg: &Config) -> Result<i32> {
    if output.json || cfg.general.json {
        println!("{}", serde_json::to_string_pretty(session)?);
    } else {
        if !cfg.display.color {
            colored::control::set_override(false);
        }
        report::print_human(session);
    }

    if session.is_clean() { Ok(0) } else { Ok(1) }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        return read_stdin();
    }
    fs::read_to_string(path).with_context(|| format!("failed reading {}", path.display()))
}

fn read_stdin() -> Result<String> {
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .context("failed reading stdin")?;
    Ok(content)
}
