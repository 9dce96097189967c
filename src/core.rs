//! Command dispatch

use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Table};
use console::style;
use tracing::{debug, info};

use crate::cli::args::parse_header;
use crate::cli::{Args, CallArgs, CheckArgs, Command, ServeArgs};
use crate::client::ApiBackend;
use crate::config::{EnvVars, HarnessConfig};
use crate::errors::TripmockError;
use crate::logging;
use crate::mock::{MockResponder, MockServer, MockServerConfig, RequestOptions};
use crate::status::ExitStatus;
use crate::suite::{CheckContext, CheckId, SuiteRunner};

/// Main entry point for the CLI.
///
/// Parses arguments, sets up logging and a tokio runtime, and dispatches to
/// the selected command.
pub fn run(args: Vec<String>) -> ExitStatus {
    let parsed = match Args::try_parse_from(&args) {
        Ok(args) => args,
        Err(e) => {
            e.print().ok();
            return if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion {
                ExitStatus::Success
            } else {
                ExitStatus::Error
            };
        }
    };

    let level = if parsed.verbose {
        "debug"
    } else if matches!(parsed.command, Command::Serve(_)) {
        "info"
    } else {
        "warn"
    };
    logging::init(level, parsed.log_json);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => return handle_error(TripmockError::Io(e), parsed.verbose),
    };

    let verbose = parsed.verbose;
    match runtime.block_on(program(parsed)) {
        Ok(status) => status,
        Err(e) => handle_error(e, verbose),
    }
}

pub async fn program(args: Args) -> Result<ExitStatus, TripmockError> {
    debug!(?args, "Parsed arguments");

    match &args.command {
        Command::Routes => print_routes(),
        Command::Serve(serve) => run_serve(serve).await,
        Command::Call(call) => {
            let config = load_harness_config(&args)?;
            run_call(call, config).await
        }
        Command::Check(check) => {
            let config = load_harness_config(&args)?;
            run_checks(check, config).await
        }
    }
}

/// Build the harness config from a file, or from `.env` plus the process environment
pub fn load_harness_config(args: &Args) -> Result<HarnessConfig, TripmockError> {
    if let Some(ref path) = args.config {
        info!(path = %path.display(), "Loading harness config");
        return HarnessConfig::load(path);
    }

    let mut env = if args.no_env {
        EnvVars::new()
    } else if let Some(ref path) = args.env_file {
        EnvVars::load_file(path)?
    } else {
        EnvVars::try_load_default()?
    };
    env.merge(&EnvVars::from_env());

    HarnessConfig::from_env(&env)
}

fn print_routes() -> Result<ExitStatus, TripmockError> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "Method", "Pattern", "Name"]);

    for (i, route) in MockResponder::new().routes().iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            route.method.clone(),
            route.pattern.clone(),
            route.name.clone(),
        ]);
    }

    println!("{}", table);
    println!("Unmatched requests answer 404 {{\"message\": \"Not Found\"}}");
    Ok(ExitStatus::Success)
}

async fn run_serve(serve: &ServeArgs) -> Result<ExitStatus, TripmockError> {
    let mut config = match serve.server_config {
        Some(ref path) => MockServerConfig::load(path)?,
        None => MockServerConfig::default(),
    };

    if let Some(ref host) = serve.host {
        config.host = host.clone();
    }
    if let Some(port) = serve.port {
        config.port = port;
    }
    if serve.cors {
        config.cors = true;
    }
    if serve.quiet {
        config.log_requests = false;
    }

    let server = MockServer::new(config)?;
    server.run().await?;
    Ok(ExitStatus::Success)
}

async fn run_call(call: &CallArgs, mut config: HarnessConfig) -> Result<ExitStatus, TripmockError> {
    if call.live {
        config.use_mock = false;
    }
    if let Some(ref url) = call.base_url {
        config.base_url = url.clone();
    }
    config.validate()?;

    let mut options = RequestOptions::new();
    if let Some(ref data) = call.data {
        let value = serde_json::from_str(data)
            .map_err(|e| TripmockError::Argument(format!("Invalid JSON body: {}", e)))?;
        options.data = Some(value);
    }
    for raw in &call.headers {
        let (name, value) = parse_header(raw)
            .ok_or_else(|| TripmockError::Argument(format!("Invalid header '{}': expected NAME:VALUE", raw)))?;
        options.headers.insert(name, value);
    }

    let backend = ApiBackend::from_config(&config)?;
    let response = backend.call(&call.method, &call.path, options).await?;

    eprintln!("{} {} -> {}", call.method.to_uppercase(), call.path, style(response.status()).bold());
    println!("{}", serde_json::to_string_pretty(&response.json().await)?);

    Ok(ExitStatus::from_http_status(response.status()))
}

async fn run_checks(check: &CheckArgs, mut config: HarnessConfig) -> Result<ExitStatus, TripmockError> {
    if check.live {
        config.use_mock = false;
    }
    if let Some(ref url) = check.base_url {
        config.base_url = url.clone();
    }
    if let Some(workers) = check.workers {
        config.workers = workers;
    }
    config.validate_for_checks()?;

    eprintln!("Running {:?} checks against {}", check.project, config.target());

    let checks = CheckId::selected(check.project);
    let runner = SuiteRunner::new(CheckContext::from_config(config)?);
    let report = runner.run(&checks).await;

    println!("{}", report.render_table());
    let failures = report.render_failures();
    if !failures.is_empty() {
        println!("{}", failures);
    }
    println!("{}", report.summary_line());

    Ok(report.exit_status())
}

fn handle_error(error: TripmockError, verbose: bool) -> ExitStatus {
    if verbose {
        eprintln!("Error: {:?}", error);
    } else {
        eprintln!("Error: {}", error);
    }

    ExitStatus::Error
}
