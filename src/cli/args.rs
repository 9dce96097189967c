//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};

use crate::suite::ProjectFilter;

/// Mock travel-booking backend and API check suite
#[derive(Parser, Debug, Clone)]
#[command(name = "tripmock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Load environment variables from a .env file
    #[arg(long = "env-file", value_name = "FILE", global = true)]
    pub env_file: Option<PathBuf>,

    /// Disable auto-loading of .env from the current directory
    #[arg(long = "no-env", action = ArgAction::SetTrue, global = true)]
    pub no_env: bool,

    /// Harness config file (YAML, JSON, or TOML); replaces environment settings
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long = "log-json", action = ArgAction::SetTrue, global = true)]
    pub log_json: bool,

    /// Verbose logging
    #[arg(short, long, action = ArgAction::SetTrue, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve the mock backend over HTTP
    Serve(ServeArgs),

    /// Issue one request and print the response
    Call(CallArgs),

    /// Run the smoke/API check suite
    Check(CheckArgs),

    /// List the mock routing table
    Routes,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ServeArgs {
    /// Bind host (default: 127.0.0.1)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Bind port (default: 8080)
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Mock server config file (YAML, JSON, or TOML)
    #[arg(long = "server-config", value_name = "FILE")]
    pub server_config: Option<PathBuf>,

    /// Add CORS headers and answer preflight requests
    #[arg(long, action = ArgAction::SetTrue)]
    pub cors: bool,

    /// Do not log requests
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub quiet: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CallArgs {
    /// HTTP method (GET or POST)
    #[arg(value_name = "METHOD")]
    pub method: String,

    /// Request path, e.g. /tours/available
    #[arg(value_name = "PATH")]
    pub path: String,

    /// JSON request body
    #[arg(short, long, value_name = "JSON")]
    pub data: Option<String>,

    /// Request header NAME:VALUE (repeatable)
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Call the real backend instead of the mock
    #[arg(long, action = ArgAction::SetTrue)]
    pub live: bool,

    /// Override the backend base URL
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CheckArgs {
    /// Which projects to run
    #[arg(long, value_enum, default_value_t = ProjectFilter::All)]
    pub project: ProjectFilter,

    /// Run against the real backend instead of the mock
    #[arg(long, action = ArgAction::SetTrue)]
    pub live: bool,

    /// Override the backend base URL
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Checks in flight at once
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,
}

/// Split a `NAME:VALUE` header argument
pub fn parse_header(raw: &str) -> Option<(String, String)> {
    let (name, value) = raw.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().to_string()))
}
