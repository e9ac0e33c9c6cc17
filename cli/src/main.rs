mod envgen;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing {0}; pass it as a flag or set it in the environment")]
    MissingVar(&'static str),
    #[error("{0} must be a single line without quotes")]
    InvalidValue(&'static str),
    #[error("missing access token; pass --access-token or set VITRINE_ACCESS_TOKEN")]
    MissingAccessToken,
    #[error("could not write {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("server returned HTTP {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "vitrine-cli", about = "Vitrine env generator and API client")]
struct Cli {
    #[arg(long, env = "VITRINE_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "VITRINE_ACCESS_TOKEN")]
    access_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
    access_token: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write `.env` and `.env.production` with the backend connection.
    GenerateEnv {
        #[arg(long, env = "SUPABASE_URL")]
        supabase_url: Option<String>,
        #[arg(long, env = "SUPABASE_KEY")]
        supabase_key: Option<String>,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    Ping,
    /// Sign in and print the session; export its access token as VITRINE_ACCESS_TOKEN.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "VITRINE_PASSWORD")]
        password: String,
    },
    Services {
        /// Include inactive services (requires an access token).
        #[arg(long)]
        all: bool,
    },
    Feedbacks {
        /// Include pending feedback (requires an access token).
        #[arg(long)]
        all: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = CliContext { base_url: cli.base_url, access_token: cli.access_token };

    match cli.command {
        Command::GenerateEnv { supabase_url, supabase_key, dir } => run_generate_env(supabase_url, supabase_key, &dir),
        Command::Ping => run_ping(&ctx).await,
        Command::Login { email, password } => {
            let body = json!({ "email": email, "password": password });
            let session = api_request(&ctx, reqwest::Method::POST, "/api/auth/login", Some(body), false).await?;
            print_json(&session)
        }
        Command::Services { all } => {
            let path = if all { "/api/admin/services" } else { "/api/services" };
            print_json(&api_request(&ctx, reqwest::Method::GET, path, None, all).await?)
        }
        Command::Feedbacks { all } => {
            let path = if all { "/api/admin/feedbacks" } else { "/api/feedbacks" };
            print_json(&api_request(&ctx, reqwest::Method::GET, path, None, all).await?)
        }
    }
}

fn run_generate_env(supabase_url: Option<String>, supabase_key: Option<String>, dir: &std::path::Path) -> Result<(), CliError> {
    let connection = envgen::Connection::new(supabase_url, supabase_key)?;
    for path in envgen::write_env_files(dir, &connection)? {
        println!("wrote {}", path.display());
    }
    println!("✅ Environment files generated successfully!");
    Ok(())
}

async fn run_ping(cli: &CliContext) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let url = format!("{}/healthz", cli.base_url.trim_end_matches('/'));
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: "health check failed".to_owned() });
    }
    println!("ok");
    Ok(())
}

async fn api_request(
    cli: &CliContext,
    method: reqwest::Method,
    path: &str,
    body: Option<Value>,
    authenticated: bool,
) -> Result<Value, CliError> {
    let mut headers = HeaderMap::new();
    if authenticated {
        let token = cli.access_token.as_deref().ok_or(CliError::MissingAccessToken)?;
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
    }

    let client = reqwest::Client::builder().default_headers(headers).build()?;
    let url = format!("{}{}", cli.base_url.trim_end_matches('/'), path);

    let request = client.request(method, &url);
    let request = if let Some(json) = body { request.json(&json) } else { request };

    let response = request.send().await?;
    let status = response.status();
    let value = response.json::<Value>().await.unwrap_or(Value::Null);

    if !status.is_success() {
        let message = value
            .get("error")
            .and_then(Value::as_str)
            .map_or_else(|| value.to_string(), str::to_owned);
        return Err(CliError::ServerError { status: status.as_u16(), message });
    }

    Ok(value)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
