//! jobsearch CLI: Terminal client for the job search assistant backend

use clap::{Parser, Subcommand};
use jobsearch_engine::{fetch_reply, Config, Conversation, PredictClient, PredictError, Reply};

/// Chat client for the job search assistant backend
#[derive(Parser)]
#[command(name = "jobsearch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Send a single query and print the reply
    Ask {
        /// The query text
        query: String,

        /// Backend endpoint (overrides config)
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Check backend reachability and print diagnostics
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Backend endpoint (overrides config)
        #[arg(long)]
        endpoint: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Tui) => {
            let config = load_config();
            let sessions_dir = Config::sessions_dir().unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(1);
            });
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            if let Err(e) = rt.block_on(jobsearch_tui::run_tui(&config, sessions_dir)) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Ask { query, endpoint }) => {
            init_tracing();
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            let exit_code = rt.block_on(cmd_ask(&query, endpoint));
            std::process::exit(exit_code);
        }
        Some(Commands::Doctor { json, endpoint }) => {
            init_tracing();
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            let exit_code = rt.block_on(cmd_doctor(json, endpoint));
            std::process::exit(exit_code);
        }
    }
}

/// Initialize tracing for headless commands, respecting `RUST_LOG`.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config, falling back to defaults if none exists.
fn load_config() -> Config {
    Config::load_default().unwrap_or_else(|e| {
        eprintln!("Warning: failed to load config, using defaults: {e}");
        Config::default()
    })
}

fn resolve_endpoint(endpoint: Option<String>) -> String {
    endpoint.unwrap_or_else(|| load_config().endpoint)
}

/// Send one query through the conversation controller and print the reply.
async fn cmd_ask(query: &str, endpoint: Option<String>) -> i32 {
    let endpoint = resolve_endpoint(endpoint);
    let client = PredictClient::new(&endpoint);

    let mut conversation = Conversation::new();
    match conversation.submit(query) {
        Ok(jobsearch_engine::Submission::Accepted { query }) => {
            let reply = fetch_reply(&client, &query).await;
            let is_error = reply.is_error();
            println!("{}", reply.text());
            conversation.settle(reply);
            i32::from(is_error)
        }
        Ok(jobsearch_engine::Submission::Ignored) => {
            eprintln!("Nothing to ask: query is blank");
            1
        }
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

/// Probe the backend and report reachability.
async fn cmd_doctor(json: bool, endpoint: Option<String>) -> i32 {
    let endpoint = resolve_endpoint(endpoint);
    let client = PredictClient::new(&endpoint);

    let probe = client_probe(&client).await;

    if json {
        let report = serde_json::json!({
            "endpoint": endpoint,
            "reachable": probe.is_ok(),
            "detail": match &probe {
                Ok(detail) => detail.clone(),
                Err(detail) => detail.clone(),
            },
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("failed to serialize")
        );
    } else {
        println!("Backend: {endpoint}");
        match &probe {
            Ok(detail) => println!("  reachable - {detail}"),
            Err(detail) => println!("  unreachable - {detail}"),
        }
    }

    i32::from(probe.is_err())
}

/// Probe the predict endpoint with a fixed query.
///
/// An application-level error still proves the server is up, so it counts
/// as reachable.
async fn client_probe(client: &PredictClient) -> Result<String, String> {
    use jobsearch_engine::PredictService;

    match client.predict("ping").await {
        Ok(_) => Ok("responded".to_string()),
        Err(PredictError::Application { status, .. }) => {
            Ok(format!("responded with application error (HTTP {status})"))
        }
        Err(PredictError::Decode(msg)) => Ok(format!("responded with undecodable body: {msg}")),
        Err(PredictError::Transport(msg)) => Err(format!("connection failed: {msg}")),
    }
}
