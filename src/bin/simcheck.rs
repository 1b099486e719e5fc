//! simcheck -- standalone MCP similarity server.
//!
//! Usage: simcheck [--threshold <n>] [--granularity <sentences|paragraphs>]
//!                 [--pattern <regex>] [--max-sessions <n>]

fn main() -> anyhow::Result<()> {
    // Initialize tracing to stderr so it does not interfere with MCP stdio.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = simcheck::ServerConfig::from_args(std::env::args().skip(1))?;

    simcheck::run_server(&config)
}
