use anyhow::Context;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use triangulate::{
    AppState, ResearchOrchestrator, TriangulateConfig, build_app,
    cli::{Cli, Commands, output::Output},
    llm::Provider,
    types::ResearchRequest,
    utils::toml_config::ServerConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let config = match TriangulateConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            output.error(&format!("Failed to load {}: {}", cli.config.display(), e));
            std::process::exit(1);
        }
    };

    init_tracing(&config.server, cli.verbose);

    match cli.command {
        None => serve(config, None, None, &output).await,
        Some(Commands::Serve { host, port }) => serve(config, host, port, &output).await,
        Some(Commands::Ask {
            query,
            depth,
            sources,
            max_sources,
        }) => {
            let request = ResearchRequest {
                query,
                depth: depth.into(),
                include_sources: sources,
                max_sources,
            };
            ask(config, request, &output).await
        }
        Some(Commands::Config { validate }) => {
            show_config(&cli.config, &config, validate, &output);
            Ok(())
        }
    }
}

/// Logs go to stderr so `ask` output stays clean on stdout
fn init_tracing(server: &ServerConfig, verbose: bool) {
    let default_level = if verbose { "debug" } else { server.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "triangulate={level},triangulate_server={level},tower_http={level}",
            level = default_level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if server.log_format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn serve(
    mut config: TriangulateConfig,
    host: Option<String>,
    port: Option<u16>,
    output: &Output,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    output.banner();
    let state = AppState::from_config(config)?;
    let sources: Vec<String> = state
        .orchestrator
        .registry()
        .source_types()
        .iter()
        .map(|source| source.to_string())
        .collect();
    output.info(&format!("Sources enabled: {}", sources.join(", ")));
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "Triangulate server listening");
    output.success(&format!("Listening on http://{}", addr));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

async fn ask(
    config: TriangulateConfig,
    request: ResearchRequest,
    output: &Output,
) -> anyhow::Result<()> {
    let orchestrator = ResearchOrchestrator::from_config(&config)?;

    match orchestrator.research_request(&request).await {
        Ok(response) => {
            output.research(&response);
            Ok(())
        }
        Err(e) => {
            output.error(&e.to_string());
            std::process::exit(1);
        }
    }
}

fn show_config(
    path: &std::path::Path,
    config: &TriangulateConfig,
    validate: bool,
    output: &Output,
) {
    if validate {
        match config.validate() {
            Ok(()) => output.success(&format!("{} is valid", path.display())),
            Err(e) => {
                output.error(&e.to_string());
                std::process::exit(1);
            }
        }
        return;
    }

    output.header("Server");
    output.kv("address", &format!("{}:{}", config.server.host, config.server.port));
    output.kv("log", &format!("{} ({})", config.server.log_level, config.server.log_format));

    output.header("LLM");
    output.kv("provider", &config.llm.provider);
    output.kv("model", &config.llm.model);
    output.kv("base_url", &config.llm.base_url);
    let llm_ready = Provider::from_config(config)
        .map(|p| p.is_configured())
        .unwrap_or(false);
    output.kv("api key", if llm_ready { "configured" } else { "missing" });

    output.header("Research");
    let research = &config.research;
    output.kv("default max sources", &research.default_max_sources.to_string());
    output.kv("max sources limit", &research.max_sources_limit.to_string());
    output.kv("per-source limit", &research.per_source_limit.to_string());
    output.kv("max concurrent requests", &research.max_concurrent_requests.to_string());

    output.header("Sources");
    match triangulate::SourceRegistry::from_config(config) {
        Ok(registry) => output.source_statuses(&registry.statuses()),
        Err(e) => output.warning(&e.to_string()),
    }

    if !path.exists() {
        output.hint(&format!(
            "{} not found, showing built-in defaults",
            path.display()
        ));
    }
}
