//! Purpose: `greenlight` server entry point.
//! Role: Binary crate root; parses flags, builds immutable config, runs the HTTP server.
//! Invariants: Configuration is validated before binding and never mutated afterwards.
//! Invariants: Startup/serve errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `to_exit_code`.
use std::future::IntoFuture;
use std::sync::Arc;

use clap::Parser;
use serde_json::{Map, Value, json};
use tokio::time::Duration;
use tracing_subscriber::EnvFilter;

use greenlight::api::{Application, routes};
use greenlight::config::{Config, Environment, VERSION};
use greenlight::core::error::{Error, ErrorKind, to_exit_code};

#[derive(Parser)]
#[command(name = "greenlight", version, about = "JSON API for a movie catalog")]
struct Cli {
    #[arg(long, default_value_t = 4000, help = "API server port")]
    port: u16,
    #[arg(
        long,
        value_enum,
        default_value = "development",
        help = "Environment name reported by the healthcheck"
    )]
    env: Environment,
}

fn main() {
    let cli = Cli::parse();
    let config = Config {
        port: cli.port,
        env: cli.env,
    };
    let exit_code = match run(config) {
        Ok(()) => 0,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run(config: Config) -> Result<(), Error> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to start async runtime")
                .with_source(err)
        })?;
    runtime.block_on(serve(config))
}

async fn serve(config: Config) -> Result<(), Error> {
    config.validate()?;

    init_tracing();

    let bind = config.bind_addr();
    let env = config.env;
    let app = routes(Arc::new(Application::new(config)));

    let listener = tokio::net::TcpListener::bind(bind).await.map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to bind server")
            .with_source(err)
    })?;
    tracing::info!(%env, version = VERSION, addr = %bind, "starting server");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            result.map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("server failed")
                    .with_source(err)
            })?;
        }
        _ = shutdown_signal() => {
            tracing::info!("shutting down server");
            let _ = shutdown_tx.send(());
            match tokio::time::timeout(Duration::from_secs(10), &mut server).await {
                Ok(result) => result.map_err(|err| {
                    Error::new(ErrorKind::Io)
                        .with_message("server failed")
                        .with_source(err)
                })?,
                Err(_) => {
                    return Err(Error::new(ErrorKind::Io).with_message("server shutdown timed out"));
                }
            }
        }
    };
    tracing::info!("stopped server");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    #[cfg(not(unix))]
    ctrl_c.await;
}

fn emit_error(err: &Error) {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert(
        "message".to_string(),
        json!(err.message().unwrap_or("error")),
    );
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(source) = std::error::Error::source(err) {
        inner.insert("causes".to_string(), json!([source.to_string()]));
    }
    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    eprintln!("{}", Value::Object(outer));
}
