//! Purpose: End-to-end tests for the `greenlight` binary over TCP.
//! Exports: None (integration test module).
//! Role: Validate startup flags, JSON envelopes, and error statuses against a real listener.
//! Invariants: Servers bind an ephemeral loopback-reachable port and are killed on drop.
//! Invariants: Bounded waits avoid test flakiness.

use std::io::Read;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, MutexGuard};
use std::thread::sleep;
use std::time::{Duration, Instant};

use serde_json::Value;

type TestResult<T> = Result<T, Box<dyn std::error::Error>>;

static SERVER_LOCK: Mutex<()> = Mutex::new(());

struct TestServer {
    child: Child,
    base_url: String,
    _server_guard: MutexGuard<'static, ()>,
}

impl TestServer {
    fn start(env: &str) -> TestResult<Self> {
        let guard = SERVER_LOCK
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        let mut last_err: Option<Box<dyn std::error::Error>> = None;
        for _attempt in 0..3 {
            let port = pick_port()?;
            let base_url = format!("http://127.0.0.1:{port}");

            let mut child = Command::new(env!("CARGO_BIN_EXE_greenlight"))
                .arg("--port")
                .arg(port.to_string())
                .arg("--env")
                .arg(env)
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .spawn()?;

            match wait_for_server(&mut child, &base_url) {
                Ok(()) => {
                    return Ok(Self {
                        child,
                        base_url,
                        _server_guard: guard,
                    });
                }
                Err(err) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    last_err = Some(err);
                    sleep(Duration::from_millis(30));
                }
            }
        }

        Err(last_err.unwrap_or_else(|| "server failed to start".into()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn pick_port() -> TestResult<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(port)
}

fn wait_for_server(child: &mut Child, base_url: &str) -> TestResult<()> {
    let url = format!("{base_url}/v1/healthcheck");
    let start = Instant::now();
    loop {
        if let Ok(resp) = ureq::get(&url).call() {
            if resp.status() == 200 {
                return Ok(());
            }
        }
        if let Some(status) = child.try_wait()? {
            let mut stderr = String::new();
            if let Some(mut pipe) = child.stderr.take() {
                let _ = pipe.read_to_string(&mut stderr);
            }
            let detail = stderr.trim();
            return Err(format!(
                "server exited before ready (status: {status}, stderr: {})",
                if detail.is_empty() { "<empty>" } else { detail }
            )
            .into());
        }
        if start.elapsed() > Duration::from_secs(8) {
            return Err("server did not start in time".into());
        }
        sleep(Duration::from_millis(20));
    }
}

fn error_reply(result: Result<ureq::Response, ureq::Error>) -> TestResult<(u16, Value)> {
    match result {
        Err(ureq::Error::Status(code, response)) => {
            Ok((code, serde_json::from_str(&response.into_string()?)?))
        }
        Err(err) => Err(err.into()),
        Ok(response) => Err(format!("expected error status, got {}", response.status()).into()),
    }
}

#[test]
fn healthcheck_reports_configured_environment() -> TestResult<()> {
    let server = TestServer::start("production")?;
    let response = ureq::get(&server.url("/v1/healthcheck")).call()?;
    assert_eq!(response.status(), 200);
    assert_eq!(response.content_type(), "application/json");
    let body = response.into_string()?;
    assert!(body.contains("\n\t\"healthcheck\": {\n\t\t"));
    assert!(body.ends_with("}\n"));
    let value: Value = serde_json::from_str(&body)?;
    assert_eq!(value["healthcheck"]["environment"], "production");
    assert_eq!(value["healthcheck"]["status"], "available");
    Ok(())
}

#[test]
fn create_movie_over_tcp() -> TestResult<()> {
    let server = TestServer::start("development")?;
    let response = ureq::post(&server.url("/v1/movies"))
        .set("Content-Type", "application/json")
        .send_string(r#"{"title":"Ok","runtime":100,"year":2000,"genres":["drama"]}"#)?;
    assert_eq!(response.status(), 201);
    let value: Value = serde_json::from_str(&response.into_string()?)?;
    assert_eq!(value["movie"]["title"], "Ok");
    assert_eq!(value["movie"]["runtime"], "100 mins");

    let (code, value) = error_reply(
        ureq::post(&server.url("/v1/movies")).send_string(r#"{"title":"Ok","extra":true}"#),
    )?;
    assert_eq!(code, 400);
    assert_eq!(value["error"], r#"body contains unknown key "extra""#);

    let (code, value) =
        error_reply(ureq::post(&server.url("/v1/movies")).send_string(r#"{"title":"Ok"}"#))?;
    assert_eq!(code, 422);
    assert_eq!(value["error"]["year"], "Must be provided");
    assert!(value["error"].get("title").is_none());
    Ok(())
}

#[test]
fn show_movie_and_not_found_over_tcp() -> TestResult<()> {
    let server = TestServer::start("development")?;
    let body = ureq::get(&server.url("/v1/movies/7")).call()?.into_string()?;
    let value: Value = serde_json::from_str(&body)?;
    assert_eq!(value["movie"]["id"], 7);

    let (code, value) = error_reply(ureq::get(&server.url("/v1/movies/nope")).call())?;
    assert_eq!(code, 404);
    assert_eq!(value["error"], "the requested resource could not be found");
    Ok(())
}

#[test]
fn zero_port_exits_with_usage_error() -> TestResult<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_greenlight"))
        .arg("--port")
        .arg("0")
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr)?;
    let value: Value = serde_json::from_str(stderr.trim())?;
    assert_eq!(value["error"]["kind"], "Usage");
    Ok(())
}
