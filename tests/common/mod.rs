#![allow(dead_code)]

use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::sync::Arc;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use serde_json::{Value, json};

// ──────────────────── CLI runner ────────────────────

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn resolve_bin_path() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_hec-overseer") {
        return PathBuf::from(path);
    }

    let exe_name = if cfg!(windows) {
        "hec-overseer.exe"
    } else {
        "hec-overseer"
    };
    let fallback = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .and_then(|deps| deps.parent().map(PathBuf::from))
        .map(|debug_dir| debug_dir.join(exe_name));

    match fallback {
        Some(path) if path.exists() => path,
        _ => panic!("unable to resolve hec-overseer binary path for integration test"),
    }
}

/// Run the binary with an isolated HOME and activity log under `home`.
pub fn run_cli_case(case_name: &str, home: &Path, args: &[&str]) -> CmdResult {
    let root = std::env::temp_dir().join("hec-overseer-test-logs");
    fs::create_dir_all(&root).expect("create temp test log dir");

    let log_path = root.join(format!("{}-{}.log", sanitize(case_name), now_millis()));
    let bin_path = resolve_bin_path();

    let output = Command::new(&bin_path)
        .args(args)
        .env("HOME", home)
        .env("HEC_ACTIVITY_LOG", activity_log(home))
        .env_remove("HEC_BACKEND_URL")
        .env_remove("HEC_POLL_INTERVAL_MS")
        .env_remove("HEC_FEED_LIMIT")
        .env_remove("HEC_REQUEST_TIMEOUT_MS")
        .env("NO_COLOR", "1")
        .env("RUST_BACKTRACE", "1")
        .output()
        .expect("execute hec-overseer command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let mut log_content = String::new();
    log_content.push_str(&format!("case={case_name}\n"));
    log_content.push_str(&format!("bin={}\n", bin_path.display()));
    log_content.push_str(&format!("args={args:?}\n"));
    log_content.push_str(&format!("status={}\n", output.status));
    log_content.push_str("----- stdout -----\n");
    log_content.push_str(&stdout);
    log_content.push('\n');
    log_content.push_str("----- stderr -----\n");
    log_content.push_str(&stderr);
    log_content.push('\n');
    fs::write(&log_path, log_content).expect("write test log");

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}

pub fn activity_log(home: &Path) -> PathBuf {
    home.join("activity.jsonl")
}

/// Parsed lines of the activity log, empty when it was never written.
pub fn activity_entries(home: &Path) -> Vec<Value> {
    fs::read_to_string(activity_log(home))
        .unwrap_or_default()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("activity line is JSON"))
        .collect()
}

// ──────────────────── stub backend ────────────────────

/// Mutable state behind the stub backend.
#[derive(Debug)]
pub struct StubState {
    pub active: bool,
    pub stats: Value,
    pub feed: Vec<Value>,
    /// Paths that answer HTTP 500.
    pub failing: Vec<&'static str>,
    /// Paths that answer with a non-JSON body.
    pub garbled: Vec<&'static str>,
    /// `METHOD path` for every request seen, in order.
    pub requests: Vec<String>,
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            active: true,
            stats: json!({"total_users": 1234, "total_minted": 340.5, "total_tasks": 89}),
            feed: vec![
                json!({
                    "id": "task-1", "type": "CODING", "time": "2025-03-01T12:30:15Z",
                    "worker": "worker-7", "hours": 4, "verdict": "APPROVED"
                }),
                json!({
                    "id": 2, "type": "GARDENING", "time": 1_740_832_215,
                    "worker": "worker-9", "hours": 2.5, "verdict": "REJECTED"
                }),
                json!({
                    "id": "task-3", "type": "CONSTRUCTION", "time": "2025-03-01T12:20:00",
                    "worker": "worker-2", "hours": 8, "verdict": "PENDING"
                }),
            ],
            failing: Vec::new(),
            garbled: Vec::new(),
            requests: Vec::new(),
        }
    }
}

/// Minimal HTTP/1.1 server speaking the simulation backend's contract.
///
/// Serves only the five contract routes, one request per connection. Request
/// bodies are read by `Content-Length`; chunked bodies are not supported.
pub struct StubBackend {
    pub url: String,
    pub state: Arc<Mutex<StubState>>,
}

impl StubBackend {
    pub fn start() -> Self {
        Self::with_state(StubState::default())
    }

    pub fn with_state(state: StubState) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub backend");
        let addr = listener.local_addr().expect("stub address");
        let state = Arc::new(Mutex::new(state));
        let shared = Arc::clone(&state);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                handle(stream, &shared);
            }
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().requests.clone()
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().active
    }
}

/// An address nothing listens on.
pub fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind unused port");
    let addr = listener.local_addr().expect("unused address");
    drop(listener);
    format!("http://{addr}")
}

/// An address that accepts connections and never answers.
pub fn silent_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind silent listener");
    let addr = listener.local_addr().expect("silent address");
    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };
            held.push(stream);
        }
    });
    format!("http://{addr}")
}

fn handle(mut stream: TcpStream, state: &Mutex<StubState>) {
    let Ok(clone) = stream.try_clone() else { return };
    let mut reader = BufReader::new(clone);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).is_err() || header.trim().is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':')
            && name.eq_ignore_ascii_case("content-length")
        {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }
    let mut body = vec![0u8; content_length];
    let _ = reader.read_exact(&mut body);

    let (status, payload) = route(&method, &target, state);
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
        payload.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn route(method: &str, target: &str, state: &Mutex<StubState>) -> (&'static str, String) {
    let mut state = state.lock();
    state.requests.push(format!("{method} {target}"));

    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    let known = [
        "/stats",
        "/feed",
        "/simulation/status",
        "/simulation/start",
        "/simulation/stop",
    ];
    let Some(path) = known.into_iter().find(|known| *known == path) else {
        return ("404 Not Found", json!({"detail": "Not Found"}).to_string());
    };
    if state.failing.contains(&path) {
        return (
            "500 Internal Server Error",
            json!({"detail": "boom"}).to_string(),
        );
    }
    if state.garbled.contains(&path) {
        return ("200 OK", "<html>not json</html>".to_string());
    }

    let body = match (method, path) {
        ("GET", "/stats") => state.stats.clone(),
        ("GET", "/feed") => {
            let limit = query
                .split('&')
                .find_map(|pair| pair.strip_prefix("limit="))
                .and_then(|raw| raw.parse::<usize>().ok())
                .unwrap_or(20);
            Value::Array(state.feed.iter().take(limit).cloned().collect())
        }
        ("GET", "/simulation/status") => json!({"active": state.active}),
        ("POST", "/simulation/start") => {
            state.active = true;
            json!({"status": "started"})
        }
        ("POST", "/simulation/stop") => {
            state.active = false;
            json!({"status": "stopped"})
        }
        _ => {
            return (
                "405 Method Not Allowed",
                json!({"detail": "Method Not Allowed"}).to_string(),
            );
        }
    };
    ("200 OK", body.to_string())
}
