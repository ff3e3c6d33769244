//! CLI smoke tests for the users-server binary
//!
//! These run the real binary with an isolated HOME and working directory so
//! that neither a developer's `.env` nor their shell's `DB_*` variables leak in.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::time::timeout;

const LEGACY_VARS: &[&str] = &["DB_HOST", "DB_PORT", "DB_USER", "DB_PASSWORD", "DB_NAME", "HOST", "PORT"];

fn users_server(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_users-server"));
    cmd.env("HOME", home)
        .current_dir(home)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for var in LEGACY_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Helper to run the users-server binary with given arguments
fn run_users_server(home: &Path, args: &[&str]) -> std::process::Output {
    users_server(home)
        .args(args)
        .output()
        .expect("Failed to execute users-server")
}

fn write_config(dir: &TempDir, body: &str) -> String {
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, body).expect("Failed to write config file");
    path.to_string_lossy().to_string()
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .expect("no free port")
}

#[test]
fn test_cli_help_command() {
    let home = TempDir::new().unwrap();
    let output = run_users_server(home.path(), &["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("users-server"), "Should contain binary name");
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("init-db"), "Should contain 'init-db' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--mock"), "Should mention mock option");
}

#[test]
fn test_cli_version_command() {
    let home = TempDir::new().unwrap();
    let output = run_users_server(home.path(), &["--version"]);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("users-server 0.1.0"), "got: {stdout}");
}

#[test]
fn test_cli_invalid_command() {
    let home = TempDir::new().unwrap();
    let output = run_users_server(home.path(), &["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Should report the bad subcommand: {stderr}");
}

#[test]
fn test_cli_config_validation_missing_file() {
    let home = TempDir::new().unwrap();
    let output = run_users_server(home.path(), &["--config", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "Should fail with missing config");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config"), "Should mention config file issue: {stderr}");
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let home = TempDir::new().unwrap();
    let config = write_config(&home, "invalid: yaml: content: [unclosed");

    let output = run_users_server(home.path(), &["--config", &config, "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");
}

#[test]
fn test_cli_check_valid_config() {
    let home = TempDir::new().unwrap();
    let config = write_config(
        &home,
        r#"
server:
  home_dir: "~/.users-api"
  host: "127.0.0.1"
  port: 8087

database:
  host: "db.internal"
  user: "app"
  password: "super-secret"
  dbname: "users"

modules:
  api_ingress:
    cors_enabled: true
    request_timeout: "5s"
"#,
    );

    let output = run_users_server(home.path(), &["--config", &config, "check"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "check failed: {stderr}");
    assert!(stdout.contains("Configuration check passed"));
    assert!(stdout.contains("port: 8087"));
    assert!(!stdout.contains("super-secret"), "password must be masked");
}

#[test]
fn test_cli_check_rejects_bad_ingress_section() {
    let home = TempDir::new().unwrap();
    let config = write_config(
        &home,
        r#"
modules:
  api_ingress:
    no_such_option: 1
"#,
    );

    let output = run_users_server(home.path(), &["--config", &config, "check"]);
    assert!(!output.status.success(), "unknown ingress keys must be rejected");
}

#[test]
fn test_cli_print_config_masks_env_password() {
    let home = TempDir::new().unwrap();
    let output = users_server(home.path())
        .env("DB_HOST", "pg.example")
        .env("DB_PASSWORD", "hunter2")
        .env("PORT", "6100")
        .arg("--print-config")
        .output()
        .expect("Failed to execute users-server");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("pg.example"));
    assert!(stdout.contains("port: 6100"));
    assert!(stdout.contains("***"));
    assert!(!stdout.contains("hunter2"));
}

#[test]
fn test_cli_print_config_port_flag_wins() {
    let home = TempDir::new().unwrap();
    let output = users_server(home.path())
        .env("PORT", "6100")
        .args(["--port", "7200", "--print-config"])
        .output()
        .expect("Failed to execute users-server");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("port: 7200"), "got: {stdout}");
}

#[test]
fn test_cli_run_without_database_fails() {
    let home = TempDir::new().unwrap();
    let output = run_users_server(home.path(), &["--port", &free_port().to_string(), "run"]);

    assert!(!output.status.success(), "run without a store must fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No database configured"), "got: {stderr}");
}

#[test]
fn test_cli_init_db_with_mock_database() {
    let home = TempDir::new().unwrap();
    let output = run_users_server(home.path(), &["--mock", "init-db"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Users table is ready"));
}

#[test]
fn test_cli_run_unreachable_database_fails_fast() {
    let home = TempDir::new().unwrap();
    let config = write_config(
        &home,
        r#"
database:
  host: "127.0.0.1"
  port: 1
  user: "app"
  password: "pw"
  dbname: "users"
  pool:
    acquire_timeout: "2s"
"#,
    );

    let output = run_users_server(
        home.path(),
        &["--config", &config, "--port", &free_port().to_string(), "run"],
    );
    assert!(!output.status.success(), "unreachable database must abort startup");
}

fn get_health(port: u16) -> Option<String> {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).ok()?;
    stream.set_read_timeout(Some(Duration::from_secs(2))).ok()?;
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .ok()?;
    let mut buf = String::new();
    stream.read_to_string(&mut buf).ok()?;
    Some(buf)
}

#[tokio::test]
async fn test_cli_run_command_with_mock_database() {
    let home = TempDir::new().unwrap();
    let port = free_port();

    let mut child = users_server(home.path())
        .args(["--mock", "--port", &port.to_string(), "run"])
        .spawn()
        .expect("Failed to spawn users-server");

    let deadline = Instant::now() + Duration::from_secs(15);
    let answered = timeout(Duration::from_secs(20), async {
        loop {
            if let Some(resp) = tokio::task::spawn_blocking(move || get_health(port))
                .await
                .unwrap()
            {
                return Some(resp);
            }
            if Instant::now() > deadline {
                return None;
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    })
    .await;

    let _ = child.kill();
    let _ = child.wait();

    let resp = answered.ok().flatten().expect("server never answered /health");
    assert!(resp.starts_with("HTTP/1.1 200"), "got: {resp}");
    assert!(resp.to_ascii_lowercase().contains("x-request-id"));
    assert!(resp.contains("\"status\":\"healthy\""), "got: {resp}");
}
