//! Logger module
//!
//! Level-gated line logging for the server: info/debug to stdout,
//! warn/error to stderr, each line timestamped. The level is set once at
//! startup via `init`; before that everything is emitted.

use crate::config::{Config, LogLevel};
use hyper::{Method, Uri, Version};
use std::net::SocketAddr;
use std::sync::OnceLock;

static LEVEL: OnceLock<LogLevel> = OnceLock::new();

/// Set the process log level. Call once at startup.
pub fn init(level: LogLevel) {
    let _ = LEVEL.set(level);
}

fn enabled(level: LogLevel) -> bool {
    level <= *LEVEL.get().unwrap_or(&LogLevel::Debug)
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn write_out(tag: &str, message: &str) {
    println!("{} [{tag}] {message}", timestamp());
}

fn write_err(tag: &str, message: &str) {
    eprintln!("{} [{tag}] {message}", timestamp());
}

pub fn log_error(message: &str) {
    if enabled(LogLevel::Error) {
        write_err("ERROR", message);
    }
}

pub fn log_warning(message: &str) {
    if enabled(LogLevel::Warn) {
        write_err("WARN", message);
    }
}

pub fn log_info(message: &str) {
    if enabled(LogLevel::Info) {
        write_out("INFO", message);
    }
}

pub fn log_debug(message: &str) {
    if enabled(LogLevel::Debug) {
        write_out("DEBUG", message);
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    log_info("======================================");
    log_info("Service ready");
    log_info(&format!("Listening on: http://{addr}"));
    log_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        log_info(&format!("Worker threads: {workers}"));
    }
    log_info("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    log_info(&format!("[Request] {method} {uri} {version:?}"));
}
