use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use socket2::{Domain, Protocol, Socket, Type};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

mod config;
mod error;
mod handler;
mod logger;
mod random;
mod response;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(cfg.log_level()?);

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    if cfg.startup.boot_wait_secs > 0 {
        logger::log_info(&format!(
            "Boot waiting for {} secs",
            cfg.startup.boot_wait_secs
        ));
        tokio::time::sleep(Duration::from_secs(cfg.startup.boot_wait_secs)).await;
    }

    let addr = cfg.get_socket_addr()?;
    let listener = create_reusable_listener(addr)?;
    let state = Arc::new(config::AppState::new(cfg.clone()));

    logger::log_server_start(&addr, &cfg);

    run_server(listener, state).await
}

/// Accept loop. Runs until SIGINT/SIGTERM, then drains in-flight
/// connections within the configured grace period.
async fn run_server(
    listener: TcpListener,
    state: Arc<config::AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        logger::log_connection_accepted(&peer_addr);
                        active_connections.fetch_add(1, Ordering::SeqCst);
                        handle_connection(stream, Arc::clone(&state), Arc::clone(&active_connections));
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                logger::log_info("Stopping service ...");
                break;
            }
        }
    }

    // Stop accepting, then wait for in-flight requests up to the grace period.
    drop(listener);
    drain_connections(
        &active_connections,
        Duration::from_secs(state.config.shutdown.grace_period_secs),
    )
    .await;
    logger::log_info("Service stopped.");
    Ok(())
}

/// Handle a single connection in a spawned task and decrement the
/// active-connection counter when it finishes.
fn handle_connection(
    stream: tokio::net::TcpStream,
    state: Arc<config::AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.server.keep_alive);
        // Bounds the header read only; handler sleeps may exceed it.
        builder.header_read_timeout(Duration::from_secs(
            state.config.server.header_read_timeout_secs,
        ));

        let svc_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&svc_state);
                async move { handler::handle_request(req, &state).await }
            }),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Resolves when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut terminate =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => {}
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }
}

/// Bounded graceful drain: poll the active-connection counter until it
/// hits zero or the grace period elapses.
async fn drain_connections(active_connections: &Arc<AtomicUsize>, grace_period: Duration) {
    let deadline = tokio::time::Instant::now() + grace_period;

    loop {
        let active = active_connections.load(Ordering::SeqCst);
        if active == 0 {
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Grace period elapsed with {active} connection(s) still active; closing"
            ));
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

/// Create a `TcpListener` with SO_REUSEPORT and SO_REUSEADDR enabled so a
/// replacement process can bind while old connections finish.
fn create_reusable_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
