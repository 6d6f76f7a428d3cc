use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::panic;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

thread_local! {
    static LAST_PANIC_BACKTRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

pub fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,people=debug,tower_http=debug cargo run -p people
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Route every panic through tracing and remember its backtrace for the request boundary.
///
/// The hook runs on the panicking thread before unwinding starts, so the request
/// middleware that catches the unwind on that same thread can pick the trace up.
pub fn init_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let trace = Backtrace::force_capture().to_string();
        LAST_PANIC_BACKTRACE.with(|slot| *slot.borrow_mut() = Some(trace));

        // stderr can be hidden depending on how the process is launched.
        tracing::error!(%info, "panic");
        default_hook(info);
    }))
}

/// Backtrace captured by the panic hook for the most recent panic on this thread.
pub fn take_panic_backtrace() -> Option<String> {
    LAST_PANIC_BACKTRACE.with(|slot| slot.borrow_mut().take())
}

/// Resolves on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("signal caught. shutting down...");
}
