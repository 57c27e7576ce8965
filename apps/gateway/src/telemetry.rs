use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "info,actix_web=info,actix_server=info,reqwest=warn,hyper_util=warn";

/// JSON logs on stdout; `RUST_LOG` replaces `DEFAULT_FILTER`.
///
/// Events carry the enclosing `request` span opened by `RequestTrace`, so every
/// line has the trace id, method and path.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json = fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_span_list(false)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry().with(filter).with(json).init();
}
