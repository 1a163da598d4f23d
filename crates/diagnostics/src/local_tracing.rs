use std::{str::FromStr, sync::atomic::AtomicBool};

use tracing::Level;
use tracing_subscriber::{filter::ParseError, fmt::format::FmtSpan, EnvFilter, Layer};

static IS_TRACING_ENABLED: AtomicBool = AtomicBool::new(false);

/// Targets that a bare level in `TRACE` (e.g. `TRACE=debug`) applies to.
const WEBDIST_TARGETS: [&str; 4] =
    ["webdist", "webdist_resolver", "webdist_materializer", "webdist_fs"];

/// How the content of the `TRACE` env var is interpreted.
#[derive(Debug)]
enum TraceFilter {
    /// `TRACE=info`, `TRACE=debug`, ...
    Level(Level),
    /// Any other value is an [`EnvFilter`] directive.
    Directive(EnvFilter),
}

impl TraceFilter {
    fn parse(trace_var: &str) -> Result<Self, ParseError> {
        if let Ok(level) = Level::from_str(trace_var) {
            return Ok(TraceFilter::Level(level));
        }
        EnvFilter::builder().with_regex(true).parse(trace_var).map(TraceFilter::Directive)
    }

    fn into_layer(self) -> Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync> {
        match self {
            TraceFilter::Level(level) => tracing_subscriber::filter::Targets::new()
                .with_targets(WEBDIST_TARGETS.map(|target| (target, level)))
                .boxed(),
            TraceFilter::Directive(filter) => filter.boxed(),
        }
    }
}

/// Install a tracing subscriber if the `TRACE` env var is set.
pub fn enable_tracing_by_env() {
    let Ok(trace_var) = std::env::var("TRACE") else {
        return;
    };

    let filter = match TraceFilter::parse(&trace_var) {
        Ok(filter) => filter,
        Err(error) => {
            eprintln!("Ignoring invalid TRACE directive {trace_var:?}: {error}");
            return;
        }
    };

    if !IS_TRACING_ENABLED.swap(true, std::sync::atomic::Ordering::SeqCst) {
        use tracing_subscriber::{fmt, prelude::*};

        tracing_subscriber::registry()
            .with(filter.into_layer())
            .with(fmt::layer().pretty().with_file(true).with_span_events(FmtSpan::CLOSE))
            .init();
        tracing::trace!("enable_tracing_by_env");
    }
}
