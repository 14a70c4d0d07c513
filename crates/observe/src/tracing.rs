use {
    crate::{Config, panic_hook},
    std::io::IsTerminal,
    time::macros::format_description,
    tracing_subscriber::{
        EnvFilter,
        Layer,
        fmt::{time::UtcTime, writer::MakeWriterExt as _},
        prelude::*,
        util::SubscriberInitExt,
    },
};

/// Initializes the tracing setup shared by the binaries of this workspace.
/// `env_filter` has similar syntax to env_logger. It is documented at
/// https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
pub fn initialize(config: &Config) {
    set_tracing_subscriber(config);
    panic_hook::install();
}

fn set_tracing_subscriber(config: &Config) {
    // Events at or above the threshold go to stderr, the rest to stdout.
    let writer = std::io::stderr
        .with_max_level(config.stderr_level())
        .or_else(std::io::stdout);
    let timer = UtcTime::new(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    ));
    let env_filter = EnvFilter::new(config.env_filter());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_timer(timer);
    let fmt_layer = if config.use_json_format {
        fmt_layer.json().with_filter(env_filter).boxed()
    } else {
        fmt_layer
            .with_ansi(std::io::stdout().is_terminal())
            .with_filter(env_filter)
            .boxed()
    };

    tracing_subscriber::registry().with(fmt_layer).init();
    tracing::debug!(
        filter = config.env_filter(),
        json = config.use_json_format,
        "initialized tracing"
    );
}
