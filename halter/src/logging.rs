use std::io::IsTerminal;

use colored::{ColoredString, Colorize};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Writes events as `warning: message key=value` lines.
struct PrefixFormatter;

impl<S, N> FormatEvent<S, N> for PrefixFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let (label, paint): (&str, fn(ColoredString) -> ColoredString) =
            match *event.metadata().level() {
                Level::ERROR => ("error:", |s| s.red().bold()),
                Level::WARN => ("warning:", |s| s.yellow().bold()),
                Level::INFO => ("info:", |s| s.green()),
                Level::DEBUG => ("debug:", |s| s.blue()),
                Level::TRACE => ("trace:", |s| s.dimmed()),
            };

        write!(writer, "{} ", paint(label.into()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over `verbose`.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { "halter=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .event_format(PrefixFormatter)
        .try_init();
}
