//! Env-var-gated tracing, no external logging crate.
//!
//! Grounded in the teacher's `trace_enabled()` / `eprintln!("[TRACE] ...")`
//! pattern (`src/simplification/engine.rs`): this crate has no `log` or
//! `tracing` dependency, so driver and graph closures gate their one-line
//! progress messages behind [`env_trace_enabled`] (the `OSRR_TRACE`
//! environment variable) or an explicit [`crate::config::DriverConfig`].

/// Whether the `OSRR_TRACE` environment variable requests tracing.
#[must_use]
pub fn env_trace_enabled() -> bool {
    std::env::var("OSRR_TRACE")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Prints a trace line to stderr if `$cond` is true.
///
/// # Examples
/// ```ignore
/// diagnostics::trace!(config.trace_enabled(), "merged vertex {i} into {j}");
/// ```
macro_rules! trace {
    ($cond:expr, $($arg:tt)*) => {
        if $cond {
            #[expect(clippy::print_stderr, reason = "gated diagnostic trace, mirrors teacher's eprintln! tracing")]
            {
                eprintln!("[osrr] {}", format_args!($($arg)*));
            }
        }
    };
}

pub(crate) use trace;
