/// Similar to `info!` macro in `log`.
/// You can pass in the starting time and it will log how long it took from starting time to now.
/// ```
/// use chrono::Local;
/// use rnc::info_time;
///
/// info_time!("str {}, {}", 1, 2);
/// let time = Local::now();
/// info_time!(time, "str {}, {}", 1, 2);
/// ```
#[macro_export]
macro_rules! info_time {
    ($strfm:literal $(,)? $($arg:expr),*) => {{
        ::log::info!("{}", format!($strfm, $($arg),*));
    }};
    ($time:expr, $strfm:literal $(,)? $($arg:expr),*) => {{
        let run_time = $crate::logging::elapsed_secs($time);
        ::log::info!("{} | RUNTIME: {:.3} sec", format!($strfm, $($arg),*), run_time);
    }};
}

/// Same as [`info_time!`] on the debug level.
#[macro_export]
macro_rules! debug_time {
    ($strfm:literal $(,)? $($arg:expr),*) => {{
        ::log::debug!("{}", format!($strfm, $($arg),*));
    }};
    ($time:expr, $strfm:literal $(,)? $($arg:expr),*) => {{
        let run_time = $crate::logging::elapsed_secs($time);
        ::log::debug!("{} | RUNTIME: {:.3} sec", format!($strfm, $($arg),*), run_time);
    }};
}

/// Logs through a [`LogContext`](crate::logging::LogContext): its target, prefixed with its label.
/// ```
/// use rnc::{ctx_log, logging::LogContext};
///
/// let ctx = LogContext::new("rnc::demo", "lex1=дом");
/// ctx_log!(ctx, log::Level::Debug, "page {} done", 3);
/// ```
#[macro_export]
macro_rules! ctx_log {
    ($ctx:expr, $lvl:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        ::log::log!(target: ctx.target(), $lvl, "[{}] {}", ctx.label(), format_args!($($arg)+));
    }};
}
