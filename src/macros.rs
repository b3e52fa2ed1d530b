/// Similar to `info!` macro in tracing, which it forwards to.
/// You can pass in the starting time and it will log how long it took from starting time to now
/// as the `runtime` field (seconds).
/// ```
/// use chrono::Local;
/// use serp_tracker::info_time;
///
/// info_time!("str {}, {}", 1, 2);
/// let time = Local::now();
/// info_time!(time, "str {}, {}", 1, 2);
/// ```
#[macro_export]
macro_rules! info_time {
    ($strfm:literal $(,)? $($arg:expr),*) => {{
        ::tracing::info!("{}", format!($strfm, $($arg),*));
    }};
    ($time:expr, $strfm:literal $(,)? $($arg:expr),*) => {{
        let run_time = $crate::elapsed_secs(::chrono::Local::now() - $time);
        ::tracing::info!(runtime = run_time, "{}", format!($strfm, $($arg),*));
    }};
}
