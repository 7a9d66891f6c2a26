use log::LevelFilter;

/// Installs the process-wide logger. `RUST_LOG` overrides the default level.
pub fn init_logging() {
    env_logger::builder()
        .format_target(false)
        .format_timestamp_secs()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init()
}

#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(LevelFilter::Debug)
        .try_init();
}
