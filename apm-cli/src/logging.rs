//! Log backend setup. All user-facing output goes through `log`, so the
//! default format is the bare message.

use std::io::Write;

use log::LevelFilter;

pub(crate) fn init_logging(quiet: bool, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .target(env_logger::Target::Stdout);

    if verbose {
        builder.format_timestamp_secs().format_module_path(true);
    } else {
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    }

    // RUST_LOG still wins over the flags.
    builder.parse_default_env();
    builder.init();
}

/// Print an empty line through the logger.
pub(crate) fn log_blank() {
    log::info!("");
}
