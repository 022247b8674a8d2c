//! Logging setup using the `log` facade and `env_logger`
//!
//! The level comes from `RUST_LOG` when set, otherwise from the CLI flags:
//! `--quiet` keeps errors only, each `-v` raises the level one step above
//! the default of `warn`.

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize logging from CLI verbosity flags
///
/// Must be called at most once per process.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    if env::var_os("RUST_LOG").is_some() {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    builder.format(|buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
    });

    builder.init();
    log::debug!("logging initialized at {:?}", log::max_level());
}

fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determine_level() {
        assert_eq!(determine_level(0, false), LevelFilter::Warn);
        assert_eq!(determine_level(1, false), LevelFilter::Info);
        assert_eq!(determine_level(2, false), LevelFilter::Debug);
        assert_eq!(determine_level(5, false), LevelFilter::Trace);
    }

    #[test]
    fn test_quiet_overrides_verbose() {
        assert_eq!(determine_level(3, true), LevelFilter::Error);
    }
}
