//! Default logging setup for the dynhash command line tools.
//!
//! Log records go to stderr, so they never mix with the command output on stdout. Each record is
//! prefixed with the time since [`setup`] was called, and whenever the module emitting records
//! changes, a line naming the new module is written first.
#![warn(missing_docs)]

use std::sync::Mutex;

use quanta::Instant;

/// Environment variable holding the `env_logger` filter, `info` if unset.
pub const LOG_ENV: &str = "DYNHASH_LOG";

/// Environment variable selecting whether to style the output (`auto`, `always` or `never`).
pub const LOG_STYLE_ENV: &str = "DYNHASH_LOG_STYLE";

const TIMESTAMP_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::BrightBlack)));

const TARGET_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Magenta)));

/// Remembers the target of the previous record.
#[derive(Default)]
struct LastTarget(Mutex<String>);

impl LastTarget {
    /// Records `target`, returning `true` if it differs from the previous one.
    fn update(&self, target: &str) -> bool {
        let mut last = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if *last == target {
            return false;
        }
        last.clear();
        last.push_str(target);
        true
    }
}

/// Drops the crate prefix of our own targets, `dynhash_tables::cuckoo` becomes `cuckoo`.
fn short_target(target: &str) -> &str {
    match target.split_once("::") {
        Some((krate, module)) if krate.starts_with("dynhash_") => module,
        _ => target,
    }
}

/// Installs the default logger, filtered by [`LOG_ENV`] and styled according to [`LOG_STYLE_ENV`].
///
/// # Panics
/// Panics if a logger has already been installed.
pub fn setup() {
    let start_time = Instant::now();
    let last_target = LastTarget::default();

    env_logger::Builder::from_env(
        env_logger::Env::new()
            .filter_or(LOG_ENV, "info")
            .write_style(LOG_STYLE_ENV),
    )
    .format(move |buf, record| {
        use std::io::Write;

        let timestamp = start_time.elapsed();
        let level = record.level();
        let target = record.target();

        if last_target.update(target) {
            writeln!(
                buf,
                "{} {}",
                format_args!("{style}{timestamp:>9.2?}{style:#}", style = TIMESTAMP_STYLE),
                format_args!(
                    "{style}{}{style:#}",
                    short_target(target),
                    style = TARGET_STYLE
                )
            )?;
        }
        writeln!(
            buf,
            "{} {} {}",
            format_args!("{style}{timestamp:>9.2?}{style:#}", style = TIMESTAMP_STYLE),
            format_args!(
                "{style}{level:5}{style:#}",
                style = buf.default_level_style(level),
            ),
            record.args(),
        )
    })
    .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_only_on_target_change() {
        let last_target = LastTarget::default();
        assert!(last_target.update("dynhash_tables::cuckoo"));
        assert!(!last_target.update("dynhash_tables::cuckoo"));
        assert!(last_target.update("dynhash_tables::directory"));
        assert!(last_target.update("dynhash_tables::cuckoo"));
    }

    #[test]
    fn own_targets_are_shortened() {
        assert_eq!(short_target("dynhash_tables::directory"), "directory");
        assert_eq!(short_target("dynhash_tables::table::test"), "table::test");
        assert_eq!(short_target("dynhash"), "dynhash");
        assert_eq!(short_target("other_crate::module"), "other_crate::module");
    }
}
