// Copied and edited based on https://github.com/estk/log4rs/pull/295

use std::path::Path;

use anyhow::Context;
use log::{warn, LevelFilter};
use log4rs::Handle;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            policy::compound::{
                roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy,
            },
            RollingFileAppender,
        },
    },
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} - {m}{n}";

/// Logs to stdout and, if `log_dir` is set, to a size rolled file in that folder.
///
/// A log file that can't be opened does not stop stdout logging, the problem
/// is reported as a warning once logging is up.
pub fn init_logging(level: LevelFilter, log_dir: Option<&Path>) -> anyhow::Result<Handle> {
    let (config, file_error) = build_config(level, log_dir)?;

    // Use this to change log levels at runtime.
    let handle = log4rs::init_config(config).context("Failed to init_config")?;

    if let Some(e) = file_error {
        warn!("Logging to stdout only. {e:?}");
    }
    Ok(handle)
}

fn build_config(
    level: LevelFilter,
    log_dir: Option<&Path>,
) -> anyhow::Result<(Config, Option<anyhow::Error>)> {
    let stdout = ConsoleAppender::builder()
        .target(Target::Stdout)
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();

    let mut config = Config::builder().appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(level)))
            .build("stdout", Box::new(stdout)),
    );
    let mut root = Root::builder().appender("stdout");

    let file_error = match log_dir.map(file_appender) {
        Some(Ok(log_file)) => {
            config = config.appender(Appender::builder().build("log_file", Box::new(log_file)));
            root = root.appender("log_file");
            None
        }
        Some(Err(e)) => Some(e),
        None => None,
    };

    let config = config
        .build(root.build(level))
        .context("Failed to configure logging")?;
    Ok((config, file_error))
}

fn file_appender(log_dir: &Path) -> anyhow::Result<RollingFileAppender> {
    let file_path = log_dir.join("age_mon.log");
    // Pattern: https://docs.rs/log4rs/*/log4rs/append/rolling_file/policy/compound/roll/fixed_window/struct.FixedWindowRollerBuilder.html#method.build
    let archive_pattern = log_dir.join("age_mon_{}.log");

    let trigger = SizeTrigger::new(2_097_152); // 2mb (2 * 1024 * 1024)
    let roller = FixedWindowRoller::builder()
        .build(&archive_pattern.to_string_lossy(), 5)
        .context("Failed to create FixedWindowRoller")?;
    let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));

    RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(&file_path, Box::new(policy))
        .with_context(|| format!("Failed to open log file {file_path:?}"))
}
