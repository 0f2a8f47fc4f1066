//! log4rs setup.

use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

const CONSOLE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l:5})} {m}{n}";

/// Load `config_file`, falling back to an info level console logger when the
/// file is missing or invalid.
pub fn init(config_file: &str) {
    if let Err(e) = log4rs::init_file(config_file, Default::default()) {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
            .build();
        let config = Config::builder()
            .appender(Appender::builder().build("stdout", Box::new(stdout)))
            .build(Root::builder().appender("stdout").build(LevelFilter::Info));
        match config {
            Ok(config) => {
                if log4rs::init_config(config).is_ok() {
                    log::warn!("Using console logging, could not load {config_file}: {e}");
                }
            }
            Err(err) => eprintln!("Error initializing log4rs: {err}"),
        }
    }
}
