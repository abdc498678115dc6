//! Term + file logging, lifted from the teacher's `lib.rs::init()`.

use simplelog::ColorChoice;
use simplelog::CombinedLogger;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;
use std::fs::File;
use std::fs::create_dir_all;

/// Initialize a combined terminal (Info) + file (Debug) logger. Safe to
/// call more than once; later calls are no-ops once a logger is installed.
pub fn init() {
    let _ = create_dir_all("logs");
    let path = format!("logs/starturn-{}.log", std::process::id());
    let file = File::create(&path).ok();
    let term = TermLogger::new(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
    match file {
        Some(file) => {
            let write = WriteLogger::new(LevelFilter::Debug, Config::default(), file);
            let _ = CombinedLogger::init(vec![term, write]);
        }
        None => {
            let _ = CombinedLogger::init(vec![term]);
        }
    }
}
