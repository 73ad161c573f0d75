#[derive(clap::Args, Debug, Clone)]
#[group()]
pub struct LoggingArgs {
    /// Enable debug mode.
    #[arg(long, default_value_t = false)]
    debug: bool,
}

impl LoggingArgs {
    pub fn init(&self) {
        init_logging(self.debug);
    }
}

/// Initialise the process-wide logger.
///
/// In debug mode the filter is taken from `RUST_LOG`, falling back to
/// `debug`; otherwise everything at `info` and above is shown, except for
/// the HTTP stack which only reports warnings.
pub fn init_logging(debug_mode: bool) {
    if debug_mode {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
            .init();
    } else {
        env_logger::builder()
            .filter(None, log::LevelFilter::Info)
            .filter(Some("hyper"), log::LevelFilter::Warn)
            .filter(Some("reqwest"), log::LevelFilter::Warn)
            .format_target(false)
            .init();
    }
}
