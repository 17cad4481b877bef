use log::LevelFilter;

/// Environment variable that can refine the filter set by `--verbosity`,
/// e.g. `RESUME_FORGE_LOG=reqwest=debug`.
pub const LOG_ENV: &str = "RESUME_FORGE_LOG";

pub struct Logger;

impl Logger {
    pub fn init(level: LevelFilter) {
        let mut builder = colog::default_builder();
        builder.filter_level(level);
        builder.parse_env(env_logger::Env::new().filter(LOG_ENV));
        builder.init();
    }
}
