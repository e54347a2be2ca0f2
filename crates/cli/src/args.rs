//! Flags shared by every routeplay command

use clap::Args;
use routeplay_core::config::Config;
use std::path::PathBuf;

/// Global options
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Configuration file (defaults to .routeplay.toml or the user config dir)
    #[arg(long, short = 'c', global = true, env = "ROUTEPLAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Load the configuration these flags point at
    pub fn load_config(&self) -> routeplay_core::Result<Config> {
        Config::load(self.config.as_deref())
    }

    /// Log filter to use, given the configured default
    pub fn log_level<'a>(&self, configured: &'a str) -> &'a str {
        if self.verbose { "debug" } else { configured }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        global: GlobalArgs,
    }

    #[test]
    fn test_verbose_overrides_level() {
        let cli = TestCli::parse_from(["test", "--verbose"]);
        assert_eq!(cli.global.log_level("warn"), "debug");

        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.global.log_level("warn"), "warn");
    }

    #[test]
    fn test_load_config_from_flag() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[playback]\nwarmup_frames = 9\n").unwrap();

        let path = file.path().to_str().unwrap();
        let cli = TestCli::parse_from(["test", "--config", path]);
        let config = cli.global.load_config().unwrap();
        assert_eq!(config.schema.playback.warmup_frames, 9);
    }
}
