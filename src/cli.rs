use clap::Parser;
use std::path::PathBuf;

/// Agent Playground - configure an agent and chat with it from the browser
#[derive(Parser, Debug, Clone)]
#[command(name = "agent-playground", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "PLAYGROUND_CONFIG", default_value = "playground.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "PLAYGROUND_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "PLAYGROUND_PORT")]
    pub port: Option<u16>,

    /// Directory of the built web UI
    #[arg(long, env = "PLAYGROUND_UI_DIR")]
    pub ui_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["agent-playground"]);
        assert_eq!(cli.config, PathBuf::from("playground.toml"));
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert!(cli.ui_dir.is_none());
    }

    #[test]
    fn test_cli_with_args() {
        let cli = Cli::parse_from([
            "agent-playground",
            "--config",
            "custom.toml",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--ui-dir",
            "site",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.host, Some("0.0.0.0".to_string()));
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.ui_dir, Some(PathBuf::from("site")));
    }
}
