use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "tracker", version, about = "Terminal client for the accountability tracker")]
pub struct Cli {
    /// Backend origin, e.g. http://127.0.0.1:8000. Overrides config and env.
    #[arg(long = "backend-url", value_name = "URL")]
    pub backend_url: Option<String>,

    /// Tracker home directory (config, auth, logs). Defaults to ~/.tracker.
    #[arg(long = "home", value_name = "DIR")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Store the shared app password used for the x-app-password header.
    SetPassword {
        #[arg(value_name = "PASSWORD")]
        password: String,
    },

    /// Wipe all user-entered data on the backend. Requires --confirm RESET.
    Reset {
        #[arg(long, value_name = "PHRASE")]
        confirm: String,
    },
}
