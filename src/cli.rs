use clap::{Parser, Subcommand};

use crate::builder::BuildRequest;

#[derive(Parser)]
#[command(version, about = "Translate proxy subscription links into sing-box outbounds", long_about = None)]
pub struct Args {
    #[arg(short, long, global = true, help = "Emit debug log")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a subscription and print the outbounds as a JSON array
    Parse {
        #[arg(help = "Subscription, accept file path or URL")]
        source: String,

        #[arg(long, default_value_t = 30, help = "Fetch timeout in seconds")]
        timeout: u64,
    },

    /// Build a single outbound from explicit parameters
    Build {
        #[command(subcommand)]
        request: BuildRequest,
    },

    /// Fetch every configured subscription and write the engine config
    Generate {
        #[arg(short = 'c', long, help = "Settings file, accept file path or URL")]
        settings: String,

        #[arg(short, long, help = "Config output path, overrides the settings file")]
        output: Option<String>,
    },

    /// Generate the engine config and run the engine until Ctrl-C
    Run {
        #[arg(short = 'c', long, help = "Settings file, accept file path or URL")]
        settings: String,
    },
}
