//! CLI definitions for the FORGOR companion.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// FORGOR companion CLI.
#[derive(Parser)]
#[command(name = "forgor")]
#[command(about = "Companion core for the FORGOR browser extension")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.forgor/config.toml)
    #[arg(short, long, env = "FORGOR_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Serve the browser shell over stdin/stdout (default)
    Run,

    /// Sign in and store the token pair
    Login {
        username: String,

        #[arg(long, env = "FORGOR_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account, then sign in
    Register {
        username: String,

        #[arg(long, env = "FORGOR_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Drop the stored tokens
    Logout,

    /// Show the account tier and remaining saves
    Tier,

    /// Ask whether anything saved is relevant to a search text
    Query {
        /// Search text, e.g. "Page title example.com"
        text: String,
    },

    /// Save an image: a local file, an image URL or a data URL
    Upload {
        source: String,

        /// URL of the page the image came from
        #[arg(long, default_value = "")]
        page_url: String,

        /// Title of the page the image came from
        #[arg(long, default_value = "")]
        page_title: String,
    },

    /// Find saved content similar to a local screenshot
    Similar {
        image: PathBuf,

        #[arg(long, default_value = "")]
        page_url: String,

        #[arg(long, default_value = "")]
        page_title: String,
    },

    /// Delete a saved file
    Delete { file_name: String },

    /// Download a saved file or its thumbnail
    Fetch {
        name: String,

        /// Output path
        #[arg(short, long)]
        output: PathBuf,

        /// Fetch the thumbnail instead of the full file
        #[arg(long)]
        thumbnail: bool,
    },

    /// Validate the configuration file
    CheckConfig,
}
