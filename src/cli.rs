use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the OAuth client secrets downloaded from the cloud console
    #[arg(long, default_value = "credentials.json")]
    pub credentials: PathBuf,

    /// Path to the persisted token file (created on first run)
    #[arg(long, default_value = "token.json")]
    pub token: PathBuf,
}
