use std::net::IpAddr;

use clap::{Args, Parser, Subcommand};
use lingo_utils::args::{learning::LearningArgs, llm::LlmArgs};
use url::Url;

#[derive(Debug, Parser)]
#[command(name = "lingo", about = "Run the adaptive English-learning backend")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    Run(Run),
}

#[derive(Debug, Clone, Args)]
#[group(multiple = true, required = false)]
pub(crate) struct Db {
    #[arg(long, help = "Min connections")]
    pub(crate) db_min_connections: Option<u32>,

    #[arg(long, help = "Max connections")]
    pub(crate) db_max_connections: Option<u32>,
}

#[derive(Debug, Clone, Parser)]
pub(crate) struct Run {
    #[arg(long)]
    pub(crate) host: Option<IpAddr>,

    #[arg(short, long)]
    pub(crate) port: Option<u16>,

    #[arg(
        long,
        env = "STORE_URI",
        default_value = "sqlite://lingo.db?mode=rwc",
        help = "Document store connection string"
    )]
    pub(crate) store_uri: Url,

    #[command(flatten)]
    pub(crate) llm: LlmArgs,

    #[command(flatten)]
    pub(crate) learning: LearningArgs,

    #[arg(
        long,
        env = "SIGNING_SECRET",
        default_value = "insecure-dev-secret",
        hide_env_values = true,
        help = "Server-wide pepper mixed into password hashes"
    )]
    pub(crate) signing_secret: String,

    #[arg(long, value_delimiter = ',', help = "Allowed CORS origins")]
    pub(crate) origins: Vec<String>,

    #[arg(long, default_value = "dev", help = "Deployment environment label")]
    pub(crate) env: String,

    #[command(flatten)]
    pub(crate) db: Db,
}
