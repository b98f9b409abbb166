//! HRT CLI - Command line tool for loading reservoir telemetry windows.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "hrt-cli",
    version,
    about = "Hunan reservoir telemetry toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: hrt_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    hrt_cmd::run(cli.command).await
}
