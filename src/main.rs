use anyhow::Result;
use clap::Parser;

use tftclock::{app::App, cli::Cli};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    App::new(cli)?.run()
}
