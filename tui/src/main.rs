use clap::Parser;
use tracker_tui::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracker_tui::run_main(cli)
}
