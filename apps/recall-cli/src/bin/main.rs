use clap::Parser;

use recall_cli::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    recall_cli::logging::init(cli.verbose);
    let mut stdout = std::io::stdout().lock();
    recall_cli::run(cli, &mut stdout)
}
