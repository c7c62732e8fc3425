use pinfetch_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse_args();
    let target = logging::init(cli.verbose);
    tracing::debug!(?target, "logging ready");

    if let Err(err) = cli.run() {
        eprintln!("pinfetch error: {:#}", err);
        std::process::exit(1);
    }
}
