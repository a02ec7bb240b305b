// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, build the client, hand off to `ui::run`.
// - Usage errors exit with status 2 before any configuration is read.

use anyhow::Context;
use cad4tb_results::cli::{self, Command};
use cad4tb_results::{logging, ui, ApiClient, ClientConfig};

fn main() -> anyhow::Result<()> {
    let args = match cli::parse_args(std::env::args().skip(1)) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            println!("{}\n\n{}", cli::USAGE, cli::HELP);
            return Ok(());
        }
        Ok(Command::Version) => {
            println!("cad4tb-results {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Err(e) => {
            eprintln!("{}", cli::USAGE);
            eprintln!("cad4tb-results: error: {}", e);
            std::process::exit(2);
        }
    };

    logging::init_tracing();

    // BOX_IP and TOKEN come from the environment or a `.env` file.
    let config = ClientConfig::from_env().context("Invalid configuration")?;
    let api = ApiClient::new(&config).context("Failed to build API client")?;

    let stdout = std::io::stdout();
    ui::run(&api, &args, &mut stdout.lock())
}
