// Entry point: resolve and print the bundler configuration

use rn_bundler_config::cli::CliHandler;
use rn_bundler_config::utils::Logger;

fn main() {
    let handler = CliHandler::new();

    if let Err(e) = handler.run() {
        Logger::error(&e.to_string());
        eprintln!("{}", e.format_detailed());
        std::process::exit(1);
    }
}
