use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = holdem_cli::logging::init_logging() {
        eprintln!("WARNING: logging disabled: {}", e);
    }
    let code = holdem_cli::run(std::env::args(), &mut io::stdout(), &mut io::stderr());
    ExitCode::from(code as u8)
}
