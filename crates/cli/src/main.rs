use std::process::ExitCode;

fn main() -> ExitCode {
    feedtune_cli::run()
}
