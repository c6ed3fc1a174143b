use std::process::ExitCode;

fn main() -> ExitCode {
    rentora_cli::run()
}
