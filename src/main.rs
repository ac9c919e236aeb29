use std::process::ExitCode;

fn main() -> ExitCode {
    match mirdoc::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
