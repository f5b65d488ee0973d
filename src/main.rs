use std::process::ExitCode;

fn main() -> ExitCode {
    match brian_api_test::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
