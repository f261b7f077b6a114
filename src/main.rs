use std::process::ExitCode;

fn main() -> ExitCode {
    match transparency_dashboard::app::run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
