use std::process::ExitCode;

fn main() -> ExitCode {
    match workshop_pulse_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
