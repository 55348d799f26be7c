#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = hanoi::run_from_env() {
        eprintln!("hanoi: {error}");
        std::process::exit(error.exit_code());
    }
}
