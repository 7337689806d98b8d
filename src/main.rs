//! stochsim CLI

fn main() {
    if let Err(e) = stochsim::cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
