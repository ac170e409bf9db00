use std::process;

fn main() {
    if let Err(e) = udbg::cli::run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
