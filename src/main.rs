//! rvolunteer main entrypoint.

use rvolunteer::{init_tracing, run};

fn main() {
    init_tracing();
    println!();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
