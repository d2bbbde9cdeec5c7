use std::{env, process};

use condo_wizard::{cli::run_cli, init};

fn main() {
    init();

    if let Err(err) = run_cli(env::args().skip(1).collect()) {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}
