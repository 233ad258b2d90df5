use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    fmfolds::cli::run_cli(std::env::args().skip(1))
}
