mod cli;

fn main() {
    env_logger::Builder::from_default_env().init();

    if let Err(err) = cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
