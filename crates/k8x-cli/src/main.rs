mod cli;

fn main() {
    if let Err(e) = cli::run() {
        // Usage errors have already printed help.
        if e.downcast_ref::<cli::UsageError>().is_some() {
            std::process::exit(255);
        }
        eprintln!("{e:#}"); // pretty anyhow chain
        std::process::exit(1);
    }
}
