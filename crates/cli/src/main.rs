fn main() {
    if let Err(err) = codehealth_cli::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
