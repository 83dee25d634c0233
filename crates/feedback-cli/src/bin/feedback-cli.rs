fn main() {
    let code = feedback_cli::run_from_env();
    std::process::exit(code);
}
