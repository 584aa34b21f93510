fn main() {
    std::process::exit(typegen_cli::run_cli(std::env::args_os()));
}
