fn main() {
    if let Err(e) = script_address_parser::cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
