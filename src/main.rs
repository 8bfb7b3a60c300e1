fn main() {
    let args: Vec<String> = std::env::args().collect();
    if let Err(err) = blockguard::run(&args) {
        eprintln!("blockguard: {}", err);
        std::process::exit(1);
    }
}
