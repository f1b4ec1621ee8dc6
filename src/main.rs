fn main() {
    let config_path = std::env::args().nth(1);
    if let Err(e) = oval_kart_lib::run(config_path.as_deref()) {
        eprintln!("oval-kart: {}", e);
        std::process::exit(1);
    }
}
