fn main() {
    if let Err(e) = ollama_chat::cli::main() {
        eprintln!("❌ Error: {e}");
        std::process::exit(1);
    }
}
