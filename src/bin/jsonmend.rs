fn main() {
    std::process::exit(jsonmend::cli::run());
}
