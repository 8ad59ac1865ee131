fn main() {
    std::process::exit(llm_structured::cli::run());
}
