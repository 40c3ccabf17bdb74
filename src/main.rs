fn main() {
    sigparse::runner::run_main(sigparse::cli::run)
}
