fn main() {
    lintphase::app::cli::run();
}
