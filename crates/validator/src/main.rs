fn main() -> std::process::ExitCode {
    validator::start(std::env::args())
}
