fn main() {
    if let Err(err) = chorus_calendar::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
