fn main() {
    // ESP-IDF link/env wiring — only needed when building for the target.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
