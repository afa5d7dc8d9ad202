fn main() {
    // ESP-IDF link metadata is only meaningful when cross-compiling for the
    // target; host builds (tests) skip it entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
