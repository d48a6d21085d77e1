fn main() {
    // Only the device build needs the ESP-IDF environment; host builds and
    // tests run without the toolchain.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
