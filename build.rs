fn main() {
    println!("cargo:rerun-if-changed=config/machine.json");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
