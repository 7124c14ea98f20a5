fn main() {
    // include_dir! embeds frontend/dist, which cargo does not track on its own
    println!("cargo:rerun-if-changed=frontend/dist");
}
