fn main() {
    slint_build::compile("ui/app.slint").expect("slint UI failed to compile");
}
