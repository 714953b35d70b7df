use vergen::EmitBuilder;

fn main() {
    println!("cargo::rustc-check-cfg=cfg(has_git_describe)");
    if EmitBuilder::builder()
        .fail_on_error()
        .git_describe(true, true, None)
        .emit()
        .is_ok()
    {
        println!("cargo:rustc-cfg=has_git_describe");
    }
}
