use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()));
    let Ok(out_dir) = env::var("OUT_DIR") else {
        println!("cargo:warning=OUT_DIR not set, header generation skipped");
        return;
    };
    let out = PathBuf::from(out_dir).join("bookshare.h");

    let generated = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("BOOKSHARE_H")
        .generate();

    match generated {
        Ok(bindings) => {
            bindings.write_to_file(&out);
            if !out.exists() {
                println!("cargo:warning=failed to write {}", out.display());
            }
        }
        Err(e) => println!("cargo:warning=header generation skipped: {e}"),
    }
}
