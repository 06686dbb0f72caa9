//! Binary entry point. All logic lives in the library so the integration
//! tests can drive the same pipeline through `assert_cmd`.

fn main() {
    if let Err(err) = blog_header::entry() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
