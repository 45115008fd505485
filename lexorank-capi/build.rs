fn main() {
    #[cfg(not(debug_assertions))]
    {
        let major = std::env::var("CARGO_PKG_VERSION_MAJOR").unwrap_or_default();
        let soversion = if major == "0" {
            format!(
                "0.{}",
                std::env::var("CARGO_PKG_VERSION_MINOR").unwrap_or_default()
            )
        } else {
            major
        };

        // Add soname and strip symbols in release builds
        println!(
            "cargo:rustc-cdylib-link-arg=-Wl,-soname,liblexorank.so.{},-s",
            soversion
        );
    }
}
