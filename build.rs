//! Build script selecting the dot-product backend.
//!
//! Exactly one `dsp_backend` cfg value is emitted. A SIMD feature whose target
//! features are not enabled for this compilation falls back to the portable
//! unrolled kernels.

use std::env;

fn main() {
    println!(
        "cargo:rustc-check-cfg=cfg(dsp_backend, values(\"scalar\", \"unrolled\", \"avx2\", \"neon\"))"
    );
    println!("cargo:rerun-if-changed=build.rs");

    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let target_features = env::var("CARGO_CFG_TARGET_FEATURE").unwrap_or_default();
    let has_feature = |name: &str| target_features.split(',').any(|f| f == name);
    let enabled = |feature: &str| env::var_os(format!("CARGO_FEATURE_{feature}")).is_some();

    let mut backend = if enabled("REFERENCE") {
        "scalar"
    } else {
        "unrolled"
    };

    if enabled("SIMD_AVX2") {
        if arch == "x86_64" && has_feature("avx2") && has_feature("fma") {
            backend = "avx2";
        } else {
            println!(
                "cargo:warning=simd-avx2 requested but target lacks avx2+fma (try RUSTFLAGS=\"-C target-cpu=native\"). Using {backend} kernels."
            );
        }
    }

    if enabled("SIMD_NEON") && backend != "avx2" {
        if arch == "aarch64" && has_feature("neon") {
            backend = "neon";
        } else {
            println!(
                "cargo:warning=simd-neon requested but target is not aarch64+neon. Using {backend} kernels."
            );
        }
    }

    println!("cargo:rustc-cfg=dsp_backend=\"{backend}\"");
    println!("cargo:rustc-env=PHASTDSP_BACKEND={backend}");
}
