//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `trailsnap_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("trailsnap_core ping={}", trailsnap_core::ping());
    println!("trailsnap_core version={}", trailsnap_core::core_version());
}
