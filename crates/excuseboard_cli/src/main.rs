//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `excuseboard_core` linkage and
//!   schema bootstrap.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("excuseboard_core version={}", excuseboard_core::core_version());
    match excuseboard_core::db::open_db_in_memory() {
        Ok(_) => println!(
            "schema ok latest_version={}",
            excuseboard_core::db::migrations::latest_version()
        ),
        Err(err) => {
            eprintln!("schema bootstrap failed: {err}");
            std::process::exit(1);
        }
    }
}
