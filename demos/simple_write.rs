//! Example: Writing tags through the facade
//!
//! Run with: cargo run --example simple_write
//!
//! This example demonstrates:
//! - Writing operator input for every supported declared type
//! - Parse failures reported before any network I/O
//! - Overlapping writes serializing instead of interleaving

use std::sync::Arc;
use std::thread;

use eip_tags::{SimPlc, TagAccess, TagAddress, TagType};

fn main() -> eip_tags::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let plc = SimPlc::new();
    let access = TagAccess::new(plc.clone());
    let gateway = "192.168.250.1";

    // =========================================================================
    // Writing Typed Variables
    // =========================================================================

    println!("=== Writing Typed Variables ===\n");

    // The value arrives as operator-typed text; the declared type decides
    // how it is parsed and encoded.
    let writes = [
        ("Machine.Running", TagType::Bool, "true"),
        ("Machine.Offset", TagType::Int, "-150"),
        ("Machine.Cycles", TagType::Uint, "40000"),
        ("Machine.Speed", TagType::Real, "12.5"),
        ("Machine.Position", TagType::Lreal, "1234.56789"),
        ("Machine.Recipe", TagType::String, "PRODUCT-001"),
    ];
    for (name, declared, raw) in writes {
        let addr = TagAddress::new(name, gateway);
        access.write_variable(&addr, declared, raw)?;
        println!("wrote {raw:>12} as {declared} to {addr}");
    }

    // Read one back to confirm the round trip.
    let addr = TagAddress::new("Machine.Speed", gateway);
    println!(
        "\nreadback: Machine.Speed = {}",
        access.read_variable(&addr, TagType::Real)?
    );

    // =========================================================================
    // Parse Failures Never Touch the Network
    // =========================================================================

    println!("\n=== Parse Failures ===\n");

    plc.clear_journal();
    let addr = TagAddress::new("Machine.Offset", gateway);
    for raw in ["twelve", "1e99", "32768"] {
        if let Err(err) = access.write_variable(&addr, TagType::Int, raw) {
            println!("rejected: {err}");
        }
    }
    println!("channel events during rejects: {}", plc.journal().len());

    // =========================================================================
    // Overlapping Writes Serialize
    // =========================================================================

    println!("\n=== Overlapping Writes ===\n");

    plc.clear_journal();
    let access = Arc::new(access);
    let mut handles = Vec::new();
    for name in ["Line.A", "Line.B"] {
        let access = Arc::clone(&access);
        handles.push(thread::spawn(move || {
            let addr = TagAddress::new(name, "192.168.250.1");
            for i in 0..3 {
                access
                    .write_variable(&addr, TagType::Int, &i.to_string())
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    for event in plc.journal() {
        println!("{event}");
    }

    println!("\nWrite example completed!");
    Ok(())
}
