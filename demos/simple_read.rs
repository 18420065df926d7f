//! Example: Reading tags through the facade
//!
//! Run with: cargo run --example simple_read
//!
//! This example demonstrates:
//! - Reading variables of every supported declared type
//! - How decode dispatch follows the declared type
//! - How validation, type and protocol failures surface

use eip_tags::{SimPlc, TagAccess, TagAddress, TagType, TagValue};

fn main() -> eip_tags::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    // =========================================================================
    // Set up a simulated controller
    // =========================================================================

    // A real deployment implements TagChannel/TagChannelFactory over a native
    // tag library; the simulator stands in for it here.
    let plc = SimPlc::new();
    plc.preload("Machine.Running", &TagValue::Bool(true));
    plc.preload("Machine.Offset", &TagValue::Int(-150));
    plc.preload("Machine.Cycles", &TagValue::Uint(40000));
    plc.preload("Machine.Speed", &TagValue::Real(12.5));
    plc.preload("Machine.Position", &TagValue::Lreal(1234.56789));
    plc.preload("Machine.Recipe", &TagValue::String("PRODUCT-001".to_string()));

    let access = TagAccess::new(plc.clone());

    // =========================================================================
    // Reading Typed Variables
    // =========================================================================

    println!("=== Reading Typed Variables ===\n");

    let gateway = "192.168.250.1";
    let tags = [
        ("Machine.Running", TagType::Bool),
        ("Machine.Offset", TagType::Int),
        ("Machine.Cycles", TagType::Uint),
        ("Machine.Speed", TagType::Real),
        ("Machine.Position", TagType::Lreal),
        ("Machine.Recipe", TagType::String),
    ];
    for (name, declared) in tags {
        let addr = TagAddress::new(name, gateway);
        let value = access.read_variable(&addr, declared)?;
        println!("{addr} ({declared}) = {value}");
    }

    // =========================================================================
    // Declared Types Come From Operator Input
    // =========================================================================

    println!("\n=== Parsing Declared Types ===\n");

    // The UI hands over a type name as text; unknown names fail hard.
    let declared: TagType = "REAL".parse()?;
    let addr = TagAddress::new("Machine.Speed", gateway);
    println!(
        "Machine.Speed as {declared} = {}",
        access.read_variable(&addr, declared)?
    );

    match "DWORD".parse::<TagType>() {
        Err(err) => println!("DWORD rejected: {err}"),
        Ok(_) => unreachable!(),
    }

    // =========================================================================
    // Failure Modes
    // =========================================================================

    println!("\n=== Failure Modes ===\n");

    // Empty variable name: rejected before any connection is opened.
    let bad = TagAddress::new("", gateway);
    if let Err(err) = access.read_variable(&bad, TagType::Real) {
        println!("validation: {err}");
    }

    // Undefined tag: surfaces as a protocol error from the controller.
    let missing = TagAddress::new("Machine.DoesNotExist", gateway);
    if let Err(err) = access.read_variable(&missing, TagType::Int) {
        println!("protocol:   {err}");
    }

    // Unreachable gateway: surfaces as a connection error.
    plc.fail_connect(true);
    let addr = TagAddress::new("Machine.Speed", gateway);
    if let Err(err) = access.read_variable(&addr, TagType::Real) {
        println!("connection: {err}");
    }
    plc.fail_connect(false);

    println!("\nRead example completed!");
    Ok(())
}
