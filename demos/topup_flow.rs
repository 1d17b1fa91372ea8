//! End-to-end walk through a purchase request.
//!
//! Demonstrates:
//! - Loading settings and sharing them through a `SingletonRegistry`
//! - One `AuditLogger` per logs directory
//! - Dispatching prefix-collected handlers
//! - Writing purchase audit lines
//!
//! Run with: `cargo run --example topup_flow`

use std::fs;

use topup_toolkit::logging::init_logging;
use topup_toolkit::method_collector::{ClassDescriptor, Member, RegistersMethods};
use topup_toolkit::{
    register_methods, AuditLogger, PurchaseRecord, RegistryApi, Settings, SingletonRegistry,
};

type Step = fn(&mut PurchaseRecord);

fn check_balance(record: &mut PurchaseRecord) {
    println!("   checking balance for {}", record.mobile);
}

fn charge(record: &mut PurchaseRecord) {
    record.status = 1;
    record.result_code = "0".to_string();
}

static PURCHASE_FLOW: ClassDescriptor<Step> = ClassDescriptor {
    name: "PurchaseFlow",
    members: &[
        Member::method("step_check_balance", check_balance),
        Member::method("step_charge", charge),
    ],
    bases: &[],
};

struct PurchaseFlow;

register_methods!(
    PurchaseFlow,
    Step,
    collection: "steps",
    prefix: "step_",
    descriptor: PURCHASE_FLOW
);

fn main() -> topup_toolkit::Result<()> {
    init_logging("topup_toolkit=info")?;

    println!("=== topup-toolkit: purchase flow ===\n");

    let base = std::env::temp_dir().join("topup-demo");
    let settings = Settings::new(&base);
    fs::create_dir_all(settings.logs_dir())?;

    let registry = SingletonRegistry::new();
    let settings = registry.instance::<Settings>(settings)?;
    let logger = registry.keyed_instance::<AuditLogger>(settings.logs_dir(), ())?;

    let mut record = PurchaseRecord {
        package_id: "42".to_string(),
        mobile: "09120000000".to_string(),
        price: 10_000,
        transaction_id: "demo-1".to_string(),
        operator: "1".to_string(),
        result_code: "pending".to_string(),
        status: 0,
        is_package: true,
        timestamp: chrono::Local::now(),
    };

    println!("1. Running {} steps...", PurchaseFlow::registered_methods().len());
    for step in PurchaseFlow::registered_methods().handlers() {
        step(&mut record);
    }

    println!("\n2. Writing audit line...");
    let path = logger.write_purchase_log(&record)?;
    println!("   appended to {}", path.display());

    println!("\n=== Done ===");
    Ok(())
}
