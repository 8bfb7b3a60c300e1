use blockguard::protection::audit::audit_owner_files;
use blockguard::GuardConfig;
use std::path::Path;

fn main() -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();
    let config = match args.get(1) {
        Some(path) => GuardConfig::load(Path::new(path)).map_err(|err| err.to_string())?,
        None => GuardConfig::default(),
    };
    config.validate().map_err(|err| err.to_string())?;
    let guard = config.build_guard();
    let reports = audit_owner_files(&guard);

    println!("owner file audit:");
    println!("- data dir: {}", config.data_dir.display());
    let mut problems = 0usize;
    for report in &reports {
        if report.missing {
            println!("- {}: no owner file", report.block_type);
            continue;
        }
        if let Some(err) = &report.error {
            problems += 1;
            println!("- {}: {}", report.block_type, err);
            continue;
        }
        println!(
            "- {}: entries={}, owners={}, orphaned={}",
            report.block_type,
            report.entries,
            report.owners,
            report.orphaned.len()
        );
        for position in &report.orphaned {
            problems += 1;
            println!("  orphaned cell {}", position);
        }
    }
    if problems > 0 {
        return Err(format!("{} owner file problems detected", problems));
    }
    Ok(())
}
