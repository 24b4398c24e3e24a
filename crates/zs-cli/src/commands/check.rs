use std::path::Path;

use colored::Colorize;
use zs_core::RuleCatalog;

pub fn run(path: Option<&Path>) -> Result<(), String> {
    let (catalog, source) = match path {
        Some(path) => (
            RuleCatalog::from_path_strict(path).map_err(|e| e.to_string())?,
            path.display().to_string(),
        ),
        None => (RuleCatalog::builtin(), "built-in catalog".to_string()),
    };

    let dangling = catalog.dangling_references();
    if !dangling.is_empty() {
        for reference in &dangling {
            eprintln!("  {} {reference}", "warning:".yellow());
        }
        return Err(format!(
            "{} dangling reference{} in '{source}'",
            dangling.len(),
            if dangling.len() == 1 { "" } else { "s" }
        ));
    }

    println!("  All checks passed for '{source}'.");
    println!(
        "  {} conditions, {} actions",
        catalog.len(),
        catalog.actions().count()
    );

    Ok(())
}
