use std::path::Path;

use colored::Colorize;

pub fn run(catalog: Option<&Path>, reference: &str) -> Result<(), String> {
    let catalog = super::load_catalog(catalog)?;
    let reference = reference.to_lowercase();

    if let Some(def) = catalog.get(&reference) {
        let mut flags = Vec::new();
        if def.incremental {
            flags.push("incremental");
        }
        if def.object_only {
            flags.push("objects only");
        }
        if flags.is_empty() {
            println!("  {} [{}]", def.label().bold(), def.reference_id.dimmed());
        } else {
            println!(
                "  {} [{}] ({})",
                def.label().bold(),
                def.reference_id.dimmed(),
                flags.join(", ")
            );
        }
        println!();

        for paragraph in &def.description {
            println!("  {paragraph}");
            println!();
        }

        if !def.cascades.is_empty() {
            println!("  {}", "Gains:".bold());
            for grant in &def.cascades {
                let name = catalog
                    .get(&grant.reference_id)
                    .map(|gained| gained.label())
                    .unwrap_or("(not in catalog)");
                match grant.level {
                    Some(level) => println!("    {} {level}  {name}", grant.reference_id),
                    None => println!("    {}  {name}", grant.reference_id),
                }
            }
        }

        if !def.overrides.is_empty() {
            println!("  {}", "Overrides:".bold());
            for overridden in &def.overrides {
                println!("    {overridden}");
            }
        }
        return Ok(());
    }

    if let Some(action) = catalog.action(&reference) {
        println!("  {} [{}]", action.label().bold(), action.kind.dimmed());
        println!();
        if let Some(trigger) = &action.trigger {
            println!("  trigger:      {trigger}");
        }
        if let Some(requirements) = &action.requirements {
            println!("  requirements: {requirements}");
        }
        for paragraph in &action.description {
            println!("  {paragraph}");
        }
        return Ok(());
    }

    Err(format!("condition not found: \"{reference}\""))
}
