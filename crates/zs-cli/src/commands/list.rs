use std::path::Path;

use comfy_table::{ContentArrangement, Table};

pub fn run(catalog: Option<&Path>, filter: Option<&str>, incremental: bool) -> Result<(), String> {
    let catalog = super::load_catalog(catalog)?;

    let results: Vec<_> = catalog
        .search(filter.unwrap_or(""))
        .into_iter()
        .filter(|def| !incremental || def.incremental)
        .collect();

    if results.is_empty() {
        println!("  No conditions found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Ref", "Name", "Level", "Gains", "Overrides"]);

    for def in &results {
        let level = if def.incremental { "yes" } else { "-" };
        let gains = def
            .cascades
            .iter()
            .map(|grant| match grant.level {
                Some(level) => format!("{} {level}", grant.reference_id),
                None => grant.reference_id.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        let overrides = def
            .overrides
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            def.reference_id.as_str(),
            def.label(),
            level,
            gains.as_str(),
            overrides.as_str(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} conditions", results.len());

    Ok(())
}
