use std::path::Path;

use colored::Colorize;
use zs_mechanics::OutcomeResolver;

pub fn run(
    catalog: Option<&Path>,
    reference: &str,
    modifier: i32,
    dc: i32,
    seed: Option<u64>,
) -> Result<(), String> {
    let catalog = super::load_catalog(catalog)?;
    let action = catalog
        .action(&reference.to_lowercase())
        .ok_or_else(|| format!("action not found: \"{reference}\""))?;

    let mut rng = super::make_rng(seed);
    let outcome = OutcomeResolver::new().roll(&mut rng, modifier, dc);

    println!("  {} [{}]", action.label().bold(), action.kind.dimmed());
    println!(
        "  d20: {} {:+} = {} vs DC {dc}",
        outcome.raw_die,
        outcome.modifier(),
        outcome.total
    );
    println!("  {}", super::paint_tier(outcome.tier));
    match action.effect_for(outcome.tier) {
        Some(effect) => println!("  {effect}"),
        None => println!("  {}", "No effect.".dimmed()),
    }

    Ok(())
}
