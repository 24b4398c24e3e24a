use zs_mechanics::{Die, OutcomeResolver};

pub fn run(die: &str, modifier: i32, dc: i32, seed: Option<u64>) -> Result<(), String> {
    let die = Die::parse(die).map_err(|e| e.to_string())?;
    let resolver = OutcomeResolver::new().with_die(die);
    let mut rng = super::make_rng(seed);

    let outcome = resolver.roll(&mut rng, modifier, dc);
    println!(
        "  {die}: {} {:+} = {} vs DC {dc} (margin {:+})",
        outcome.raw_die,
        outcome.modifier(),
        outcome.total,
        outcome.margin
    );
    println!("  {}", super::paint_tier(outcome.tier));

    Ok(())
}
