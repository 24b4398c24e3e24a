pub mod action;
pub mod check;
pub mod list;
pub mod roll;
pub mod show;
pub mod track;

use std::path::Path;

use colored::Colorize;
use rand::SeedableRng;
use rand::rngs::StdRng;
use zs_core::{RuleCatalog, Tier};

/// Load a catalog file leniently, or the built-in catalog when no path is given.
fn load_catalog(path: Option<&Path>) -> Result<RuleCatalog, String> {
    match path {
        Some(path) => RuleCatalog::from_path(path).map_err(|e| e.to_string()),
        None => Ok(RuleCatalog::builtin()),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Color a tier name by how good it is.
fn paint_tier(tier: Tier) -> String {
    let text = tier.to_string();
    let painted = if tier.is_success() {
        text.green()
    } else if tier.is_critical() {
        text.red()
    } else {
        text.yellow()
    };
    if tier.is_critical() {
        painted.bold().to_string()
    } else {
        painted.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn painted_tiers_keep_their_names() {
        for tier in [
            Tier::CriticalFailure,
            Tier::Failure,
            Tier::Success,
            Tier::CriticalSuccess,
        ] {
            assert!(paint_tier(tier).contains(&tier.to_string()));
        }
    }
}
