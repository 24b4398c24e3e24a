//! Condition tracking session management.
//!
//! `TrackerSession` owns a rule catalog and one entity's condition state and
//! turns lines of input into engine and resolver calls.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use zs_core::{ConditionDefinition, ConditionState, RuleCatalog};
use zs_mechanics::{ConditionEngine, LevelPrompt, MechError, OutcomeResolver};

use crate::config::TrackerConfig;
use crate::error::{TrackerError, TrackerResult};

/// An interactive condition tracking session for a single entity.
pub struct TrackerSession {
    catalog: RuleCatalog,
    state: ConditionState,
    config: TrackerConfig,
    resolver: OutcomeResolver,
    rng: StdRng,
    finished: bool,
}

impl TrackerSession {
    /// Create a new session over a catalog.
    pub fn new(catalog: RuleCatalog, config: TrackerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            catalog,
            state: ConditionState::new(),
            config,
            resolver: OutcomeResolver::default(),
            rng,
            finished: false,
        }
    }

    /// Get the rule catalog.
    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Get the active conditions.
    pub fn state(&self) -> &ConditionState {
        &self.state
    }

    /// Get the session configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Whether a `quit` command has ended the session.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn definition(&self, reference_id: &str) -> TrackerResult<&ConditionDefinition> {
        self.catalog
            .get(reference_id)
            .ok_or_else(|| MechError::UnknownReference(reference_id.to_string()).into())
    }

    /// Process a line of user input and return a response.
    ///
    /// `prompt` supplies levels for incremental conditions applied without one.
    pub fn process(&mut self, input: &str, prompt: &mut dyn LevelPrompt) -> TrackerResult<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(String::new());
        }

        let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let rest = parts.get(1).map(|s| s.trim()).unwrap_or("");
        debug!(command = %cmd, args = rest, "tracker command");

        match cmd.as_str() {
            "apply" | "add" => self.do_apply(rest, prompt),
            "remove" | "rm" => self.do_remove(rest),
            "conditions" | "status" => self.do_conditions(),
            "catalog" => self.do_catalog(rest),
            "show" => self.do_show(rest),
            "roll" => self.do_roll(rest),
            "export" => self.do_export(),
            "clear" => self.do_clear(),
            "help" => self.do_help(),
            "quit" | "q" => {
                self.finished = true;
                Ok("Goodbye!".to_string())
            }
            _ => Err(TrackerError::UnknownCommand(cmd)),
        }
    }

    fn do_apply(&mut self, rest: &str, prompt: &mut dyn LevelPrompt) -> TrackerResult<String> {
        let mut args = rest.split_whitespace();
        let Some(reference_id) = args.next().map(str::to_lowercase) else {
            return Err(TrackerError::InvalidChoice(
                "usage: apply <condition> [level]".to_string(),
            ));
        };
        let raw = args
            .next()
            .map(|token| {
                token.parse::<f64>().map_err(|_| {
                    TrackerError::InvalidChoice(format!("level must be a number, got '{token}'"))
                })
            })
            .transpose()?;
        if args.next().is_some() {
            return Err(TrackerError::InvalidChoice(
                "usage: apply <condition> [level]".to_string(),
            ));
        }

        let engine = ConditionEngine::with_config(&self.catalog, self.config.engine);
        let definition = self
            .catalog
            .get(&reference_id)
            .ok_or_else(|| MechError::UnknownReference(reference_id.clone()))?;
        let outcome = engine.apply_raw(&mut self.state, definition, raw, prompt)?;
        Ok(format!("{}: {outcome}", definition.label()))
    }

    fn do_remove(&mut self, rest: &str) -> TrackerResult<String> {
        if rest.is_empty() {
            return Err(TrackerError::InvalidChoice(
                "usage: remove <condition>".to_string(),
            ));
        }
        let reference_id = rest.to_lowercase();
        let engine = ConditionEngine::with_config(&self.catalog, self.config.engine);
        if engine.remove(&mut self.state, &reference_id) {
            Ok(format!("Removed: {reference_id}"))
        } else {
            Ok(format!("Not active: {reference_id}"))
        }
    }

    fn do_conditions(&self) -> TrackerResult<String> {
        if self.state.is_empty() {
            return Ok("No active conditions.".to_string());
        }
        let mut out = format!("Active conditions ({}):\n", self.state.len());
        for (i, applied) in self.state.iter().enumerate() {
            let name = self
                .catalog
                .get(&applied.reference_id)
                .map(|def| def.label())
                .unwrap_or(applied.reference_id.as_str());
            out.push_str(&format!("  {}. {name}", i + 1));
            if applied.level > 0 {
                out.push_str(&format!(" {}", applied.level));
            }
            out.push('\n');
        }
        Ok(out.trim_end().to_string())
    }

    fn do_catalog(&self, filter: &str) -> TrackerResult<String> {
        let matches = self.catalog.search(filter);
        if matches.is_empty() {
            return Ok(format!("No conditions match '{filter}'."));
        }
        let mut out = format!("Conditions ({}):\n", matches.len());
        for def in matches {
            out.push_str(&format!("  {:<20} {}", def.reference_id, def.label()));
            if def.incremental {
                out.push_str(" [incremental]");
            }
            out.push('\n');
        }
        Ok(out.trim_end().to_string())
    }

    fn do_show(&self, rest: &str) -> TrackerResult<String> {
        if rest.is_empty() {
            return Err(TrackerError::InvalidChoice(
                "usage: show <condition>".to_string(),
            ));
        }
        let def = self.definition(&rest.to_lowercase())?;
        let mut out = format!("{def}\n");
        if def.incremental {
            out.push_str("Incremental: carries a level\n");
        }
        if def.object_only {
            out.push_str("Applies to objects only\n");
        }
        if !def.cascades.is_empty() {
            let gains: Vec<String> = def
                .cascades
                .iter()
                .map(|grant| match grant.level {
                    Some(level) => format!("{} {level}", grant.reference_id),
                    None => grant.reference_id.clone(),
                })
                .collect();
            out.push_str(&format!("Gains: {}\n", gains.join(", ")));
        }
        if !def.overrides.is_empty() {
            let overrides: Vec<&str> = def.overrides.iter().map(String::as_str).collect();
            out.push_str(&format!("Overrides: {}\n", overrides.join(", ")));
        }
        if let Some(active) = self.state.get(&def.reference_id) {
            out.push_str(&format!("Active: {active}\n"));
        }
        for paragraph in &def.description {
            out.push('\n');
            out.push_str(paragraph);
            out.push('\n');
        }
        Ok(out.trim_end().to_string())
    }

    fn do_roll(&mut self, rest: &str) -> TrackerResult<String> {
        let args: Vec<&str> = rest.split_whitespace().collect();
        let [modifier, difficulty] = args.as_slice() else {
            return Err(TrackerError::InvalidChoice(
                "usage: roll <modifier> <difficulty>".to_string(),
            ));
        };
        let modifier = parse_int(modifier, "modifier")?;
        let difficulty = parse_int(difficulty, "difficulty")?;
        let outcome = self.resolver.roll(&mut self.rng, modifier, difficulty);
        Ok(format!("Roll {} vs {difficulty}: {outcome}", self.resolver.die))
    }

    fn do_export(&self) -> TrackerResult<String> {
        Ok(serde_json::to_string_pretty(&self.state)?)
    }

    fn do_clear(&mut self) -> TrackerResult<String> {
        let count = self.state.len();
        self.state.clear();
        Ok(format!("Cleared {count} condition(s)."))
    }

    fn do_help(&self) -> TrackerResult<String> {
        Ok("\
Condition Tracker Commands:
  apply <condition> [level]     Apply a condition (prompts for a level if needed)
  remove <condition>            Remove a condition (granted conditions stay)
  conditions                    List active conditions
  catalog [filter]              List known conditions
  show <condition>              Show a condition's rules
  roll <modifier> <difficulty>  Roll a d20 check and report the degree of success
  export                        Print the active conditions as JSON
  clear                         Remove every condition
  help                          Show this help
  quit                          Exit

Applying a condition at level 0 ends it."
            .to_string())
    }
}

fn parse_int(token: &str, what: &str) -> TrackerResult<i32> {
    token
        .parse()
        .map_err(|_| TrackerError::InvalidChoice(format!("{what} must be a whole number, got '{token}'")))
}
