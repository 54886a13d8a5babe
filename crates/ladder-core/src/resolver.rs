//! Team identity resolution — external team-name string to internal ids.
//!
//! The source page spells team names its own way ("Banks O' Dee FC" vs the
//! canonical "Banks o' Dee"). The resolver holds a precomputed alias map
//! loaded from the store and answers lookups without touching the database.

use std::collections::HashMap;

use uuid::Uuid;

/// The identifier triple a matched external name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTeam {
  pub team_id:        Uuid,
  pub season_id:      Uuid,
  pub competition_id: Uuid,
}

/// Maps external team names onto internal ids for one season + competition.
#[derive(Debug, Clone)]
pub struct Resolver {
  season_id:      Uuid,
  competition_id: Uuid,
  aliases:        HashMap<String, Uuid>,
}

impl Resolver {
  /// Build a resolver from `(external name, team_id)` pairs. Keys are
  /// normalised so lookups are trim- and case-insensitive.
  pub fn new(
    season_id: Uuid,
    competition_id: Uuid,
    aliases: impl IntoIterator<Item = (String, Uuid)>,
  ) -> Self {
    let aliases = aliases
      .into_iter()
      .map(|(name, id)| (normalize(&name), id))
      .collect();
    Self { season_id, competition_id, aliases }
  }

  /// Resolve an external name. `None` means unmatched — the caller decides
  /// how to surface that (the parser records a per-row warning).
  pub fn resolve(&self, external_name: &str) -> Option<ResolvedTeam> {
    let team_id = *self.aliases.get(&normalize(external_name))?;
    Some(ResolvedTeam {
      team_id,
      season_id: self.season_id,
      competition_id: self.competition_id,
    })
  }
}

fn normalize(name: &str) -> String {
  name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn resolver() -> Resolver {
    Resolver::new(
      Uuid::new_v4(),
      Uuid::new_v4(),
      [
        ("Brechin City".to_string(), Uuid::new_v4()),
        ("Banks O' Dee FC".to_string(), Uuid::new_v4()),
      ],
    )
  }

  #[test]
  fn resolves_exact_alias() {
    let r = resolver();
    assert!(r.resolve("Brechin City").is_some());
  }

  #[test]
  fn resolve_is_case_and_whitespace_insensitive() {
    let r = resolver();
    assert!(r.resolve("  brechin city ").is_some());
    assert!(r.resolve("BANKS O' DEE fc").is_some());
  }

  #[test]
  fn unmatched_name_returns_none() {
    let r = resolver();
    assert!(r.resolve("Cove Rangers").is_none());
  }

  #[test]
  fn resolved_triple_carries_season_and_competition() {
    let season_id = Uuid::new_v4();
    let competition_id = Uuid::new_v4();
    let team_id = Uuid::new_v4();
    let r = Resolver::new(
      season_id,
      competition_id,
      [("Keith".to_string(), team_id)],
    );
    let hit = r.resolve("Keith").unwrap();
    assert_eq!(hit.team_id, team_id);
    assert_eq!(hit.season_id, season_id);
    assert_eq!(hit.competition_id, competition_id);
  }
}
