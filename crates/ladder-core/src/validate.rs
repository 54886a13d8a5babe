//! Consistency validation over a staging snapshot.
//!
//! Pure functions: no IO, no short-circuiting. Every check runs so a single
//! pass reports every problem, and an empty issue list means the snapshot is
//! safe to promote.

use crate::record::StagingSnapshot;

/// Validate the snapshot against the expected team count for the competition.
///
/// Checks, all independent:
/// - row count equals `expected_teams` (when short, the parser's row-skip
///   warnings are folded into the message so the mismatch explains itself);
/// - per record, `points == wins * 3 + draws`;
/// - per record, `matches_played == wins + draws + losses`;
/// - `position` values form a contiguous `1..=N` permutation over the
///   snapshot's own rows (source ranks are carried through by the parser,
///   so a dropped row shows up here as a hole).
pub fn validate_snapshot(snapshot: &StagingSnapshot, expected_teams: u32) -> Vec<String> {
  let mut issues = Vec::new();

  let count = snapshot.records.len() as u32;
  if count != expected_teams {
    let mut issue = format!("Expected {expected_teams} teams, found {count}");
    if !snapshot.warnings.is_empty() {
      issue.push_str(&format!(
        " ({} row(s) skipped during parse: {})",
        snapshot.warnings.len(),
        snapshot.warnings.join("; "),
      ));
    }
    issues.push(issue);
  }

  for record in &snapshot.records {
    let expected_points = record.wins * 3 + record.draws;
    if record.points != expected_points {
      issues.push(format!(
        "{}: points mismatch ({} vs expected {})",
        record.team_name, record.points, expected_points,
      ));
    }

    let expected_played = record.wins + record.draws + record.losses;
    if record.matches_played != expected_played {
      issues.push(format!(
        "{}: matches played mismatch ({} vs expected {})",
        record.team_name, record.matches_played, expected_played,
      ));
    }
  }

  if let Some(issue) = check_positions(snapshot) {
    issues.push(issue);
  }

  issues
}

/// Positions must be exactly `1..=N` in some order. Returns a single issue
/// naming the first hole or duplicate, or `None` when the permutation holds.
fn check_positions(snapshot: &StagingSnapshot) -> Option<String> {
  let n = snapshot.records.len() as u32;
  let mut seen = vec![false; n as usize];

  for record in &snapshot.records {
    if record.position == 0 || record.position > n {
      return Some(format!(
        "{}: position {} outside 1..={n}",
        record.team_name, record.position,
      ));
    }
    let slot = &mut seen[(record.position - 1) as usize];
    if *slot {
      return Some(format!("duplicate position {}", record.position));
    }
    *slot = true;
  }

  seen
    .iter()
    .position(|taken| !taken)
    .map(|idx| format!("missing position {}", idx + 1))
}
