//! Parsing the standings page into standing records.
//!
//! The page carries one HTML table (rank + team name in the first cell,
//! eight numeric columns, a trailing form string) and, somewhere in the
//! surrounding markup, a human-readable "last updated" line shaped
//! `23rd August 2025 at 17:30`.
//!
//! Nothing here aborts. Rows that cannot be used are skipped with a warning
//! string, and a missing timestamp leaves `source_timestamp` as `None` so
//! the caller can substitute the scrape time and mark provenance degraded.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use ladder_core::{record::StandingRecord, resolver::Resolver};

use crate::html;

/// The outcome of one parse pass over the page.
#[derive(Debug, Clone)]
pub struct ParsedTable {
  /// Successfully parsed and resolved rows, source order preserved.
  pub records:          Vec<StandingRecord>,
  /// One entry per skipped row — these travel with the snapshot so a later
  /// count mismatch can explain itself.
  pub warnings:         Vec<String>,
  /// "Last updated" time reported by the page, if one was found.
  pub source_timestamp: Option<DateTime<Utc>>,
}

/// Parse the raw page markup. Team names are resolved through `resolver`;
/// rows it cannot match are skipped with a warning, never silently.
pub fn parse_standings(page: &str, resolver: &Resolver) -> ParsedTable {
  let source_timestamp = scan_source_timestamp(&html::text_content(page));

  let mut records = Vec::new();
  let mut warnings = Vec::new();

  let Some(table) = html::first_table(page) else {
    warnings.push("no standings table found in page".to_string());
    return ParsedTable { records, warnings, source_timestamp };
  };

  let mut row_no = 0u32;
  for row in html::rows(table) {
    let cells = html::cell_texts(row);
    if cells.is_empty() {
      // Header or structural row — no data cells.
      continue;
    }
    row_no += 1;

    match parse_row(&cells, resolver) {
      Ok(record) => records.push(record),
      Err(reason) => {
        tracing::warn!(row = row_no, %reason, "skipping standings row");
        warnings.push(format!("row {row_no}: {reason}"));
      }
    }
  }

  ParsedTable { records, warnings, source_timestamp }
}

// ─── Row parsing ─────────────────────────────────────────────────────────────

fn parse_row(cells: &[String], resolver: &Resolver) -> Result<StandingRecord, String> {
  if cells.len() < 9 {
    return Err(format!("only {} cells", cells.len()));
  }

  // First cell: source rank digits, then the team name.
  let (position, team_name) = split_rank(&cells[0])
    .ok_or_else(|| format!("no leading rank in {:?}", cells[0]))?;

  let resolved = resolver
    .resolve(team_name)
    .ok_or_else(|| format!("unmatched team name {team_name:?}"))?;

  // Only goal difference may be negative; a minus sign anywhere else means
  // the row is garbage and gets skipped with a warning.
  let matches_played = parse_cell::<u32>(&cells[1], "matches played")?;
  let wins = parse_cell::<u32>(&cells[2], "wins")?;
  let draws = parse_cell::<u32>(&cells[3], "draws")?;
  let losses = parse_cell::<u32>(&cells[4], "losses")?;
  let goals_for = parse_cell::<u32>(&cells[5], "goals for")?;
  let goals_against = parse_cell::<u32>(&cells[6], "goals against")?;
  let goal_difference = parse_cell::<i32>(&cells[7], "goal difference")?;
  let points = parse_cell::<u32>(&cells[8], "points")?;

  // Anything past the eight numeric columns is the form cell.
  let form = if cells.len() > 9 {
    extract_form(cells.last().map(String::as_str).unwrap_or(""))
  } else {
    String::new()
  };

  Ok(StandingRecord {
    season_id: resolved.season_id,
    competition_id: resolved.competition_id,
    team_id: resolved.team_id,
    team_name: team_name.to_string(),
    position,
    matches_played,
    wins,
    draws,
    losses,
    goals_for,
    goals_against,
    goal_difference,
    points,
    form,
  })
}

/// Split `"3 Brechin City"` into `(3, "Brechin City")`.
fn split_rank(cell: &str) -> Option<(u32, &str)> {
  let digits_end = cell.find(|c: char| !c.is_ascii_digit())?;
  if digits_end == 0 {
    return None;
  }
  let rank = cell[..digits_end].parse().ok()?;
  let name = cell[digits_end..].trim();
  if name.is_empty() {
    return None;
  }
  Some((rank, name))
}

/// Parse one numeric cell into the column's own type, so counts reject a
/// minus sign outright. A leading `+` (seen on goal difference) is accepted
/// by integer parsing as-is.
fn parse_cell<T: std::str::FromStr>(cell: &str, label: &str) -> Result<T, String> {
  cell
    .trim()
    .parse()
    .map_err(|_| format!("bad {label} value {cell:?}"))
}

/// Keep only W/D/L letters, then only the last six of those.
fn extract_form(cell: &str) -> String {
  let letters: Vec<char> = cell
    .chars()
    .map(|c| c.to_ascii_uppercase())
    .filter(|c| matches!(c, 'W' | 'D' | 'L'))
    .collect();
  let start = letters.len().saturating_sub(6);
  letters[start..].iter().collect()
}

// ─── "Last updated" timestamp ────────────────────────────────────────────────

/// Scan page text for the first `<ordinal> <Month> <Year> at HH:MM` run,
/// e.g. `23rd August 2025 at 17:30`. The page states no zone; the time is
/// taken as UTC.
fn scan_source_timestamp(text: &str) -> Option<DateTime<Utc>> {
  let tokens: Vec<&str> = text.split_whitespace().collect();

  for w in tokens.windows(5) {
    let Some(day) = ordinal_day(w[0]) else { continue };
    let Some(month) = month_number(w[1]) else { continue };
    let Ok(year) = w[2].parse::<i32>() else { continue };
    if !(1900..=9999).contains(&year) || !w[3].eq_ignore_ascii_case("at") {
      continue;
    }
    let Some((hour, minute)) = hh_mm(w[4]) else { continue };

    let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
      continue;
    };
    let Some(dt) = date.and_hms_opt(hour, minute, 0) else { continue };
    return Some(Utc.from_utc_datetime(&dt));
  }

  None
}

/// `"23rd"` → `23`. Accepts st/nd/rd/th, case-insensitive.
fn ordinal_day(token: &str) -> Option<u32> {
  let digits_end = token.find(|c: char| !c.is_ascii_digit())?;
  if digits_end == 0 {
    return None;
  }
  let suffix = token[digits_end..].to_ascii_lowercase();
  if !matches!(suffix.as_str(), "st" | "nd" | "rd" | "th") {
    return None;
  }
  token[..digits_end].parse().ok().filter(|d| (1..=31).contains(d))
}

fn month_number(token: &str) -> Option<u32> {
  const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
  ];
  let t = token.to_ascii_lowercase();
  MONTHS.iter().position(|m| *m == t).map(|i| i as u32 + 1)
}

/// `"17:30"` → `(17, 30)`. Trailing punctuation is tolerated.
fn hh_mm(token: &str) -> Option<(u32, u32)> {
  let token = token.trim_end_matches(|c: char| !c.is_ascii_digit());
  let (h, m) = token.split_once(':')?;
  let hour: u32 = h.parse().ok()?;
  let minute: u32 = m.parse().ok()?;
  (hour < 24 && minute < 60).then_some((hour, minute))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;

  const TEAMS: [&str; 18] = [
    "Brechin City", "Brora Rangers", "Banks o' Dee", "Buckie Thistle",
    "Fraserburgh", "Huntly", "Inverurie Loco Works", "Formartine United",
    "Keith", "Clachnacuddin", "Deveronvale", "Forres Mechanics",
    "Lossiemouth", "Nairn County", "Rothes", "Strathspey Thistle",
    "Turriff United", "Wick Academy",
  ];

  fn resolver() -> Resolver {
    Resolver::new(
      Uuid::new_v4(),
      Uuid::new_v4(),
      TEAMS.iter().map(|t| (t.to_string(), Uuid::new_v4())),
    )
  }

  /// A page in the source site's shape: header row, 18 data rows, and a
  /// "last updated" line outside the table.
  fn fixture_page() -> String {
    let mut html = String::from(
      "<html><body><p>Last updated: 23rd August 2025 at 17:30</p>\
       <table class=\"standings\">\
       <tr><th>Team</th><th>P</th><th>W</th><th>D</th><th>L</th>\
       <th>F</th><th>A</th><th>GD</th><th>Pts</th><th>Form</th></tr>",
    );
    for (i, team) in TEAMS.iter().enumerate() {
      let wins = (18 - i) as u32;
      let draws = 3u32;
      let losses = i as u32;
      html.push_str(&row(i as u32 + 1, team, wins, draws, losses));
    }
    html.push_str("</table></body></html>");
    html
  }

  fn row(pos: u32, team: &str, wins: u32, draws: u32, losses: u32) -> String {
    let gf = wins * 2 + draws;
    let ga = losses * 2;
    format!(
      "<tr><td>{pos} {team}</td><td>{}</td><td>{wins}</td><td>{draws}</td>\
       <td>{losses}</td><td>{gf}</td><td>{ga}</td><td>{}</td>\
       <td>{}</td><td>W W D L W W D</td></tr>",
      wins + draws + losses,
      gf as i32 - ga as i32,
      wins * 3 + draws,
    )
  }

  #[test]
  fn full_fixture_parses_eighteen_consistent_records() {
    let parsed = parse_standings(&fixture_page(), &resolver());

    assert_eq!(parsed.records.len(), 18);
    assert!(parsed.warnings.is_empty(), "warnings: {:?}", parsed.warnings);
    for r in &parsed.records {
      assert_eq!(r.points, r.wins * 3 + r.draws, "{}", r.team_name);
      assert_eq!(r.matches_played, r.wins + r.draws + r.losses, "{}", r.team_name);
      assert_eq!(r.goal_difference, r.goals_for as i32 - r.goals_against as i32);
    }
  }

  #[test]
  fn positions_are_source_ranks() {
    let parsed = parse_standings(&fixture_page(), &resolver());
    let positions: Vec<u32> = parsed.records.iter().map(|r| r.position).collect();
    assert_eq!(positions, (1..=18).collect::<Vec<_>>());
  }

  #[test]
  fn unmatched_team_is_skipped_with_warning_and_rank_hole() {
    // One team name the resolver does not know.
    let page = fixture_page().replace("8 Formartine United", "8 Formartine Utd");
    let parsed = parse_standings(&page, &resolver());

    assert_eq!(parsed.records.len(), 17);
    assert_eq!(parsed.warnings.len(), 1);
    assert!(parsed.warnings[0].contains("unmatched team name \"Formartine Utd\""));
    // The dropped row's rank is not reassigned to later rows.
    assert!(parsed.records.iter().all(|r| r.position != 8));
    assert!(parsed.records.iter().any(|r| r.position == 9));
  }

  #[test]
  fn short_row_is_skipped_with_warning() {
    let page = fixture_page().replace(
      &row(9, "Keith", 10, 3, 8),
      "<tr><td>9 Keith</td><td>21</td></tr>",
    );
    let parsed = parse_standings(&page, &resolver());

    assert_eq!(parsed.records.len(), 17);
    assert!(parsed.warnings[0].contains("only 2 cells"));
  }

  #[test]
  fn bad_number_is_skipped_with_warning() {
    let page = fixture_page().replace(
      &row(9, "Keith", 10, 3, 8),
      &row(9, "Keith", 10, 3, 8).replace("<td>21</td>", "<td>-</td>"),
    );
    let parsed = parse_standings(&page, &resolver());

    assert_eq!(parsed.records.len(), 17);
    assert_eq!(parsed.warnings.len(), 1);
  }

  #[test]
  fn negative_count_is_skipped_with_warning() {
    // A minus sign in a count column must not wrap around into a huge value.
    let page = fixture_page().replace(
      &row(9, "Keith", 10, 3, 8),
      &row(9, "Keith", 10, 3, 8).replace("<td>10</td>", "<td>-1</td>"),
    );
    let parsed = parse_standings(&page, &resolver());

    assert_eq!(parsed.records.len(), 17);
    assert_eq!(parsed.warnings.len(), 1);
    assert!(parsed.warnings[0].contains("bad wins value \"-1\""));
    assert!(parsed.records.iter().all(|r| r.wins <= 18));
  }

  #[test]
  fn form_keeps_last_six_outcomes() {
    let parsed = parse_standings(&fixture_page(), &resolver());
    // Fixture form cell holds seven outcomes; only the last six survive.
    assert_eq!(parsed.records[0].form, "WDLWWD");
  }

  #[test]
  fn source_timestamp_is_extracted() {
    let parsed = parse_standings(&fixture_page(), &resolver());
    let ts = parsed.source_timestamp.expect("timestamp");
    assert_eq!(ts.to_rfc3339(), "2025-08-23T17:30:00+00:00");
  }

  #[test]
  fn timestamp_survives_digit_leading_content_right_after_its_element() {
    // No header row: the first text after the stamp's `</p>` starts with a
    // digit, which must not fuse with the `HH:MM` token.
    let page = format!(
      "<html><body><p>Last updated: 23rd August 2025 at 17:30</p>\
       <table>{}</table></body></html>",
      row(1, "Brechin City", 15, 3, 0),
    );
    let parsed = parse_standings(&page, &resolver());

    assert_eq!(parsed.records.len(), 1);
    let ts = parsed.source_timestamp.expect("timestamp");
    assert_eq!(ts.to_rfc3339(), "2025-08-23T17:30:00+00:00");
  }

  #[test]
  fn missing_timestamp_yields_none() {
    let page = fixture_page().replace("23rd August 2025 at 17:30", "recently");
    let parsed = parse_standings(&page, &resolver());
    assert!(parsed.source_timestamp.is_none());
    // Rows still parse; degraded provenance is the caller's concern.
    assert_eq!(parsed.records.len(), 18);
  }

  #[test]
  fn pageless_markup_yields_empty_table_with_warning() {
    let parsed = parse_standings("<html><body>down for maintenance</body></html>", &resolver());
    assert!(parsed.records.is_empty());
    assert_eq!(parsed.warnings.len(), 1);
  }

  #[test]
  fn negative_goal_difference_parses() {
    let parsed = parse_standings(&fixture_page(), &resolver());
    let last = parsed.records.last().unwrap();
    assert!(last.goal_difference < 0);
  }
}
