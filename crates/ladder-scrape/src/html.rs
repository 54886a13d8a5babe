//! Low-level HTML string helpers.
//!
//! Deliberately naive, tailored to the structure of the source standings
//! page: one `<table>` of `<tr>` rows whose cells hold plain text. Tag names
//! are matched case-insensitively; no attempt is made at full HTML parsing.

/// The inner HTML of the first `<table>` element, if any.
pub fn first_table(html: &str) -> Option<&str> {
  slice_between(html, "<table", "</table>")
}

/// Iterate the inner HTML of every `<tr>` inside `section`.
pub fn rows(section: &str) -> Vec<&str> {
  blocks(section, "<tr", "</tr>")
}

/// The text content of every `<td>` cell in a row, tags stripped, entities
/// decoded, whitespace collapsed. Header rows (`<th>` only) yield nothing —
/// the caller skips them without treating that as data loss.
pub fn cell_texts(row: &str) -> Vec<String> {
  blocks(row, "<td", "</td>")
    .into_iter()
    .map(text_content)
    .collect()
}

/// Strip all tags from `html` and normalise the remaining text.
///
/// Every tag becomes a space so text from adjacent elements never fuses
/// into one token; `collapse_ws` squeezes the runs back down.
pub fn text_content(html: &str) -> String {
  let mut out = String::with_capacity(html.len());
  let mut in_tag = false;
  for ch in html.chars() {
    match ch {
      '<' => in_tag = true,
      '>' => {
        in_tag = false;
        out.push(' ');
      }
      _ if !in_tag => out.push(ch),
      _ => {}
    }
  }
  collapse_ws(&decode_entities(&out))
}

/// The content between an opening tag prefix (attributes allowed) and its
/// closing tag, both matched case-insensitively.
fn slice_between<'a>(s: &'a str, open_prefix: &str, close_tag: &str) -> Option<&'a str> {
  let lower = s.to_ascii_lowercase();
  let open_at = lower.find(open_prefix)?;
  let after_open = open_at + s[open_at..].find('>')? + 1;
  let close_at = lower[after_open..].find(close_tag)? + after_open;
  Some(&s[after_open..close_at])
}

/// All `open_prefix ... close_tag` inner sections in order. Nested
/// occurrences of the same tag are not handled; the source page has none.
fn blocks<'a>(s: &'a str, open_prefix: &str, close_tag: &str) -> Vec<&'a str> {
  let lower = s.to_ascii_lowercase();
  let mut out = Vec::new();
  let mut from = 0;

  while let Some(rel) = lower[from..].find(open_prefix) {
    let open_at = from + rel;
    let Some(gt) = s[open_at..].find('>') else { break };
    let inner_start = open_at + gt + 1;
    let Some(close_rel) = lower[inner_start..].find(close_tag) else { break };
    out.push(&s[inner_start..inner_start + close_rel]);
    from = inner_start + close_rel + close_tag.len();
  }

  out
}

/// Minimal entity decoding — the handful the source page actually emits.
fn decode_entities(s: &str) -> String {
  s.replace("&nbsp;", " ")
    .replace("&amp;", "&")
    .replace("&#39;", "'")
    .replace("&apos;", "'")
}

/// Collapse whitespace runs into single spaces and trim.
fn collapse_ws(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut prev_space = false;
  for ch in s.chars() {
    if ch.is_whitespace() {
      if !prev_space {
        out.push(' ');
        prev_space = true;
      }
    } else {
      out.push(ch);
      prev_space = false;
    }
  }
  out.trim().to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extracts_cells_from_a_row() {
    let row = r#"<td class="c">1 Brechin City</td><td>7</td><td><b>6</b></td>"#;
    assert_eq!(cell_texts(row), vec!["1 Brechin City", "7", "6"]);
  }

  #[test]
  fn first_table_skips_preamble() {
    let html = "<div>noise</div><TABLE id='t'><tr><td>x</td></tr></TABLE>";
    let table = first_table(html).unwrap();
    assert_eq!(rows(table).len(), 1);
  }

  #[test]
  fn text_content_decodes_entities_and_collapses_ws() {
    assert_eq!(
      text_content("<span>Banks&nbsp;o&#39;\n  Dee</span>"),
      "Banks o' Dee",
    );
  }

  #[test]
  fn missing_table_is_none() {
    assert!(first_table("<p>no standings here</p>").is_none());
  }

  #[test]
  fn adjacent_elements_do_not_fuse_into_one_token() {
    // The "last updated" line sits right before digit-leading table text;
    // its final token must survive as its own word.
    assert_eq!(
      text_content("<p>at 17:30</p><table><tr><td>1 Brechin</td>"),
      "at 17:30 1 Brechin",
    );
  }
}
