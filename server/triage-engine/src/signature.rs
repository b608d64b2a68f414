//! Exception signature extraction: one counted entry per exception type.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::ErrorSignature;

static EXCEPTION_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(\w+Exception):?\s*(.*)").expect("exception pattern compiles"));

/// Extract signatures grouped by exception type.
///
/// Each line contributes at most one match (the leftmost). The example message
/// is the trailing text of the first line a type was seen on. Output is sorted
/// by count descending; ties keep first-seen order.
pub fn extract(text: &str) -> Vec<ErrorSignature> {
  let mut signatures: Vec<ErrorSignature> = Vec::new();
  let mut index: HashMap<String, usize> = HashMap::new();

  for line in text.lines() {
    let caps = match EXCEPTION_RE.captures(line) {
      Some(c) => c,
      None => continue,
    };
    let exception_type = &caps[1];
    match index.get(exception_type) {
      Some(&i) => signatures[i].count += 1,
      None => {
        index.insert(exception_type.to_string(), signatures.len());
        signatures.push(ErrorSignature {
          exception_type: exception_type.to_string(),
          message: caps[2].trim_end().to_string(),
          count: 1,
        });
      }
    }
  }

  // Vec::sort_by is stable, so equal counts stay in first-seen order.
  signatures.sort_by(|a, b| b.count.cmp(&a.count));
  signatures
}
