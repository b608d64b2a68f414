//! Deterministic grep command synthesis.
//!
//! Order is fixed: ERROR/WARN base queries, one per signature, two per id,
//! then a closing tip plus a date-anchored or placeholder example.

use crate::timestamp::TimestampHint;
use crate::types::ErrorSignature;

pub fn build(
  signatures: &[ErrorSignature],
  ids: &[String],
  hint: Option<&TimestampHint>,
  target: &str,
) -> Vec<String> {
  let mut out = Vec::with_capacity(4 + signatures.len() + ids.len() * 2);

  out.push(format!("grep -n \"ERROR\" {}", target));
  out.push(format!("grep -n \"WARN\" {}", target));

  for sig in signatures {
    out.push(format!("grep -n \"{}\" {}", quote(&sig.exception_type), target));
  }

  for id in ids {
    let id = quote(id);
    out.push(format!("grep -n \"{}\" {}", id, target));
    out.push(format!("grep -n \"ERROR\" {} | grep \"{}\"", target, id));
  }

  match hint {
    Some(h) => {
      out.push("# Tip: start from the first seen timestamp and inspect ±5 minutes window".into());
      out.push(format!("grep -n \"{}\" {} | head -n 200", quote(&h.date), target));
    }
    None => {
      out.push("# Tip: filter around the incident time window (±5 min) if you have timestamps".into());
      out.push(format!("# Example: grep -n \"YYYY-MM-DD\" {} | head -n 200", target));
    }
  }

  out
}

/// Escape double quotes so the value stays inside the grep pattern.
fn quote(s: &str) -> String {
  s.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sig(t: &str) -> ErrorSignature {
    ErrorSignature {
      exception_type: t.into(),
      message: String::new(),
      count: 1,
    }
  }

  #[test]
  fn minimal_output_without_inputs() {
    let q = build(&[], &[], None, "app.log");
    assert_eq!(
      q,
      vec![
        "grep -n \"ERROR\" app.log",
        "grep -n \"WARN\" app.log",
        "# Tip: filter around the incident time window (±5 min) if you have timestamps",
        "# Example: grep -n \"YYYY-MM-DD\" app.log | head -n 200",
      ]
    );
  }

  #[test]
  fn full_output_order_is_fixed() {
    let hint = TimestampHint {
      raw: "2026-03-18 10:16:05".into(),
      date: "2026-03-18".into(),
    };
    let q = build(
      &[sig("NullPointerException"), sig("IOException")],
      &["req-123456".to_string()],
      Some(&hint),
      "app.log",
    );
    assert_eq!(
      q,
      vec![
        "grep -n \"ERROR\" app.log",
        "grep -n \"WARN\" app.log",
        "grep -n \"NullPointerException\" app.log",
        "grep -n \"IOException\" app.log",
        "grep -n \"req-123456\" app.log",
        "grep -n \"ERROR\" app.log | grep \"req-123456\"",
        "# Tip: start from the first seen timestamp and inspect ±5 minutes window",
        "grep -n \"2026-03-18\" app.log | head -n 200",
      ]
    );
  }

  #[test]
  fn quotes_are_escaped() {
    assert_eq!(quote("a\"b"), "a\\\"b");
  }
}
