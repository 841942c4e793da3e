//! The audit trail — the append-only note log attached to a case.
//!
//! Notes are immutable once appended. The sequence only grows; there is no
//! deletion or in-place edit operation, and insertion order is the audit
//! order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single entry in a case's audit trail. No field is ever updated after
/// the note is appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseNote {
  pub note_id:    Uuid,
  pub content:    String,
  pub created_by: Uuid,
  /// Server-assigned at append time; immutable afterwards.
  pub created_at: DateTime<Utc>,
  /// Internal notes are stored alongside public ones; hiding them from
  /// consumers without elevated capability is a read-time projection done
  /// by the API layer.
  pub internal:   bool,
}

/// Input to [`append`]. `created_at` is always assigned by the trail; it is
/// not accepted from callers.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNote {
  pub content:  String,
  #[serde(default)]
  pub internal: bool,
}

/// Append a note to the end of the trail and return a reference to it.
pub fn append(notes: &mut Vec<CaseNote>, input: NewNote, author: Uuid) -> &CaseNote {
  notes.push(CaseNote {
    note_id:    Uuid::new_v4(),
    content:    input.content,
    created_by: author,
    created_at: Utc::now(),
    internal:   input.internal,
  });
  notes.last().expect("just pushed")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn note(content: &str) -> NewNote {
    NewNote { content: content.into(), internal: false }
  }

  #[test]
  fn append_grows_by_exactly_one() {
    let author = Uuid::new_v4();
    let mut notes = Vec::new();
    append(&mut notes, note("first"), author);
    assert_eq!(notes.len(), 1);
    append(&mut notes, note("second"), author);
    assert_eq!(notes.len(), 2);
  }

  #[test]
  fn append_leaves_prior_entries_untouched() {
    let author = Uuid::new_v4();
    let mut notes = Vec::new();
    append(&mut notes, note("first"), author);
    let first = notes[0].clone();

    append(&mut notes, note("second"), author);
    assert_eq!(notes[0].note_id, first.note_id);
    assert_eq!(notes[0].content, first.content);
    assert_eq!(notes[0].created_at, first.created_at);
    assert_eq!(notes[0].created_by, first.created_by);
  }

  #[test]
  fn append_assigns_author_and_timestamp() {
    let author = Uuid::new_v4();
    let mut notes = Vec::new();
    let before = Utc::now();
    let appended = append(
      &mut notes,
      NewNote { content: "observed".into(), internal: true },
      author,
    );
    assert_eq!(appended.created_by, author);
    assert!(appended.internal);
    assert!(appended.created_at >= before);
  }
}
