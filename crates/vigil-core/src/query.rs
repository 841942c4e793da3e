//! Listing queries — filter routing, sort, and page descriptors.
//!
//! A listing request may carry several optional filters, but the store is
//! only ever asked to evaluate one predicate. [`CaseFilter::route`] picks the
//! most specific matching combination in a fixed precedence order; all other
//! supplied filters are silently ignored. The precedence is deliberately
//! non-compositional and is preserved for caller compatibility.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::case::{CaseStatus, Priority};

// ─── Paging ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  Asc,
  #[default]
  Desc,
}

/// A page window plus sort order for a listing query.
#[derive(Debug, Clone, Deserialize)]
pub struct PageRequest {
  pub page:      usize,
  pub size:      usize,
  pub sort_by:   String,
  pub direction: SortDirection,
}

impl Default for PageRequest {
  fn default() -> Self {
    Self {
      page:      0,
      size:      10,
      sort_by:   "created_at".to_string(),
      direction: SortDirection::Desc,
    }
  }
}

impl PageRequest {
  /// Row offset of the first item in this window.
  pub fn offset(&self) -> usize {
    self.page * self.size
  }
}

/// One page of results with the totals needed to render pagination.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
  pub items:       Vec<T>,
  pub page:        usize,
  pub total_items: u64,
  pub total_pages: u64,
}

impl<T> Page<T> {
  /// Assemble a page descriptor; `total_pages` is the ceiling division of
  /// the item count by the window size.
  pub fn new(items: Vec<T>, page: usize, total_items: u64, size: usize) -> Self {
    let total_pages = if size == 0 {
      0
    } else {
      total_items.div_ceil(size as u64)
    };
    Self { items, page, total_items, total_pages }
  }

  /// Build a page from the full result set of an unpaged query, applying
  /// the request's window to the items. `total_items` counts the full set.
  pub fn window(all: Vec<T>, request: &PageRequest) -> Self {
    let total = all.len() as u64;
    let items: Vec<T> =
      all.into_iter().skip(request.offset()).take(request.size).collect();
    Self::new(items, request.page, total, request.size)
  }

  /// Map the items while keeping the page bookkeeping.
  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      items:       self.items.into_iter().map(f).collect(),
      page:        self.page,
      total_items: self.total_items,
      total_pages: self.total_pages,
    }
  }
}

// ─── Case filter routing ─────────────────────────────────────────────────────

/// The optional filters accepted by a case listing request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseFilter {
  pub status:      Option<CaseStatus>,
  pub priority:    Option<Priority>,
  pub district:    Option<String>,
  pub assigned_to: Option<Uuid>,
}

/// The single predicate a store evaluates for a case listing.
#[derive(Debug, Clone, PartialEq)]
pub enum CasePredicate {
  DistrictAndStatus { district: String, status: CaseStatus },
  PriorityAndStatus { priority: Priority, status: CaseStatus },
  Status(CaseStatus),
  AssignedTo(Uuid),
  All,
}

impl CaseFilter {
  /// Select the predicate to evaluate, by precedence:
  /// district+status, then priority+status, then status, then assigned-to,
  /// then everything. Only one combined pair is ever chosen — when district,
  /// priority, and status are all supplied, district+status wins and the
  /// priority filter is dropped.
  pub fn route(&self) -> CasePredicate {
    match (&self.status, &self.district, &self.priority, &self.assigned_to) {
      (Some(status), Some(district), _, _) => CasePredicate::DistrictAndStatus {
        district: district.clone(),
        status:   *status,
      },
      (Some(status), None, Some(priority), _) => CasePredicate::PriorityAndStatus {
        priority: *priority,
        status:   *status,
      },
      (Some(status), None, None, _) => CasePredicate::Status(*status),
      (None, _, _, Some(assignee)) => CasePredicate::AssignedTo(*assignee),
      _ => CasePredicate::All,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn district_and_status_wins_over_priority() {
    let filter = CaseFilter {
      status:      Some(CaseStatus::New),
      priority:    Some(Priority::High),
      district:    Some("Central".into()),
      assigned_to: None,
    };
    assert_eq!(
      filter.route(),
      CasePredicate::DistrictAndStatus {
        district: "Central".into(),
        status:   CaseStatus::New,
      }
    );
  }

  #[test]
  fn priority_and_status_without_district() {
    let filter = CaseFilter {
      status:   Some(CaseStatus::InProgress),
      priority: Some(Priority::High),
      ..Default::default()
    };
    assert_eq!(
      filter.route(),
      CasePredicate::PriorityAndStatus {
        priority: Priority::High,
        status:   CaseStatus::InProgress,
      }
    );
  }

  #[test]
  fn status_alone() {
    let filter =
      CaseFilter { status: Some(CaseStatus::Closed), ..Default::default() };
    assert_eq!(filter.route(), CasePredicate::Status(CaseStatus::Closed));
  }

  #[test]
  fn assignee_only_applies_without_status() {
    let assignee = Uuid::new_v4();
    let filter =
      CaseFilter { assigned_to: Some(assignee), ..Default::default() };
    assert_eq!(filter.route(), CasePredicate::AssignedTo(assignee));

    // Status takes precedence over assignee.
    let filter = CaseFilter {
      status:      Some(CaseStatus::New),
      assigned_to: Some(assignee),
      ..Default::default()
    };
    assert_eq!(filter.route(), CasePredicate::Status(CaseStatus::New));
  }

  #[test]
  fn no_filters_means_everything() {
    assert_eq!(CaseFilter::default().route(), CasePredicate::All);

    // District or priority without status route to the unfiltered listing.
    let filter =
      CaseFilter { district: Some("North".into()), ..Default::default() };
    assert_eq!(filter.route(), CasePredicate::All);
  }

  #[test]
  fn page_totals_use_ceiling_division() {
    let page = Page::new(vec![1, 2, 3], 0, 23, 10);
    assert_eq!(page.total_pages, 3);
    let page = Page::new(Vec::<i32>::new(), 0, 20, 10);
    assert_eq!(page.total_pages, 2);
    let page = Page::new(Vec::<i32>::new(), 0, 0, 10);
    assert_eq!(page.total_pages, 0);
  }

  #[test]
  fn window_slices_the_full_set() {
    let all: Vec<u32> = (0..25).collect();

    let first = Page::window(all.clone(), &PageRequest::default());
    assert_eq!(first.items, (0..10).collect::<Vec<u32>>());
    assert_eq!(first.total_items, 25);
    assert_eq!(first.total_pages, 3);

    let second = Page::window(
      all.clone(),
      &PageRequest { page: 1, ..Default::default() },
    );
    assert_eq!(second.items, (10..20).collect::<Vec<u32>>());
    assert_ne!(first.items, second.items);

    // The last page is partial; pages past the end are empty but keep the
    // totals.
    let last =
      Page::window(all.clone(), &PageRequest { page: 2, ..Default::default() });
    assert_eq!(last.items, (20..25).collect::<Vec<u32>>());
    let past =
      Page::window(all, &PageRequest { page: 5, ..Default::default() });
    assert!(past.items.is_empty());
    assert_eq!(past.total_items, 25);
    assert_eq!(past.total_pages, 3);
  }

  #[test]
  fn offset_is_page_times_size() {
    let req = PageRequest { page: 3, size: 25, ..Default::default() };
    assert_eq!(req.offset(), 75);
  }
}
