//! Declarative filter expressions over event records.
//!
//! The query engine never walks the store itself; it hands the store a
//! [`FilterExpr`] describing which records qualify. The expression tree is
//! small on purpose: single-field comparisons, an inclusive between, the
//! recurring-event predicate, and boolean composition.
//!
//! [`range_filter`] builds the date window per the decision table below,
//! [`full_filter`] adds the recurring-event override, and [`month_filter`]
//! is the simpler month-view variant.
//!
//! | from | to  | anchor       | predicate                            |
//! |------|-----|--------------|--------------------------------------|
//! | set  | -   | any          | `anchor_field >= from`               |
//! | -    | set | any          | `anchor_field <= to`                 |
//! | set  | set | start or end | `anchor_field between from and to`   |
//! | set  | set | overlap      | `end >= from and start <= to`        |
//! | -    | -   | any          | unconstrained                        |

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::event::EventRecord;
use crate::query::{Anchor, DateField, QueryParams};
use crate::time::{self, DateResult};

/// Comparison operator for a single date field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CmpOp {
    /// Field value is on or after the given instant (`>=`).
    AtLeast,
    /// Field value is on or before the given instant (`<=`).
    AtMost,
}

/// A filter expression evaluated by the store against each record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterExpr {
    /// Matches every record.
    All,
    /// Matches records whose repeat mode is anything but `Never`.
    Recurring,
    /// Single-sided comparison on one date field.
    Cmp {
        field: DateField,
        op: CmpOp,
        value: NaiveDateTime,
    },
    /// Inclusive range test on one date field.
    Between {
        field: DateField,
        from: NaiveDateTime,
        to: NaiveDateTime,
    },
    /// Every sub-expression must match.
    And { all: Vec<FilterExpr> },
    /// At least one sub-expression must match.
    Or { any: Vec<FilterExpr> },
}

impl FilterExpr {
    /// Evaluates this expression against a record.
    ///
    /// A date predicate on a field the record does not carry is false: an
    /// open event only qualifies when the window is unconstrained (or via
    /// the recurring override).
    pub fn matches(&self, event: &EventRecord) -> bool {
        match self {
            Self::All => true,
            Self::Recurring => event.repeat.is_recurring(),
            Self::Cmp { field, op, value } => match event.date_value(*field) {
                Some(actual) => match op {
                    CmpOp::AtLeast => actual >= *value,
                    CmpOp::AtMost => actual <= *value,
                },
                None => false,
            },
            Self::Between { field, from, to } => event
                .date_value(*field)
                .is_some_and(|actual| actual >= *from && actual <= *to),
            Self::And { all } => all.iter().all(|expr| expr.matches(event)),
            Self::Or { any } => any.iter().any(|expr| expr.matches(event)),
        }
    }

    /// True when the expression matches every record unconditionally.
    pub fn is_unconstrained(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// Builds the date-window predicate for the given parameters.
pub fn range_filter(params: &QueryParams) -> FilterExpr {
    let field = params.anchor.date_field();
    match (params.from, params.to) {
        (None, None) => FilterExpr::All,
        (Some(from), None) => FilterExpr::Cmp {
            field,
            op: CmpOp::AtLeast,
            value: from,
        },
        (None, Some(to)) => FilterExpr::Cmp {
            field,
            op: CmpOp::AtMost,
            value: to,
        },
        (Some(from), Some(to)) => match params.anchor {
            // Interval intersection: catches events that started before the
            // window but end inside it, and events that start inside but
            // extend beyond it.
            Anchor::Overlap => FilterExpr::And {
                all: vec![
                    FilterExpr::Cmp {
                        field: DateField::End,
                        op: CmpOp::AtLeast,
                        value: from,
                    },
                    FilterExpr::Cmp {
                        field: DateField::Start,
                        op: CmpOp::AtMost,
                        value: to,
                    },
                ],
            },
            Anchor::Start | Anchor::End => FilterExpr::Between { field, from, to },
        },
    }
}

/// Builds the complete query predicate: recurring events always qualify,
/// everything else goes through the date window.
pub fn full_filter(params: &QueryParams) -> FilterExpr {
    let range = range_filter(params);
    if range.is_unconstrained() {
        return FilterExpr::All;
    }
    FilterExpr::Or {
        any: vec![FilterExpr::Recurring, range],
    }
}

/// Builds the month-view predicate: events whose start falls inside the
/// month. Month views apply no recurring-event override.
pub fn month_filter(year: i32, month: u32) -> DateResult<FilterExpr> {
    let (first, last) = time::month_range(year, month)?;
    Ok(FilterExpr::Between {
        field: DateField::Start,
        from: first,
        to: last,
    })
}
