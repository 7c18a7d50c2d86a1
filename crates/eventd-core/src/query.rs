//! Query parameters and request validation.
//!
//! [`QueryParams`] is the immutable input of a date-range query. It is built
//! either programmatically (builder methods) or from raw request strings via
//! [`QueryParams::from_request`], which performs the full validation pass:
//! boundary parsing and anchor selection. Validation failures identify the
//! offending parameter and never fall back to defaults.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::{self, Boundary, DateError};

/// Which timestamp of an event a date filter compares against.
///
/// `Overlap` is the default: most callers want "events happening during this
/// window", not "events that start in it".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Compare against the event start time.
    Start,
    /// Compare against the event end time.
    End,
    /// Interval intersection between the window and the event's span.
    #[default]
    Overlap,
}

impl Anchor {
    /// Parses the request-level anchor string.
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        match raw {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            "overlap" => Ok(Self::Overlap),
            _ => Err(QueryError::InvalidAnchor {
                input: raw.to_string(),
            }),
        }
    }

    /// Returns the request-level string for this anchor.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Overlap => "overlap",
        }
    }

    /// The event field single-sided comparisons read for this anchor.
    ///
    /// `Overlap` compares against the end field on one side; its two-sided
    /// form is built separately by the filter layer.
    pub fn date_field(&self) -> DateField {
        match self {
            Self::Start => DateField::Start,
            Self::End | Self::Overlap => DateField::End,
        }
    }
}

/// The event timestamp a comparison reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    /// The event start time.
    Start,
    /// The event end time.
    End,
}

/// Result type for query validation.
pub type QueryResult<T> = Result<T, QueryError>;

/// Request-rejection errors raised while validating query input.
///
/// All three are deterministic and caller-fixable; none is ever silently
/// coerced into a default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A date parameter does not match `YYYY-MM-DD`.
    #[error("parameter `{param}` is not in the correct format, use YYYY-MM-DD")]
    MalformedDate { param: &'static str, input: String },

    /// A date parameter names a calendrically invalid date.
    #[error("parameter `{param}` is an impossible date: {input}")]
    ImpossibleDate { param: &'static str, input: String },

    /// The anchor is not one of `start`, `end`, `overlap`.
    #[error("`{input}` is not an accepted value, use start, end or overlap")]
    InvalidAnchor { input: String },
}

/// Immutable parameters of one date-range query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    /// Lower bound of the window (inclusive).
    pub from: Option<NaiveDateTime>,
    /// Upper bound of the window (inclusive).
    pub to: Option<NaiveDateTime>,
    /// Which event timestamp the window applies to.
    pub anchor: Anchor,
    /// Maximum number of results, applied after ordering.
    pub limit: Option<usize>,
}

impl QueryParams {
    /// Creates empty parameters: no window, overlap anchor, no limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates raw request strings into typed parameters.
    ///
    /// A bare `from` date floors to 00:00:00, a bare `to` date ceilings to
    /// 23:59:59. An absent `at` defaults to `overlap`.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure; the store is never consulted
    /// for invalid input.
    pub fn from_request(
        from: Option<&str>,
        to: Option<&str>,
        at: Option<&str>,
    ) -> QueryResult<Self> {
        let anchor = match at {
            Some(raw) => Anchor::parse(raw)?,
            None => Anchor::default(),
        };
        let from = from
            .map(|raw| parse_param(raw, "from", Boundary::From))
            .transpose()?;
        let to = to
            .map(|raw| parse_param(raw, "to", Boundary::To))
            .transpose()?;

        Ok(Self {
            from,
            to,
            anchor,
            limit: None,
        })
    }

    /// Builder method to set the lower bound.
    pub fn with_from(mut self, from: NaiveDateTime) -> Self {
        self.from = Some(from);
        self
    }

    /// Builder method to set the upper bound.
    pub fn with_to(mut self, to: NaiveDateTime) -> Self {
        self.to = Some(to);
        self
    }

    /// Builder method to set the anchor.
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Builder method to set the result limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

fn parse_param(
    raw: &str,
    param: &'static str,
    boundary: Boundary,
) -> QueryResult<NaiveDateTime> {
    time::parse_boundary(raw, boundary).map_err(|err| match err {
        DateError::MalformedDate { input } => QueryError::MalformedDate { param, input },
        DateError::ImpossibleDate { input } => QueryError::ImpossibleDate { param, input },
        DateError::InvalidMonth { .. } => QueryError::MalformedDate {
            param,
            input: raw.to_string(),
        },
    })
}
