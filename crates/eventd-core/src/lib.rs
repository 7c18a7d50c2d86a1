//! Core types: events, date boundaries, filter expressions, formatting

pub mod event;
pub mod filter;
pub mod format;
pub mod query;
pub mod time;
pub mod tracing;

pub use event::{EventRecord, EventStatus, NormalizedEvent, RepeatMode};
pub use filter::{CmpOp, FilterExpr, full_filter, month_filter, range_filter};
pub use format::{EventSchedule, ScheduleView, format_event_info, format_event_range};
pub use query::{Anchor, DateField, QueryError, QueryParams, QueryResult};
pub use time::{Boundary, DateError, DateResult, month_range, parse_boundary};
pub use tracing::{LogFormat, TracingConfig, TracingError, init_tracing};
