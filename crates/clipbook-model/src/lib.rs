//! Data model for the clipbook review workflow.
//!
//! - [`RowSet`] is the row store: the ordered, fixed-length set of reviewable
//!   rows and their review status.
//! - [`Excerpt`] is one quoted, cited entry of the output document.
//! - [`SessionCounters`] are the derived pass/bullet tallies.

pub mod counters;
pub mod error;
pub mod excerpt;
pub mod row;
pub mod topic;

pub use counters::SessionCounters;
pub use error::{ModelError, Result};
pub use excerpt::Excerpt;
pub use row::{
    BULLETED_COLUMN, PASSED_COLUMN, Row, RowSet, RowStatus, StatusColumns, TOPIC_COLUMN,
};
pub use topic::{UNSORTED_TOPIC, normalize_topic};
