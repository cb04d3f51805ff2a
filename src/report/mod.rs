//! Report assembly
//!
//! Page records collected by the crawler are turned into a [`RecordSet`]:
//! sorted rows whose cells follow a [`ReportSchema`], with derived columns
//! computed and display hints (colors, hyperlinks) attached for the sinks.

mod builder;
pub mod derived;
mod hints;
mod record;
pub mod schema;

pub use builder::{RecordSet, RecordSetBuilder, ReportRow};
pub use derived::{DerivedColumn, EditLink, HostRewrite};
pub use hints::{ColorClass, DisplayHints};
pub use record::{PageRecord, RedirectCheck, PLACEHOLDER};
pub use schema::{Column, OptionalColumn, ReportSchema};
