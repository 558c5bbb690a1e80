//! Parsing and normalization of the clearing network's daily report.

mod banks;
pub mod error;
pub mod normalize;
pub mod record;
pub mod report;

pub use error::ParseError;
pub use normalize::{account_type_for, amount_from_minor_units, bank_code_for, parse_record, RawRecord};
pub use record::ReportRecord;
pub use report::{ReportReader, ReportSection, SECTION_COUNT};
