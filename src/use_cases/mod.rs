pub mod reconcile_report;
pub mod send_order;

pub use reconcile_report::{
    ReconError, ReconSettings, ReconSummary, ReconcileReport, RecordOutcome, SectionCount,
    SkipReason,
};
pub use send_order::{OrderOutcome, SendOrder, SendOrderError};
