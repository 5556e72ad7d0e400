//! # Data Model
//!
//! Input facilities, per-record results and the enriched output table.

pub mod facility;
pub mod result_record;
pub mod final_table;

pub use facility::{FacilityQuery, FacilityRecord, Roster};
pub use final_table::{EnrichedRow, FinalTable};
pub use result_record::{ResolutionDetail, ResolvedAddress, ResultRecord, ResultStatus};
