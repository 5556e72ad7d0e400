//! # Pipeline Constants
//!
//! Column names, defaults and artifact naming shared by the loader, the
//! checkpoint writer and the merger.

/// Default number of records per batch (one checkpoint per batch)
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Default pacing between resolver calls
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 1000;

/// Default number of in-flight lookups within a batch
pub const DEFAULT_LOOKUP_CONCURRENCY: usize = 1;

/// Suffix stem for interim checkpoint artifacts: `<output>.interim_<n>`
pub const DEFAULT_INTERIM_SUFFIX: &str = "interim";

pub const DEFAULT_INPUT_PATH: &str = "data/input/medical_facilities.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "data/output";
pub const DEFAULT_OUTPUT_STEM: &str = "updated_addresses";

/// Default input header names, as found in the facility roster export
pub mod input_columns {
    pub const ID: &str = "ID";
    pub const NORMALIZED_ADDRESS: &str = "address_normalized";
    pub const FACILITY_NAME: &str = "医療機関名";
    pub const POSTAL_CODE: &str = "郵便番号";
    pub const PREFECTURE: &str = "都道府県";
    pub const CITY: &str = "市区町村";
    pub const STREET_ADDRESS: &str = "address";
}

/// Checkpoint artifact header, in write order
pub mod checkpoint_columns {
    pub const ID: &str = "id";
    pub const MEDICAL_NAME: &str = "medical_name";
    pub const OLD_POSTAL_CODE: &str = "old_postal_code";
    pub const OLD_CITY: &str = "old_city";
    pub const OLD_ADDRESS: &str = "old_address";
    pub const NEW_POSTAL_CODE: &str = "new_postal_code";
    pub const NEW_CITY: &str = "new_city";
    pub const NEW_ADDRESS: &str = "new_address";
    pub const ERROR_MESSAGE: &str = "error_message";
    pub const STATUS: &str = "status";

    pub const ALL: [&str; 10] = [
        ID,
        MEDICAL_NAME,
        OLD_POSTAL_CODE,
        OLD_CITY,
        OLD_ADDRESS,
        NEW_POSTAL_CODE,
        NEW_CITY,
        NEW_ADDRESS,
        ERROR_MESSAGE,
        STATUS,
    ];
}

/// Columns appended to the original header in the final output
pub const MERGED_COLUMNS: [&str; 3] = [
    checkpoint_columns::NEW_POSTAL_CODE,
    checkpoint_columns::NEW_CITY,
    checkpoint_columns::NEW_ADDRESS,
];

/// Operational events emitted through the run reporter
pub mod events {
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_COMPLETED: &str = "run.completed";
    pub const RUN_FAILED: &str = "run.failed";
    pub const BATCH_STARTED: &str = "batch.started";
    pub const BATCH_COMPLETED: &str = "batch.completed";
    pub const LOOKUP_COMPLETED: &str = "lookup.completed";
    pub const LOOKUP_FAILED: &str = "lookup.failed";
    pub const CHECKPOINT_WRITTEN: &str = "checkpoint.written";
    pub const CHECKPOINT_FAILED: &str = "checkpoint.failed";
    pub const MERGE_COMPLETED: &str = "merge.completed";
}
