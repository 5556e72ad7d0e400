//! Shared fixtures for integration tests: roster files and scripted resolvers.

#![allow(dead_code)]

pub mod resolvers;
pub mod strategies;

pub use resolvers::*;

use facility_address::models::{FacilityRecord, Roster};
use std::path::{Path, PathBuf};

pub const HEADER: &str = "ID,address_normalized,医療機関名,郵便番号,都道府県,市区町村,address";

/// `n` facilities with ids `1..=n`
pub fn facility_records(n: usize) -> Vec<FacilityRecord> {
    (1..=n)
        .map(|i| {
            FacilityRecord::new(
                i.to_string(),
                format!("施設{i}"),
                "東京都",
                "千代田区",
                format!("100-{i:04}"),
                format!("旧住所{i}"),
                format!("東京都千代田区旧住所{i}"),
            )
        })
        .collect()
}

pub fn roster(n: usize) -> Roster {
    Roster::from_records(facility_records(n))
}

/// Write a roster CSV with `n` rows and the standard header
pub fn write_roster_csv(dir: &Path, n: usize) -> PathBuf {
    let mut contents = format!("{HEADER}\n");
    for i in 1..=n {
        contents.push_str(&format!(
            "{i},東京都千代田区旧住所{i},施設{i},100-{i:04},東京都,千代田区,旧住所{i}\n"
        ));
    }
    let path = dir.join("medical_facilities.csv");
    std::fs::write(&path, contents).unwrap();
    path
}

/// Ids listed in a checkpoint or output CSV, first column
pub fn ids_in_csv(path: &Path) -> Vec<String> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader
        .records()
        .map(|r| r.unwrap().get(0).unwrap().to_string())
        .collect()
}
