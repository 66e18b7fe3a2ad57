//! Volatile report storage keyed by opaque random identifiers.

use std::collections::HashMap;
use std::sync::RwLock;

use rand::Rng;

use crate::report::Report;

/// Alphabet for report identifiers (lowercase base 36).
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
/// Length of generated report identifiers.
const ID_LEN: usize = 9;

/// Key-value abstraction over report persistence.
///
/// The engine stays storage-agnostic; callers inject whichever
/// implementation suits their deployment.
pub trait ReportStore: Send + Sync {
    /// Stores `report` under `id`, replacing any existing entry.
    fn put(&self, id: &str, report: Report);
    /// Returns the report stored under `id`, if any.
    fn get(&self, id: &str) -> Option<Report>;
}

/// Process-lifetime in-memory store.
///
/// Entries are never evicted. This is a deliberate simplification for a
/// single-process deployment, not a durability guarantee.
#[derive(Debug, Default)]
pub struct InMemoryReportStore {
    reports: RwLock<HashMap<String, Report>>,
}

impl InMemoryReportStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reports.
    pub fn len(&self) -> usize {
        self.reports.read().expect("report store lock poisoned").len()
    }

    /// Whether the store holds no reports.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReportStore for InMemoryReportStore {
    fn put(&self, id: &str, report: Report) {
        self.reports
            .write()
            .expect("report store lock poisoned")
            .insert(id.to_string(), report);
    }

    fn get(&self, id: &str) -> Option<Report> {
        self.reports
            .read()
            .expect("report store lock poisoned")
            .get(id)
            .cloned()
    }
}

/// Generates an opaque 9-character report identifier.
///
/// Identifiers are random, not sequential, so they leak nothing about how
/// many reports exist.
pub fn generate_report_id() -> String {
    let mut rng = rand::rng();
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::Tariff;
    use crate::report::{FleetInput, Report};

    fn sample_report() -> Report {
        let input = FleetInput {
            num_ev: 10,
            daily_mileage_mi: 100.0,
            battery_capacity_kwh: 60.0,
            charge_power_kw: 50.0,
            efficiency_mi_per_kwh: 4.0,
            battery_dod: [10.0, 90.0],
            working_hours: [7.0, 19.0],
        };
        Report::from_input(&input, &Tariff::default(), 0.9).unwrap()
    }

    #[test]
    fn put_get_round_trip() {
        let store = InMemoryReportStore::new();
        let report = sample_report();
        store.put("abc123xyz", report.clone());
        let got = store.get("abc123xyz").expect("report should be stored");
        assert_eq!(got.input.num_ev, report.input.num_ev);
        assert_eq!(got.charge_time_per_ev_hr, report.charge_time_per_ev_hr);
    }

    #[test]
    fn missing_key_returns_none() {
        let store = InMemoryReportStore::new();
        assert!(store.get("nope").is_none());
    }

    #[test]
    fn put_replaces_existing_entry() {
        let store = InMemoryReportStore::new();
        let mut report = sample_report();
        store.put("k", report.clone());
        report.input.num_ev = 99;
        store.put("k", report);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("k").map(|r| r.input.num_ev), Some(99));
    }

    #[test]
    fn generated_ids_have_expected_shape() {
        for _ in 0..50 {
            let id = generate_report_id();
            assert_eq!(id.len(), 9);
            assert!(id.bytes().all(|b| ID_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = generate_report_id();
        let b = generate_report_id();
        // 36^9 keys; a collision here points at a broken generator.
        assert_ne!(a, b);
    }
}
