//! Benchmark utilities.

use rand::Rng;
use recordlog_core::RecordLog;
use std::path::Path;

/// Generate random record payload of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Generate a batch of payloads with the specified size.
pub fn generate_payloads(count: usize, payload_size: usize) -> Vec<Vec<u8>> {
    (0..count).map(|_| random_data(payload_size)).collect()
}

/// Write `count` random records of `payload_size` bytes to a new log at `path`.
pub fn populate(path: &Path, count: usize, payload_size: usize) {
    let mut log = RecordLog::open(path).expect("Failed to open bench log");
    for payload in generate_payloads(count, payload_size) {
        log.append(&payload).expect("Failed to append");
    }
    log.commit().expect("Failed to commit");
    log.close().expect("Failed to close bench log");
}
