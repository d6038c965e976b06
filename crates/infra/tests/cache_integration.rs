//! Cross-instance behaviour of the file-backed caches
//!
//! Every test opens several cache instances on the same directory the way
//! the daemon (writer) and restricted processes (readers) do.

use std::sync::Arc;
use std::thread;

use tempfile::TempDir;
use vpnrest_core::{FailureCounterStore, TransportStrategy};
use vpnrest_domain::constants::{default_endpoint, ADDRESS_CACHE_FILE};
use vpnrest_domain::{CachedAddresses, Endpoint, TransportKind};
use vpnrest_infra::{EndpointCache, FileFailureCounter};

fn endpoint(s: &str) -> Endpoint {
    s.parse().unwrap()
}

#[test]
fn test_fresh_cache_serves_default_endpoint() {
    let dir = TempDir::new().unwrap();
    let cache = EndpointCache::new(dir.path(), default_endpoint(), false);

    assert_eq!(cache.current_endpoint().to_string(), "45.83.223.196:443");
    assert_eq!(cache.get_endpoints(), vec![default_endpoint()]);
    assert!(cache.updated_at().is_some());
}

#[test]
fn test_read_only_instance_sees_writer_updates() {
    let dir = TempDir::new().unwrap();
    let writer = EndpointCache::new(dir.path(), default_endpoint(), false);
    let reader = EndpointCache::new(dir.path(), default_endpoint(), true);

    writer.set_endpoints(&[endpoint("1.2.3.4:443")]);

    assert_eq!(reader.current_endpoint(), endpoint("1.2.3.4:443"));
    assert_eq!(writer.current_endpoint(), endpoint("1.2.3.4:443"));
}

#[test]
fn test_stored_endpoint_survives_reordered_list() {
    let dir = TempDir::new().unwrap();
    let cache = EndpointCache::new(dir.path(), default_endpoint(), false);
    let a = endpoint("1.1.1.1:443");
    let b = endpoint("2.2.2.2:443");

    cache.set_endpoints(&[a, b]);
    let first_update = cache.updated_at().unwrap();
    assert_eq!(cache.get_endpoints(), vec![a]);

    cache.set_endpoints(&[b, a]);
    assert_eq!(cache.get_endpoints(), vec![a]);
    assert!(cache.updated_at().unwrap() >= first_update);

    // Once the stored endpoint disappears from the list it is replaced.
    cache.set_endpoints(&[b]);
    assert_eq!(cache.get_endpoints(), vec![b]);
}

#[test]
fn test_document_on_disk_has_expected_shape() {
    let dir = TempDir::new().unwrap();
    let cache = EndpointCache::new(dir.path(), default_endpoint(), false);
    cache.set_endpoints(&[endpoint("[2a03:1b20::1]:443")]);

    let raw = std::fs::read_to_string(dir.path().join(ADDRESS_CACHE_FILE)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["endpoints"], serde_json::json!(["[2a03:1b20::1]:443"]));
    assert!(json["updatedAt"].is_string());

    let decoded: CachedAddresses = serde_json::from_str(&raw).unwrap();
    assert_eq!(decoded.current(), Some(endpoint("[2a03:1b20::1]:443")));
}

#[test]
fn test_empty_stored_list_reads_as_default() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(ADDRESS_CACHE_FILE),
        r#"{"updatedAt":"2024-01-01T00:00:00Z","endpoints":[]}"#,
    )
    .unwrap();

    let reader = EndpointCache::new(dir.path(), default_endpoint(), true);
    assert_eq!(reader.current_endpoint(), default_endpoint());
}

#[test]
fn test_concurrent_increments_are_not_lost() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().to_path_buf();

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let path = path.clone();
            thread::spawn(move || {
                let counter = FileFailureCounter::new(&path, false);
                for _ in 0..10 {
                    counter.increment().unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(FileFailureCounter::new(&path, true).load().unwrap(), 40);
}

#[test]
fn test_transport_escalation_survives_restart() {
    let dir = TempDir::new().unwrap();

    let strategy = TransportStrategy::new(Arc::new(FileFailureCounter::new(dir.path(), false)));
    assert_eq!(strategy.suggested_transport(), TransportKind::Direct);
    assert_eq!(strategy.on_failure(), 1);
    assert_eq!(strategy.suggested_transport(), TransportKind::Obfuscated);
    drop(strategy);

    let restarted = TransportStrategy::new(Arc::new(FileFailureCounter::new(dir.path(), false)));
    assert_eq!(restarted.failure_count(), 1);
    assert_eq!(restarted.on_failure(), 2);
    assert_eq!(restarted.suggested_transport(), TransportKind::Obfuscated);
    assert_eq!(restarted.on_failure(), 3);
    assert_eq!(restarted.suggested_transport(), TransportKind::Direct);

    let observer = TransportStrategy::new(Arc::new(FileFailureCounter::new(dir.path(), true)));
    assert_eq!(observer.failure_count(), 3);
}

#[test]
fn test_read_only_process_escalates_from_local_failures() {
    let dir = TempDir::new().unwrap();
    let writer = FileFailureCounter::new(dir.path(), false);

    let restricted = TransportStrategy::new(Arc::new(FileFailureCounter::new(dir.path(), true)));
    assert_eq!(restricted.on_failure(), 1);
    assert_eq!(restricted.failure_count(), 1);
    assert_eq!(restricted.suggested_transport(), TransportKind::Obfuscated);

    // Nothing reached the shared file
    assert_eq!(writer.load().unwrap(), 0);

    // Failures recorded by the writer still count for the restricted process
    writer.increment().unwrap();
    assert_eq!(restricted.failure_count(), 2);
    assert_eq!(restricted.suggested_transport(), TransportKind::Obfuscated);
}
