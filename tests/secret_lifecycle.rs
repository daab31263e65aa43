//! Lifecycle properties of one-time secrets, exercised through the public API
//! against both storage backends.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

use chrono::{DateTime, Duration, Utc};
use secretdrop::config::{SecretDropPaths, Settings};
use secretdrop::crypto::ENVELOPE_OVERHEAD;
use secretdrop::services::{Clock, SecretService};
use secretdrop::storage::{FileSecretStore, MemorySecretStore, SecretStorage};
use secretdrop::SecretDropError;
use tempfile::TempDir;

#[derive(Clone)]
struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

impl ManualClock {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(Utc::now())))
    }

    fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

fn fast_settings() -> Settings {
    Settings {
        kdf_iterations: 1_000,
        ..Settings::default()
    }
}

fn file_service(temp_dir: &TempDir) -> SecretService<FileSecretStore> {
    let paths = SecretDropPaths::with_base_dir(temp_dir.path().to_path_buf());
    SecretService::new(FileSecretStore::open(&paths).unwrap(), fast_settings()).unwrap()
}

fn assert_round_trip<S: SecretStorage>(service: &SecretService<S>) {
    let samples = [
        "x",
        "db-password-xyz",
        "multi\nline\r\nsecret\twith tabs",
        "ünïcødé ✓ 秘密",
    ];
    for plaintext in samples {
        let id = service.create(plaintext, "correct-horse-battery-staple").unwrap();
        let read = service.consume(&id, "correct-horse-battery-staple").unwrap();
        assert_eq!(read.as_str(), plaintext);
    }
}

#[test]
fn round_trip_memory_store() {
    let service = SecretService::new(MemorySecretStore::new(), fast_settings()).unwrap();
    assert_round_trip(&service);
}

#[test]
fn round_trip_file_store() {
    let temp_dir = TempDir::new().unwrap();
    assert_round_trip(&file_service(&temp_dir));
}

#[test]
fn example_scenario_wrong_then_right_passphrase() {
    let temp_dir = TempDir::new().unwrap();
    let service = file_service(&temp_dir);

    let id = service
        .create("db-password-xyz", "correct-horse-battery-staple")
        .unwrap();

    let first = service.consume(&id, "wrong-pass");
    assert!(matches!(first, Err(SecretDropError::WrongPassphrase)));

    let second = service.consume(&id, "correct-horse-battery-staple");
    assert!(matches!(second, Err(SecretDropError::NotFound)));
}

#[test]
fn successful_read_is_the_only_read() {
    let temp_dir = TempDir::new().unwrap();
    let service = file_service(&temp_dir);

    let id = service.create("once", "pass").unwrap();
    assert_eq!(service.consume(&id, "pass").unwrap().as_str(), "once");

    for _ in 0..3 {
        assert!(service.consume(&id, "pass").unwrap_err().is_not_found());
    }
    assert_eq!(service.storage().count().unwrap(), 0);
}

#[test]
fn expired_secret_is_not_found_with_correct_passphrase() {
    let clock = ManualClock::new();
    let service =
        SecretService::with_clock(MemorySecretStore::new(), fast_settings(), clock.clone())
            .unwrap();

    let id = service.create("late", "pass").unwrap();
    clock.advance(Duration::minutes(11));

    assert!(service.consume(&id, "pass").unwrap_err().is_not_found());
}

#[test]
fn short_ttl_expires_on_file_store() {
    let temp_dir = TempDir::new().unwrap();
    let paths = SecretDropPaths::with_base_dir(temp_dir.path().to_path_buf());
    let clock = ManualClock::new();
    let settings = Settings {
        ttl_seconds: 1,
        ..fast_settings()
    };
    let service =
        SecretService::with_clock(FileSecretStore::open(&paths).unwrap(), settings, clock.clone())
            .unwrap();

    let id = service.create("brief", "pass").unwrap();
    clock.advance(Duration::seconds(1));

    assert!(service.consume(&id, "pass").unwrap_err().is_not_found());
    assert!(!service.storage().contains(&id).unwrap());
}

#[test]
fn not_found_cases_are_indistinguishable() {
    let clock = ManualClock::new();
    let service =
        SecretService::with_clock(MemorySecretStore::new(), fast_settings(), clock.clone())
            .unwrap();

    let consumed = service.create("a", "pass").unwrap();
    service.consume(&consumed, "pass").unwrap();
    let expired = service.create("b", "pass").unwrap();
    clock.advance(Duration::minutes(30));
    let never = secretdrop::crypto::generate_id();

    let messages: Vec<String> = [consumed, expired, never]
        .iter()
        .map(|id| service.consume(id, "pass").unwrap_err().to_string())
        .collect();

    assert!(messages.iter().all(|m| m == &messages[0]));
}

#[test]
fn identical_inputs_store_unrelated_rows() {
    let temp_dir = TempDir::new().unwrap();
    let service = file_service(&temp_dir);
    let paths = SecretDropPaths::with_base_dir(temp_dir.path().to_path_buf());

    service.create("same plaintext", "same passphrase").unwrap();
    service.create("same plaintext", "same passphrase").unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(paths.secrets_file()).unwrap()).unwrap();
    let rows = raw["secrets"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_ne!(rows[0]["id"], rows[1]["id"]);
    assert_ne!(rows[0]["salt"], rows[1]["salt"]);
    assert_ne!(rows[0]["ciphertext"], rows[1]["ciphertext"]);
}

#[test]
fn stored_file_contains_no_plaintext_or_passphrase() {
    let temp_dir = TempDir::new().unwrap();
    let service = file_service(&temp_dir);
    let paths = SecretDropPaths::with_base_dir(temp_dir.path().to_path_buf());

    let created = service
        .create_detailed("plaintext-marker-123", "passphrase-marker-456")
        .unwrap();

    let contents = std::fs::read_to_string(paths.secrets_file()).unwrap();
    assert!(!contents.contains("plaintext-marker-123"));
    assert!(!contents.contains("passphrase-marker-456"));

    let row = service.storage().count().unwrap();
    assert_eq!(row, 1);
    assert!(created.expires_at > Utc::now());
}

#[test]
fn ciphertext_carries_fixed_overhead() {
    let service = SecretService::new(MemorySecretStore::new(), fast_settings()).unwrap();
    let id = service.create("twelve bytes", "pass").unwrap();
    let stored = service.storage().peek(&id).unwrap().unwrap();
    assert_eq!(stored.size(), "twelve bytes".len() + ENVELOPE_OVERHEAD);
}

#[test]
fn oversized_secret_rejected_without_persisting() {
    let temp_dir = TempDir::new().unwrap();
    let service = file_service(&temp_dir);

    let result = service.create(&"z".repeat(50 * 1024 + 1), "pass");
    assert!(result.unwrap_err().is_validation());
    assert_eq!(service.storage().count().unwrap(), 0);
}

#[test]
fn configured_size_bound_is_honoured() {
    let settings = Settings {
        max_secret_bytes: 8,
        ..fast_settings()
    };
    let service = SecretService::new(MemorySecretStore::new(), settings).unwrap();

    assert!(service.create("12345678", "pass").is_ok());
    assert!(service.create("123456789", "pass").unwrap_err().is_validation());
}

fn race<S, F>(service: &SecretService<S>, contenders: usize, passphrase_for: F)
where
    S: SecretStorage,
    F: Fn(usize) -> &'static str + Sync,
{
    let id = service.create("contested", "right").unwrap();
    let barrier = Barrier::new(contenders);
    let successes = AtomicUsize::new(0);
    let failures = AtomicUsize::new(0);

    std::thread::scope(|s| {
        for n in 0..contenders {
            let barrier = &barrier;
            let successes = &successes;
            let failures = &failures;
            let passphrase_for = &passphrase_for;
            s.spawn(move || {
                barrier.wait();
                match service.consume(&id, passphrase_for(n)) {
                    Ok(plaintext) => {
                        assert_eq!(plaintext.as_str(), "contested");
                        successes.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(SecretDropError::NotFound | SecretDropError::WrongPassphrase) => {
                        failures.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(e) => panic!("unexpected error: {}", e),
                }
            });
        }
    });

    assert!(successes.load(Ordering::SeqCst) <= 1);
    assert_eq!(
        successes.load(Ordering::SeqCst) + failures.load(Ordering::SeqCst),
        contenders
    );
}

#[test]
fn concurrent_consumers_memory_store_single_winner() {
    let service = SecretService::new(MemorySecretStore::new(), fast_settings()).unwrap();
    for contenders in [2, 4, 16] {
        let id = service.create("contested", "right").unwrap();
        let barrier = Barrier::new(contenders);
        let successes = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..contenders {
                s.spawn(|| {
                    barrier.wait();
                    if service.consume(&id, "right").is_ok() {
                        successes.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(successes.load(Ordering::SeqCst), 1, "{} contenders", contenders);
    }
}

#[test]
fn concurrent_consumers_file_store_single_winner() {
    let temp_dir = TempDir::new().unwrap();
    let paths = SecretDropPaths::with_base_dir(temp_dir.path().to_path_buf());
    let creator = file_service(&temp_dir);

    for contenders in [2, 8] {
        let id = creator.create("contested", "right").unwrap();
        let barrier = Barrier::new(contenders);
        let successes = AtomicUsize::new(0);
        let not_found = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..contenders {
                s.spawn(|| {
                    // Independent service and store handle per thread
                    let service = SecretService::new(
                        FileSecretStore::open(&paths).unwrap(),
                        fast_settings(),
                    )
                    .unwrap();
                    barrier.wait();
                    match service.consume(&id, "right") {
                        Ok(_) => successes.fetch_add(1, Ordering::SeqCst),
                        Err(e) => {
                            assert!(e.is_not_found(), "unexpected error: {}", e);
                            not_found.fetch_add(1, Ordering::SeqCst)
                        }
                    };
                });
            }
        });

        assert_eq!(successes.load(Ordering::SeqCst), 1);
        assert_eq!(not_found.load(Ordering::SeqCst), contenders - 1);
    }
}

#[test]
fn mixed_passphrase_race_never_yields_two_reads() {
    let service = SecretService::new(MemorySecretStore::new(), fast_settings()).unwrap();
    for _ in 0..5 {
        race(&service, 8, |n| if n % 2 == 0 { "right" } else { "wrong" });
    }
}

#[test]
fn mixed_passphrase_race_on_file_store_never_yields_two_reads() {
    let temp_dir = TempDir::new().unwrap();
    let paths = SecretDropPaths::with_base_dir(temp_dir.path().to_path_buf());
    let service =
        SecretService::new(FileSecretStore::open(&paths).unwrap(), fast_settings()).unwrap();
    for _ in 0..3 {
        race(&service, 6, |n| if n % 3 == 0 { "right" } else { "wrong" });
    }
    assert_eq!(service.storage().count().unwrap(), 0);
}

#[test]
fn sweep_reclaims_expired_rows_on_file_store() {
    let temp_dir = TempDir::new().unwrap();
    let paths = SecretDropPaths::with_base_dir(temp_dir.path().to_path_buf());
    let clock = ManualClock::new();
    let service = SecretService::with_clock(
        FileSecretStore::open(&paths).unwrap(),
        fast_settings(),
        clock.clone(),
    )
    .unwrap();

    service.create("one", "pass").unwrap();
    service.create("two", "pass").unwrap();
    assert_eq!(service.sweep().unwrap(), 0);

    clock.advance(Duration::minutes(10));
    assert_eq!(service.sweep().unwrap(), 2);
    assert_eq!(service.storage().count().unwrap(), 0);
}
