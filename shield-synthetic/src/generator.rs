//! Synthetic Data Generator — plausible fake records per data category.
//!
//! Each permission type maps to a distinct record shape; values come from the
//! fixed pools in [`crate::pools`] plus pseudo-random jitter. No
//! cryptographic randomness needed, but every record is internally
//! self-consistent (missed calls have zero duration, emails derive from the
//! contact's name).
//!
//! State: a per-type cache pre-populated at construction. `sample` draws
//! without replacement so repeated samples tend not to repeat immediately;
//! the cache is topped up whenever it runs short.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use shield_core::types::{
    fresh_id, now_ms, CallDirection, CallLogRecord, ContactRecord, FileRecord, LocationRecord,
    MessageDirection, MessageRecord, PermissionType, SyntheticRecord,
};

use crate::pools::{CITY_COORDINATES, DIRECTORIES, FILE_TYPES, MESSAGE_TEMPLATES, NAMES};

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

pub struct SyntheticDataGenerator {
    cache: Mutex<HashMap<PermissionType, Vec<SyntheticRecord>>>,
    rng: Mutex<SmallRng>,
    total_generated: AtomicU64,
    total_sampled: AtomicU64,
}

impl SyntheticDataGenerator {
    /// Entropy-seeded generator with `pregen` records cached per category.
    pub fn new(pregen: usize) -> Self {
        Self::with_rng(SmallRng::from_entropy(), pregen)
    }

    /// Deterministic variant for tests.
    pub fn with_seed(seed: u64, pregen: usize) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed), pregen)
    }

    fn with_rng(rng: SmallRng, pregen: usize) -> Self {
        let gen = Self {
            cache: Mutex::new(HashMap::new()),
            rng: Mutex::new(rng),
            total_generated: AtomicU64::new(0),
            total_sampled: AtomicU64::new(0),
        };
        for permission in PermissionType::ALL {
            gen.generate(permission, pregen);
        }
        gen
    }

    /// Generate `count` fresh records for the category, add them to the
    /// cache, and return them. Always succeeds.
    pub fn generate(&self, permission: PermissionType, count: usize) -> Vec<SyntheticRecord> {
        let records: Vec<SyntheticRecord> = {
            let mut rng = self.rng.lock();
            (0..count).map(|_| Self::generate_one(&mut rng, permission)).collect()
        };
        self.total_generated.fetch_add(records.len() as u64, Ordering::Relaxed);
        debug!(permission = %permission, count = records.len(), "Generated synthetic records");

        let mut cache = self.cache.lock();
        cache.entry(permission).or_default().extend(records.iter().cloned());
        records
    }

    /// Draw `count` records without replacement from the cached pool,
    /// regenerating first if the pool is smaller than requested.
    pub fn sample(&self, permission: PermissionType, count: usize) -> Vec<SyntheticRecord> {
        let cached = self.cache.lock().get(&permission).map_or(0, Vec::len);
        if cached < count {
            self.generate(permission, count - cached);
        }

        let mut cache = self.cache.lock();
        let pool = cache.entry(permission).or_default();
        let mut rng = self.rng.lock();
        let mut result = Vec::with_capacity(count);
        for _ in 0..count {
            if pool.is_empty() {
                break;
            }
            let idx = rng.gen_range(0..pool.len());
            result.push(pool.swap_remove(idx));
        }
        self.total_sampled.fetch_add(result.len() as u64, Ordering::Relaxed);
        result
    }

    /// Records currently cached for a category.
    pub fn cached(&self, permission: PermissionType) -> usize {
        self.cache.lock().get(&permission).map_or(0, Vec::len)
    }

    pub fn total_generated(&self) -> u64 {
        self.total_generated.load(Ordering::Relaxed)
    }

    pub fn total_sampled(&self) -> u64 {
        self.total_sampled.load(Ordering::Relaxed)
    }

    // ── Record builders ──────────────────────────────────────────────────────

    fn generate_one(rng: &mut SmallRng, permission: PermissionType) -> SyntheticRecord {
        match permission {
            PermissionType::CallLogs => SyntheticRecord::CallLog(Self::call_log(rng)),
            PermissionType::Messages => SyntheticRecord::Message(Self::message(rng)),
            PermissionType::FileAccess => SyntheticRecord::File(Self::file(rng)),
            PermissionType::Contacts => SyntheticRecord::Contact(Self::contact(rng)),
            PermissionType::Location => SyntheticRecord::Location(Self::location(rng)),
        }
    }

    fn call_log(rng: &mut SmallRng) -> CallLogRecord {
        let direction = match rng.gen_range(0..3) {
            0 => CallDirection::Incoming,
            1 => CallDirection::Outgoing,
            _ => CallDirection::Missed,
        };
        // Missed calls never connected.
        let duration_secs = if direction == CallDirection::Missed {
            0
        } else {
            rng.gen_range(10..=610)
        };
        CallLogRecord {
            id: fresh_id(),
            phone_number: Self::phone_number(rng),
            name: Self::maybe_name(rng, 0.7),
            direction,
            timestamp_ms: Self::past_timestamp(rng, 30),
            duration_secs,
        }
    }

    fn message(rng: &mut SmallRng) -> MessageRecord {
        let direction = if rng.gen_bool(0.5) {
            MessageDirection::Incoming
        } else {
            MessageDirection::Outgoing
        };
        MessageRecord {
            id: fresh_id(),
            phone_number: Self::phone_number(rng),
            name: Self::maybe_name(rng, 0.7),
            direction,
            timestamp_ms: Self::past_timestamp(rng, 30),
            content: MESSAGE_TEMPLATES[rng.gen_range(0..MESSAGE_TEMPLATES.len())].to_string(),
        }
    }

    fn file(rng: &mut SmallRng) -> FileRecord {
        let (ext, mime) = FILE_TYPES[rng.gen_range(0..FILE_TYPES.len())];
        let name = format!("file_{}.{ext}", rng.gen_range(0..1000));
        let dir = DIRECTORIES[rng.gen_range(0..DIRECTORIES.len())];
        FileRecord {
            id: fresh_id(),
            path: format!("/virtual/{dir}/{name}"),
            name,
            size_bytes: rng.gen_range(1_000..=10_001_000),
            mime_type: mime.to_string(),
            modified_ms: Self::past_timestamp(rng, 60),
        }
    }

    fn contact(rng: &mut SmallRng) -> ContactRecord {
        let name = NAMES[rng.gen_range(0..NAMES.len())].to_string();
        let email = if rng.gen_bool(0.8) {
            let mut parts = name.split_whitespace();
            let first = parts.next().unwrap_or("user").to_lowercase();
            let last = parts.next().unwrap_or("name").to_lowercase();
            Some(format!("{first}.{last}@example.com"))
        } else {
            None
        };
        let avatar = if rng.gen_bool(0.5) {
            Some(format!(
                "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
                name.replace(' ', "%20")
            ))
        } else {
            None
        };
        ContactRecord {
            id: fresh_id(),
            name,
            phone_number: Self::phone_number(rng),
            email,
            avatar,
        }
    }

    fn location(rng: &mut SmallRng) -> LocationRecord {
        let (_, lat, lng) = CITY_COORDINATES[rng.gen_range(0..CITY_COORDINATES.len())];
        // Roughly ±2.5km of jitter around the city center.
        let lat_offset = (rng.gen::<f64>() - 0.5) * 0.05;
        let lng_offset = (rng.gen::<f64>() - 0.5) * 0.05;
        LocationRecord {
            id: fresh_id(),
            latitude: lat + lat_offset,
            longitude: lng + lng_offset,
            accuracy_m: rng.gen_range(10..=60),
            timestamp_ms: Self::past_timestamp(rng, 3),
        }
    }

    fn phone_number(rng: &mut SmallRng) -> String {
        format!(
            "{}-{}-{}",
            rng.gen_range(200..1000),
            rng.gen_range(100..1000),
            rng.gen_range(1000..10000)
        )
    }

    fn maybe_name(rng: &mut SmallRng, known_probability: f64) -> Option<String> {
        if rng.gen_bool(known_probability) {
            Some(NAMES[rng.gen_range(0..NAMES.len())].to_string())
        } else {
            None
        }
    }

    fn past_timestamp(rng: &mut SmallRng, days_back: i64) -> i64 {
        now_ms() - rng.gen_range(0..days_back * MS_PER_DAY)
    }
}
