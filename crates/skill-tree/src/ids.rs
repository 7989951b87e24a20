//! Node id generation

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::tree::NodeId;

/// Process-wide sequence shared by every generator, so two engines never
/// hand out the same id even within the same millisecond.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

const RANDOM_SUFFIX_LEN: usize = 6;

/// Generates ids of the form `<prefix>_<millis>_<seq><random>`
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
}

impl IdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Produce the next id
    pub fn next_id(&self) -> NodeId {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(RANDOM_SUFFIX_LEN)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();

        NodeId::new(format!(
            "{}_{}_{}{}",
            self.prefix,
            millis,
            to_base36(seq),
            suffix
        ))
    }

    /// Produce the next id that `taken` does not claim
    pub fn next_unused(&self, mut taken: impl FnMut(&NodeId) -> bool) -> NodeId {
        loop {
            let id = self.next_id();
            if !taken(&id) {
                return id;
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new("node")
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
