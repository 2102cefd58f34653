use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 7;

/// Source of entity identifiers. Ids only need to be unique within a session.
pub trait IdProvider: Send {
    fn next_id(&mut self, prefix: &str) -> String;
}

/// `prefix` followed by seven random base-36 characters. Not cryptographic.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdProvider for RandomIds {
    fn next_id(&mut self, prefix: &str) -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
            .collect();
        format!("{prefix}{suffix}")
    }
}

/// Deterministic `prefix-1`, `prefix-2`, ... counter shared across prefixes.
/// The dash keeps these apart from the bundled seed ids (`a1`, `b1`, ...).
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    issued: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdProvider for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        self.issued += 1;
        format!("{prefix}-{}", self.issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_have_prefix_and_suffix() {
        let id = RandomIds.next_id("a");
        assert!(id.starts_with('a'));
        assert_eq!(id.len(), 1 + SUFFIX_LEN);
        assert!(id[1..].bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id("a"), "a-1");
        assert_eq!(ids.next_id("m"), "m-2");
    }
}
