use crc32fast::Hasher;

/// Source of fresh node ids
///
/// Implementations must never hand out the same id twice.
pub trait IdSource {
    fn next_id(&mut self) -> String;

    /// Continue after ids handed out by an earlier session
    ///
    /// `last` is a stored counter and `existing` the ids already in the tree.
    fn resume(&mut self, _last: u32, _existing: &[&str]) {}
}

/// Generate a document seed from an agreement reference using CRC32
pub fn get_document_id(reference: &str) -> String {
    let mut buff = String::from(reference);
    if !reference.starts_with("agreement://") {
        buff = format!("agreement://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for nodes within one agreement
#[derive(Debug, Clone)]
pub struct IDGenerator {
    seed: String, // Document ID (CRC32)
    count: u32,   // Sequential counter
}

impl IDGenerator {
    pub fn new(reference: &str) -> Self {
        Self {
            seed: get_document_id(reference),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Get document ID seed
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Counter of the last generated id
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Counter encoded in `id` if it was generated from this seed
    fn counter_of(&self, id: &str) -> Option<u32> {
        id.strip_prefix(self.seed.as_str())?
            .strip_prefix('-')?
            .parse()
            .ok()
    }
}

impl IdSource for IDGenerator {
    fn next_id(&mut self) -> String {
        self.new_id()
    }

    fn resume(&mut self, last: u32, existing: &[&str]) {
        let highest = existing
            .iter()
            .filter_map(|id| self.counter_of(id))
            .fold(last, u32::max);
        self.count = self.count.max(highest);
    }
}

/// Draw ids from `source` until one is not taken
///
/// Hydrated documents may already hold ids from an earlier session that used
/// the same seed, so generated ids are checked against the tree.
pub fn fresh_id(source: &mut dyn IdSource, is_taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = source.next_id();
        if !id.is_empty() && !is_taken(&id) {
            return id;
        }
    }
}
