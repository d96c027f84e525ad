use super::kind::NodeKind;

/// Hands out `"<prefix>_<n>"` node ids.
///
/// The counter is shared by all kinds, starts at 1 and only ever grows, so an
/// id is never handed out twice during the allocator's lifetime, deletions
/// included. Once the counter cannot grow any further the allocator is
/// exhausted and hands out nothing.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: Option<u64>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: Some(1) }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next id for `kind`, or `None` once the counter is exhausted.
    pub fn next_id(&mut self, kind: NodeKind) -> Option<String> {
        let n = self.next?;
        self.next = n.checked_add(1);
        Some(format!("{}_{}", kind.id_prefix(), n))
    }

    /// Moves the counter past the numeric suffix of an existing id, if it has one.
    ///
    /// Suffixes the counter cannot move past are ignored; the store skips such
    /// ids when they come up.
    pub fn observe(&mut self, id: &str) {
        let after = id
            .rsplit_once('_')
            .and_then(|(_, n)| n.parse::<u64>().ok())
            .and_then(|n| n.checked_add(1));
        if let (Some(after), Some(next)) = (after, self.next) {
            self.next = Some(next.max(after));
        }
    }

    /// The counter value the next id will carry.
    pub fn peek(&self) -> Option<u64> {
        self.next
    }
}
