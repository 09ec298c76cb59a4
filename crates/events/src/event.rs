use chrono::{DateTime, Utc};

/// A fact recorded by an aggregate.
///
/// Implementations are plain data: cloning one must not have side effects,
/// and the reported `event_type` never changes for a given variant.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable dotted name, e.g. `"bank.account.opened"`.
    fn event_type(&self) -> &'static str;

    /// Schema version of the payload.
    fn version(&self) -> u32;

    /// Wall-clock time the fact was recorded.
    fn occurred_at(&self) -> DateTime<Utc>;
}
