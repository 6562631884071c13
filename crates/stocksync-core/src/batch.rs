//! Size-bounded batching for marketplace submissions.

use std::num::NonZeroUsize;
use std::slice::Chunks;

/// Splits `items` into contiguous chunks of at most `max_size` records.
///
/// Every chunk but the last holds exactly `max_size` items. Order is kept and
/// the chunks concatenate back to `items`. An empty input yields no chunks.
pub fn partition<T>(items: &[T], max_size: NonZeroUsize) -> Chunks<'_, T> {
    items.chunks(max_size.get())
}
