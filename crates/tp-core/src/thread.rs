//! Thread root resolution over the ledger's parent pointers.

use tracing::warn;

use crate::{domain::MessageId, ports::Ledger};

/// Upper bound on parent hops. Replies always point at a resolved root, so real
/// chains are one hop long; the cap only guards against a corrupted ledger.
pub const MAX_THREAD_HOPS: usize = 1024;

/// Return the id of the message that started `id`'s thread.
///
/// A message without a parent is its own root. Never fails: on a missing
/// message, a storage error, a non-decreasing parent or too many hops, `id`
/// itself is returned.
pub async fn resolve_thread_root(ledger: &dyn Ledger, id: MessageId) -> MessageId {
    let mut current = id;
    for _ in 0..MAX_THREAD_HOPS {
        let message = match ledger.get(current).await {
            Ok(Some(m)) => m,
            Ok(None) => {
                warn!(message_id = id.0, missing = current.0, "thread walk hit a missing message");
                return id;
            }
            Err(e) => {
                warn!(message_id = id.0, "thread walk failed: {e}");
                return id;
            }
        };

        match message.thread_id {
            None => return current,
            // Parents are always older; anything else would loop.
            Some(parent) if parent < current => current = parent,
            Some(parent) => {
                warn!(message_id = id.0, parent = parent.0, "thread parent does not precede child");
                return id;
            }
        }
    }

    warn!(message_id = id.0, "thread walk exceeded {MAX_THREAD_HOPS} hops");
    id
}
