use core_types::Record;

/// Drops the newest record when it is still pending.
///
/// Expects most-recent-first input. Only the first record is inspected.
pub fn strip_pending(records: &[Record]) -> &[Record] {
    match records.split_first() {
        Some((newest, rest)) if newest.is_pending() => {
            tracing::debug!(period = newest.period, "Dropping pending newest record");
            rest
        }
        _ => records,
    }
}

/// The first `n` records, or all of them when the sequence is shorter.
pub fn window(records: &[Record], n: usize) -> &[Record] {
    &records[..n.min(records.len())]
}

/// Logs a hint when a sequence that should be most-recent-first is not.
/// Never rejects the input.
pub(crate) fn hint_if_not_descending(context: &str, records: &[Record]) {
    if let [first, second, ..] = records {
        if first.period < second.period {
            tracing::debug!(
                context,
                first = first.period,
                second = second.period,
                "Records do not appear to be in descending period order"
            );
        }
    }
}
