use std::num::NonZeroUsize;

use serde_json::Value;

use crate::message::Progress;

/// Splits `items` into contiguous batches of at most `batch_size`, keeping order.
pub fn split_into_batches(items: Vec<Value>, batch_size: NonZeroUsize) -> Vec<Vec<Value>> {
    let batch_size = batch_size.get();
    let mut batches = Vec::with_capacity(items.len().div_ceil(batch_size));
    let mut item_iterator = items.into_iter();

    loop {
        let batch: Vec<_> = item_iterator.by_ref().take(batch_size).collect();
        if batch.is_empty() {
            break;
        }
        batches.push(batch);
    }

    batches
}

/// Progress reported with the batch at `batch_index`.
///
/// `current` counts nominal batch sizes, so on a trailing partial batch it is
/// larger than `total`. Consumers rely on this arithmetic; keep it.
pub fn progress_for(
    batch_index: usize,
    batch_count: usize,
    batch_size: NonZeroUsize,
    total_items: usize,
) -> Progress {
    let batches_done = batch_index + 1;
    let percentage = (batches_done as f64 / batch_count as f64 * 100.0).round();

    Progress {
        current: batches_done * batch_size.get(),
        total: total_items,
        percentage: percentage.clamp(0.0, 100.0) as u8,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn items(count: usize) -> Vec<Value> {
        (0..count).map(|i| json!(i)).collect()
    }

    #[test]
    fn given_no_items__when_split__should_produce_no_batches() {
        assert!(split_into_batches(Vec::new(), size(1000)).is_empty());
    }

    #[test]
    fn given_partial_tail__when_split__should_keep_order_and_shrink_last_batch() {
        let batches = split_into_batches(items(2500), size(1000));

        let sizes: Vec<_> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![1000, 1000, 500]);

        let flattened: Vec<_> = batches.into_iter().flatten().collect();
        assert_eq!(flattened, items(2500));
    }

    #[test]
    fn given_exact_multiple__when_split__should_fill_every_batch() {
        let batches = split_into_batches(items(3000), size(1000));

        assert_eq!(batches.len(), 3);
        assert!(batches.iter().all(|b| b.len() == 1000));
    }

    #[test]
    fn given_three_batches__when_progress_computed__should_round_percentages() {
        let percentages: Vec<_> = (0..3)
            .map(|i| progress_for(i, 3, size(1000), 2500).percentage)
            .collect();

        assert_eq!(percentages, vec![33, 67, 100]);
    }

    #[test]
    fn given_partial_tail__when_progress_computed__should_report_nominal_current() {
        let progress = progress_for(2, 3, size(1000), 2500);

        assert_eq!(
            progress,
            Progress {
                current: 3000,
                total: 2500,
                percentage: 100
            }
        );
    }

    #[test]
    fn given_half_way_fraction__when_progress_computed__should_round_up() {
        assert_eq!(progress_for(0, 8, size(10), 80).percentage, 13);
    }
}
