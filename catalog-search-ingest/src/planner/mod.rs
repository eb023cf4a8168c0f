//! Batch planning.
//!
//! Splits an ordered input sequence of records into fixed-size batches,
//! preserving order and offset attribution.

use crate::errors::IngestError;
use catalog_search_shared::ProductRecord;

/// An ordered, contiguous slice of the input sequence.
///
/// Batch `k` covers input offsets `[k*B, min((k+1)*B, N))`. Batches
/// partition the input exactly: every record appears in exactly one batch,
/// in original order.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Zero-based batch index.
    pub index: usize,
    /// Offset of this batch's first record in the original input.
    pub offset: usize,
    /// The records of this batch, in input order.
    pub records: Vec<ProductRecord>,
}

impl Batch {
    /// Number of records in the batch.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Partition the input into `ceil(N/B)` batches of at most `batch_size`
/// records; the final batch may be smaller.
///
/// An empty input produces an empty plan. `batch_size == 0` is a
/// configuration error, rejected before planning begins.
pub fn plan(records: Vec<ProductRecord>, batch_size: usize) -> Result<Vec<Batch>, IngestError> {
    if batch_size == 0 {
        return Err(IngestError::config("batch size must be > 0"));
    }

    let mut batches = Vec::with_capacity(records.len().div_ceil(batch_size));
    let mut remaining = records;
    let mut offset = 0;

    while !remaining.is_empty() {
        let take = batch_size.min(remaining.len());
        let rest = remaining.split_off(take);
        batches.push(Batch {
            index: batches.len(),
            offset,
            records: remaining,
        });
        offset += take;
        remaining = rest;
    }

    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(n: usize) -> Vec<ProductRecord> {
        (0..n)
            .map(|i| ProductRecord::new(format!("sku-{}", i), json!({ "seq": i })))
            .collect()
    }

    #[test]
    fn test_exact_partition() {
        for (n, b) in [(0usize, 1usize), (1, 1), (5, 2), (10, 10), (2500, 1000), (7, 3)] {
            let input = records(n);
            let batches = plan(input.clone(), b).unwrap();

            assert_eq!(batches.len(), n.div_ceil(b), "n={} b={}", n, b);

            let rejoined: Vec<ProductRecord> = batches
                .iter()
                .flat_map(|batch| batch.records.clone())
                .collect();
            assert_eq!(rejoined, input, "n={} b={}", n, b);
        }
    }

    #[test]
    fn test_offsets_and_indices() {
        let batches = plan(records(2500), 1000).unwrap();

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 1000);
        assert_eq!(batches[1].len(), 1000);
        assert_eq!(batches[2].len(), 500);

        assert_eq!(batches[0].offset, 0);
        assert_eq!(batches[1].offset, 1000);
        assert_eq!(batches[2].offset, 2000);

        for (i, batch) in batches.iter().enumerate() {
            assert_eq!(batch.index, i);
        }
    }

    #[test]
    fn test_empty_input() {
        let batches = plan(Vec::new(), 100).unwrap();
        assert!(batches.is_empty());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let result = plan(records(5), 0);
        assert!(matches!(result, Err(IngestError::ConfigError(_))));
    }
}
