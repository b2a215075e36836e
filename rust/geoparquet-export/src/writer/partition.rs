use std::num::NonZeroUsize;
use std::ops::Range;

/// Name of the hive-style directory key that identifies a partition.
pub const PARTITION_COLUMN_NAME: &str = "__partition__";

/// File name of the single data file inside each partition directory.
pub const PARTITION_FILE_NAME: &str = "part-0.parquet";

/// The partition that row `row` belongs to.
pub fn partition_index(row: usize, file_max_records: NonZeroUsize) -> usize {
    row / file_max_records.get()
}

/// Contiguous row ranges, one per partition, in partition order.
///
/// An empty dataset yields a single empty partition.
pub fn partition_ranges(num_rows: usize, file_max_records: NonZeroUsize) -> Vec<Range<usize>> {
    if num_rows == 0 {
        return vec![0..0];
    }

    let step = file_max_records.get();
    (0..num_rows)
        .step_by(step)
        .map(|start| start..(start + step).min(num_rows))
        .collect()
}

/// Directory name of partition `index`, e.g. `__partition__=2`.
pub fn partition_dir_name(index: usize) -> String {
    format!("{PARTITION_COLUMN_NAME}={index}")
}
