//! The chunked wide-to-long engine.
//!
//! A call resolves the column layout once, melts the row axis chunk by
//! chunk (sequentially or in bounded parallel waves), stacks the chunk
//! frames in chunk order, and removes exact duplicate rows.

use std::iter::repeat_n;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use melt_common::duplicate_mask;
use melt_model::{ColumnSelector, DATE_COLUMN, DatasetSpec, EngineOptions};
use polars::prelude::{
    BooleanChunked, Column, DataFrame, DataType, IdxCa, IdxSize, IntoColumn,
    NamedFrom, NewChunkedArray, Series,
};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, info, info_span};

use crate::coerce::{coerce_identifier, coerce_measure_values};
use crate::error::{Result, TransformError};
use crate::layout::Layout;

/// Counters describing one standardize call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandardizeStats {
    /// Rows in the wide input.
    pub input_rows: usize,
    /// Columns matched by the measure selector.
    pub measure_columns: usize,
    /// Measure columns removed because their date was out of range.
    pub measure_columns_dropped: usize,
    /// Columns that were neither identifiers nor measures.
    pub ignored_columns: Vec<String>,
    pub chunks: usize,
    /// Long rows produced before deduplication.
    pub rows_melted: usize,
    pub rows_out_of_range_dropped: usize,
    pub duplicates_removed: usize,
    /// Measure headers that did not parse (permissive date policy only).
    pub unparsed_headers: Vec<String>,
    pub output_rows: usize,
}

/// The engine's output: the long table and what happened on the way.
#[derive(Debug, Clone)]
pub struct Standardized {
    pub data: DataFrame,
    /// Canonical name of the value column in `data`.
    pub value_column: String,
    pub stats: StandardizeStats,
}

/// Reshape a wide table to long form using the dataset's measure selector.
///
/// Output columns are the canonical identifier columns in configured order,
/// then `date` (`Date`), then the value column (`Int64`). Row order is chunk
/// by chunk, row by row, measure column by measure column.
///
/// # Errors
///
/// Fails before any chunk runs on a zero chunk size, missing identifier
/// columns, an empty measure selection, colliding output names, or (under
/// the strict date policy) unparsable headers. Fails during chunking on the
/// first value that cannot be coerced to its declared type.
pub fn standardize(
    wide: &DataFrame,
    spec: &DatasetSpec,
    options: &EngineOptions,
) -> Result<Standardized> {
    check_chunk_size(options)?;
    let selector = spec.measure_selector.compile()?;
    standardize_with_selector(wide, spec, &selector, options)
}

/// Like [`standardize`], with a caller-supplied measure predicate.
pub fn standardize_with_selector(
    wide: &DataFrame,
    spec: &DatasetSpec,
    selector: &dyn ColumnSelector,
    options: &EngineOptions,
) -> Result<Standardized> {
    check_chunk_size(options)?;
    let span = info_span!("standardize", dataset = %spec.name);
    let _guard = span.enter();
    let start = Instant::now();

    let layout = Layout::resolve(wide, spec, selector, options)?;
    let ranges = chunk_ranges(wide.height(), options.chunk_size);
    debug!(
        rows = wide.height(),
        identifiers = layout.identifiers.len(),
        measures = layout.measures.len(),
        chunks = ranges.len(),
        concurrency = options.concurrency,
        "resolved column layout"
    );

    let frames = if options.concurrency > 1 && ranges.len() > 1 {
        run_parallel(wide, &layout, &ranges, options.concurrency)?
    } else {
        run_sequential(wide, &layout, &ranges)?
    };

    let mut data = stack_frames(wide, &layout, frames)?;
    let rows_melted = data.height();
    let duplicates_removed = drop_duplicate_rows(&mut data)?;

    let stats = StandardizeStats {
        input_rows: wide.height(),
        measure_columns: layout.matched_measures,
        measure_columns_dropped: layout.dropped_measures,
        ignored_columns: layout.ignored,
        chunks: ranges.len(),
        rows_melted,
        rows_out_of_range_dropped: layout.dropped_measures * wide.height(),
        duplicates_removed,
        unparsed_headers: layout.unparsed_headers,
        output_rows: data.height(),
    };
    info!(
        input_rows = stats.input_rows,
        measure_columns = stats.measure_columns,
        chunks = stats.chunks,
        rows_melted = stats.rows_melted,
        duplicates_removed = stats.duplicates_removed,
        rows_out_of_range_dropped = stats.rows_out_of_range_dropped,
        output_rows = stats.output_rows,
        duration_ms = start.elapsed().as_millis(),
        "standardize complete"
    );

    Ok(Standardized {
        data,
        value_column: layout.value_column,
        stats,
    })
}

fn check_chunk_size(options: &EngineOptions) -> Result<()> {
    if options.chunk_size == 0 {
        return Err(TransformError::InvalidChunkSize);
    }
    Ok(())
}

/// Contiguous `(offset, len)` row ranges covering `rows`.
fn chunk_ranges(rows: usize, chunk_size: usize) -> Vec<(usize, usize)> {
    (0..rows)
        .step_by(chunk_size)
        .map(|offset| (offset, chunk_size.min(rows - offset)))
        .collect()
}

fn run_sequential(
    wide: &DataFrame,
    layout: &Layout,
    ranges: &[(usize, usize)],
) -> Result<Vec<DataFrame>> {
    ranges
        .iter()
        .enumerate()
        .map(|(index, &(offset, len))| melt_chunk(wide, layout, index, offset, len))
        .collect()
}

/// Run chunks on a bounded pool, at most `concurrency` at a time.
///
/// After a failure no new wave starts and unstarted chunks of the current
/// wave are skipped. The error of the lowest-indexed failing chunk wins.
fn run_parallel(
    wide: &DataFrame,
    layout: &Layout,
    ranges: &[(usize, usize)],
    concurrency: usize,
) -> Result<Vec<DataFrame>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency)
        .build()
        .map_err(|e| TransformError::WorkerPool(e.to_string()))?;
    let failed = AtomicBool::new(false);
    let indexed: Vec<(usize, (usize, usize))> = ranges.iter().copied().enumerate().collect();
    let mut frames = Vec::with_capacity(ranges.len());

    for wave in indexed.chunks(concurrency) {
        let results: Vec<Option<Result<DataFrame>>> = pool.install(|| {
            wave.par_iter()
                .map(|&(index, (offset, len))| {
                    if failed.load(Ordering::Acquire) {
                        return None;
                    }
                    let result = melt_chunk(wide, layout, index, offset, len);
                    if result.is_err() {
                        failed.store(true, Ordering::Release);
                    }
                    Some(result)
                })
                .collect()
        });
        for result in results.into_iter().flatten() {
            frames.push(result?);
        }
    }
    Ok(frames)
}

/// Melt one row range into long form.
fn melt_chunk(
    wide: &DataFrame,
    layout: &Layout,
    index: usize,
    offset: usize,
    len: usize,
) -> Result<DataFrame> {
    let start = Instant::now();
    let slice = wide.slice(offset as i64, len);
    let rows = slice.height();
    let width = layout.measures.len();

    let repeated: Vec<IdxSize> = (0..rows as IdxSize)
        .flat_map(|row| repeat_n(row, width))
        .collect();
    let take = IdxCa::from_vec("take".into(), repeated);

    let mut columns: Vec<Column> = Vec::with_capacity(layout.identifiers.len() + 2);
    for identifier in &layout.identifiers {
        let series = coerce_identifier(
            slice.column(&identifier.source)?,
            &identifier.canonical,
            identifier.target,
            index,
        )?;
        columns.push(series.take(&take)?.into_column());
    }

    let days: Vec<Option<i32>> = (0..rows)
        .flat_map(|_| layout.measures.iter().map(|measure| measure.epoch_day))
        .collect();
    let dates = Series::new(DATE_COLUMN.into(), days).cast(&DataType::Date)?;
    columns.push(dates.into_column());

    let measures = layout
        .measures
        .iter()
        .map(|measure| Ok((measure.source.as_str(), slice.column(&measure.source)?)))
        .collect::<Result<Vec<(&str, &Column)>>>()?;
    let values = coerce_measure_values(&measures, rows, &layout.value_column, index)?;
    columns.push(Series::new(layout.value_column.as_str().into(), values).into_column());

    let frame = DataFrame::new(columns)?;
    debug!(
        chunk = index,
        rows,
        long_rows = frame.height(),
        duration_ms = start.elapsed().as_millis(),
        "chunk melted"
    );
    Ok(frame)
}

fn stack_frames(wide: &DataFrame, layout: &Layout, frames: Vec<DataFrame>) -> Result<DataFrame> {
    let mut frames = frames.into_iter();
    let Some(mut stacked) = frames.next() else {
        // No rows: still produce the output schema.
        return melt_chunk(wide, layout, 0, 0, 0);
    };
    for frame in frames {
        stacked.vstack_mut(&frame)?;
    }
    stacked.as_single_chunk_par();
    Ok(stacked)
}

/// Remove rows identical to an earlier row, keeping the first occurrence.
fn drop_duplicate_rows(df: &mut DataFrame) -> Result<usize> {
    let duplicates = duplicate_mask(df)?;
    let removed = duplicates.iter().filter(|dup| **dup).count();
    if removed == 0 {
        return Ok(0);
    }
    let keep: Vec<bool> = duplicates.into_iter().map(|dup| !dup).collect();
    let mask = BooleanChunked::from_slice("dedupe".into(), &keep);
    *df = df.filter(&mask)?;
    debug!(removed, "removed duplicate rows");
    Ok(removed)
}
