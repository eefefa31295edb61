//! Missing value analysis and complete-case filtering

use polars::prelude::*;

/// Count absent values per column, sorted by count descending.
///
/// Both nulls (sentinel tokens after loading) and NaN count as absent.
pub fn analyze_missing_values(
    df: &DataFrame,
    columns: &[String],
) -> Result<Vec<(String, usize)>, PolarsError> {
    let mut counts: Vec<(String, usize)> = Vec::with_capacity(columns.len());

    for name in columns {
        let mask = absent_mask(df.column(name)?)?;
        counts.push((name.clone(), mask.iter().filter(|&&absent| absent).count()));
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(counts)
}

/// Per-row flag: `true` when any of `columns` is absent in that row
pub fn incomplete_record_mask(df: &DataFrame, columns: &[String]) -> Result<Vec<bool>, PolarsError> {
    let mut mask = vec![false; df.height()];

    for name in columns {
        for (row, absent) in absent_mask(df.column(name)?)?.into_iter().enumerate() {
            mask[row] |= absent;
        }
    }

    Ok(mask)
}

fn absent_mask(column: &Column) -> Result<Vec<bool>, PolarsError> {
    if column.dtype().is_primitive_numeric() {
        let float_col = column.cast(&DataType::Float64)?;
        Ok(float_col
            .f64()?
            .into_iter()
            .map(|v| v.map_or(true, f64::is_nan))
            .collect())
    } else {
        Ok(column
            .as_materialized_series()
            .iter()
            .map(|v| v.is_null())
            .collect())
    }
}
