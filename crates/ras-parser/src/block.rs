//! Fixed-width numeric block reading.
//!
//! RAS files embed columnar numeric dumps: each row is up to `col_width`
//! characters, each value occupies `value_width` characters, and a block
//! holds exactly N values (or N pairs). All-whitespace slots are legal and
//! read as 0.0.

use ras_common::{RasError, RasResult};

use crate::scan::{right_of_equals, LineScanner};

/// Parse a float, treating an empty or all-whitespace string as 0.0.
pub fn parse_float_permissive(s: &str) -> RasResult<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse()
        .map_err(|_| RasError::parse(format!("invalid float '{}'", trimmed)))
}

/// Number of rows a block of `n_values` occupies.
pub fn number_of_lines(n_values: usize, col_width: usize, value_width: usize) -> usize {
    (n_values as f64 / (col_width as f64 / value_width as f64)).ceil() as usize
}

/// A byte-range slot of a row. The formats are ASCII; anything that is not
/// (a replacement character straddling the boundary) reads as empty.
fn slot(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("")
}

/// Read exactly `n` values from the following rows.
pub fn series_from_block(
    sc: &mut LineScanner,
    n: usize,
    col_width: usize,
    value_width: usize,
) -> RasResult<Vec<f64>> {
    let mut values = Vec::with_capacity(n);
    if n == 0 {
        return Ok(values);
    }

    while let Some(line) = sc.next_line() {
        let mut s = 0;
        while s < col_width && s < line.len() {
            values.push(parse_float_permissive(slot(line, s, s + value_width))?);
            if values.len() == n {
                return Ok(values);
            }
            s += value_width;
        }
    }

    Err(RasError::parse(format!(
        "expected {} values in block, found {}",
        n,
        values.len()
    )))
}

/// Read exactly `n_pairs` value pairs from the following rows.
pub fn pairs_from_block(
    sc: &mut LineScanner,
    n_pairs: usize,
    col_width: usize,
    value_width: usize,
) -> RasResult<Vec<[f64; 2]>> {
    let stride = value_width * 2;
    let mut pairs = Vec::with_capacity(n_pairs);
    if n_pairs == 0 {
        return Ok(pairs);
    }

    while let Some(line) = sc.next_line() {
        let mut s = 0;
        while s < col_width && s < line.len() {
            let first = parse_float_permissive(slot(line, s, s + value_width))?;
            let second = parse_float_permissive(slot(line, s + value_width, s + stride))?;
            pairs.push([first, second]);
            if pairs.len() == n_pairs {
                return Ok(pairs);
            }
            s += stride;
        }
    }

    Err(RasError::parse(format!(
        "expected {} pairs in block, found {}",
        n_pairs,
        pairs.len()
    )))
}

/// Scan forward for a `<prefix>=N` line, then read its N pairs.
///
/// Returns an empty vector when the prefix never appears; the scanner is
/// then exhausted, matching the forward-only discipline of the file format.
pub fn pairs_after_count_line(
    sc: &mut LineScanner,
    prefix: &str,
    col_width: usize,
    value_width: usize,
) -> RasResult<Vec<[f64; 2]>> {
    while let Some(line) = sc.next_line() {
        if line.starts_with(prefix) {
            let n_pairs = parse_count(line)?;
            return pairs_from_block(sc, n_pairs, col_width, value_width);
        }
    }
    Ok(Vec::new())
}

/// Parse the integer count to the right of '=' on a block header line.
pub fn parse_count(line: &str) -> RasResult<usize> {
    let text = right_of_equals(line);
    text.parse()
        .map_err(|_| RasError::parse(format!("invalid count '{}' in '{}'", text, line)))
}

/// Read values from a station/elevation style block by row count.
///
/// Skips `n_skip` rows, then processes `n_rows` rows, collecting every
/// `interval`-th non-empty slot (interval 2 selects the elevation column of
/// a station/elevation pair stream). Short blocks yield what was found.
pub fn column_from_block(
    sc: &mut LineScanner,
    n_rows: usize,
    n_skip: usize,
    col_width: usize,
    value_width: usize,
    interval: usize,
) -> RasResult<Vec<f64>> {
    let mut values = Vec::new();
    let mut skipped = 0;
    let mut processed = 0;
    let mut n_seen = 0;

    while let Some(line) = sc.next_line() {
        if skipped < n_skip {
            skipped += 1;
            continue;
        }
        processed += 1;

        let mut s = 0;
        while s < col_width && s < line.len() {
            let text = slot(line, s, s + value_width).trim();
            if !text.is_empty() {
                n_seen += 1;
                if n_seen % interval == 0 {
                    let val = text
                        .parse()
                        .map_err(|_| RasError::parse(format!("invalid float '{}'", text)))?;
                    values.push(val);
                }
            }
            s += value_width;
        }

        if processed == n_rows {
            break;
        }
    }

    Ok(values)
}

/// Maximum of a series. None when empty.
pub fn max_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Minimum of a series. None when empty.
pub fn min_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// Strip everything but digits and dots ("450*" -> "450", "1280.5 BR" -> "1280.5").
pub fn to_numeric(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::LineScanner;

    #[test]
    fn test_number_of_lines() {
        assert_eq!(number_of_lines(10, 80, 8), 1);
        assert_eq!(number_of_lines(11, 80, 8), 2);
        assert_eq!(number_of_lines(20, 80, 8), 2);
        assert_eq!(number_of_lines(4, 64, 16), 1);
        assert_eq!(number_of_lines(5, 64, 16), 2);
    }

    #[test]
    fn test_series_exact_count() {
        let text = "     100     200     300     400     500     600     700     800     900    1000\n    1100    1200";
        let mut sc = LineScanner::new(text);
        let series = series_from_block(&mut sc, 12, 80, 8).unwrap();
        assert_eq!(series.len(), 12);
        assert_eq!(series[0], 100.0);
        assert_eq!(series[11], 1200.0);
    }

    #[test]
    fn test_series_stops_mid_line() {
        let mut sc = LineScanner::new("     1.5     2.5     3.5\nNext Element=1");
        let series = series_from_block(&mut sc, 2, 80, 8).unwrap();
        assert_eq!(series, vec![1.5, 2.5]);
    }

    #[test]
    fn test_series_short_block_is_error() {
        let mut sc = LineScanner::new("     1.5");
        assert!(series_from_block(&mut sc, 3, 80, 8).is_err());
    }

    #[test]
    fn test_pairs_64_16() {
        let text = format!(
            "{:>16}{:>16}{:>16}{:>16}\n{:>16}{:>16}{:>16}{:>16}",
            100.0, 200.0, 110.0, 210.0, 120.0, 220.0, 130.0, 230.0
        );
        let mut sc = LineScanner::new(&text);
        let pairs = pairs_from_block(&mut sc, 4, 64, 16).unwrap();
        assert_eq!(
            pairs,
            vec![
                [100.0, 200.0],
                [110.0, 210.0],
                [120.0, 220.0],
                [130.0, 230.0]
            ]
        );
    }

    #[test]
    fn test_empty_slots_parse_as_zero() {
        let mut sc = LineScanner::new("     1.5                 3.5");
        let series = series_from_block(&mut sc, 3, 80, 8).unwrap();
        assert_eq!(series, vec![1.5, 0.0, 3.5]);
    }

    #[test]
    fn test_pairs_after_count_line() {
        let text = "other stuff\nXS GIS Cut Line= 2\n{p}".replace(
            "{p}",
            &format!("{:>16}{:>16}{:>16}{:>16}", 0.0, 0.0, 100.0, 0.0),
        );
        let mut sc = LineScanner::new(&text);
        let pairs = pairs_after_count_line(&mut sc, "XS GIS Cut Line", 64, 16).unwrap();
        assert_eq!(pairs, vec![[0.0, 0.0], [100.0, 0.0]]);
    }

    #[test]
    fn test_pairs_after_missing_count_line() {
        let mut sc = LineScanner::new("nothing here");
        let pairs = pairs_after_count_line(&mut sc, "XS GIS Cut Line", 64, 16).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_column_interval_selects_elevations() {
        // (station, elevation) pairs flattened at 8 wide: keep every 2nd value
        let mut sc =
            LineScanner::new("       0      12      10       8      20      14");
        let elevations = column_from_block(&mut sc, 1, 0, 80, 8, 2).unwrap();
        assert_eq!(elevations, vec![12.0, 8.0, 14.0]);
    }

    #[test]
    fn test_column_skip_rows() {
        let mut sc = LineScanner::new("     999\n       1       2");
        let values = column_from_block(&mut sc, 1, 1, 80, 8, 1).unwrap();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_min_max() {
        let values = [3.0, -1.0, 7.5];
        assert_eq!(max_value(&values), Some(7.5));
        assert_eq!(min_value(&values), Some(-1.0));
        assert!(max_value(&[]).is_none());
        assert!(max_value(&values).unwrap() >= min_value(&values).unwrap());
    }

    #[test]
    fn test_to_numeric() {
        assert_eq!(to_numeric("450     "), "450");
        assert_eq!(to_numeric("1280.5 BR"), "1280.5");
        assert_eq!(to_numeric("12*"), "12");
    }
}
