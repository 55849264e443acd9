//! Gap filling for evenly spaced ordered sequences.
//!
//! Nothing here knows about calendars: a sequence is a slice of optional
//! values whose positions are equally spaced.

/// Fills every `None` in `values`.
///
/// * A gap between two known values is filled linearly by position distance.
/// * A gap before the first or after the last known value takes that
///   nearest known value (flat extension at both ends).
///
/// Returns `None` if the sequence has no known value to fill from.
pub fn fill_gaps(values: &[Option<f64>]) -> Option<Vec<f64>> {
    let known: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();

    let (first_idx, first_val) = *known.first()?;
    let (last_idx, last_val) = *known.last()?;

    let mut filled = Vec::with_capacity(values.len());
    filled.extend(std::iter::repeat_n(first_val, first_idx));

    for pair in known.windows(2) {
        let (start_idx, start_val) = pair[0];
        let (end_idx, end_val) = pair[1];
        let span = (end_idx - start_idx) as f64;
        let slope = (end_val - start_val) / span;

        filled.push(start_val);
        for step in 1..(end_idx - start_idx) {
            filled.push(start_val + slope * step as f64);
        }
    }

    filled.push(last_val);
    filled.extend(std::iter::repeat_n(last_val, values.len() - last_idx - 1));

    Some(filled)
}
