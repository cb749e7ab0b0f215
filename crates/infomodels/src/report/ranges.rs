//! Line range compression for compact display of failing lines.

/// Maximum number of ranges shown before the rest is summarized.
pub const DISPLAY_LIMIT: usize = 10;

/// Compress ascending, duplicate-free line numbers into contiguous ranges.
///
/// Each output entry is either `"N"` or `"A-B"` (inclusive). The input must
/// already be sorted and de-duplicated; this function does not sort.
///
/// ```
/// use infomodels::report::ranges::compress;
///
/// assert_eq!(compress(&[1, 2, 3, 5, 7, 8, 9]), vec!["1-3", "5", "7-9"]);
/// ```
pub fn compress(lines: &[u64]) -> Vec<String> {
    let mut ranges = Vec::new();

    let Some((&first, rest)) = lines.split_first() else {
        return ranges;
    };

    let mut start = first;
    let mut end = first;

    for &line in rest {
        if end.checked_add(1) == Some(line) {
            end = line;
            continue;
        }

        ranges.push(format_range(start, end));
        start = line;
        end = line;
    }

    ranges.push(format_range(start, end));
    ranges
}

fn format_range(start: u64, end: u64) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{}-{}", start, end)
    }
}

/// Expand range strings back into the line numbers they cover.
///
/// Returns `None` if an entry is not a valid `"N"` or `"A-B"` range.
pub fn expand<S: AsRef<str>>(ranges: &[S]) -> Option<Vec<u64>> {
    let mut lines = Vec::new();

    for range in ranges {
        let range = range.as_ref();
        match range.split_once('-') {
            Some((start, end)) => {
                let start: u64 = start.parse().ok()?;
                let end: u64 = end.parse().ok()?;
                if end < start {
                    return None;
                }
                lines.extend(start..=end);
            }
            None => lines.push(range.parse().ok()?),
        }
    }

    Some(lines)
}

/// Join ranges for display, truncating after [`DISPLAY_LIMIT`] entries.
///
/// ```
/// use infomodels::report::ranges::display;
///
/// let ranges: Vec<String> = (1..=12).map(|n| (n * 2).to_string()).collect();
/// assert_eq!(display(&ranges), "2, 4, 6, 8, 10, 12, 14, 16, 18, 20 ... (+2 more)");
/// ```
pub fn display(ranges: &[String]) -> String {
    if ranges.len() > DISPLAY_LIMIT {
        format!(
            "{} ... (+{} more)",
            ranges[..DISPLAY_LIMIT].join(", "),
            ranges.len() - DISPLAY_LIMIT
        )
    } else {
        ranges.join(", ")
    }
}
