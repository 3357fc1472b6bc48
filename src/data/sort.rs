use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::model::{Catalog, DatasetRecord, SizeValue};

// ---------------------------------------------------------------------------
// Sort key: <field><desc?> tokens from the sort selector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    DatePublished,
    Size,
}

/// A parsed sort selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

/// The sort selector tokens offered by the UI.
pub const SORT_TOKENS: [&str; 6] = [
    "name",
    "name-desc",
    "datePublished",
    "datePublished-desc",
    "size",
    "size-desc",
];

/// Parse a sort selector token.
///
/// Recognition is deliberately loose: any string starting with a field name
/// counts as that field, and a trailing `desc` flips the direction. Unknown
/// tokens yield `None`, which downstream treats as "leave order unchanged".
pub fn parse_sort_key(sort_by: &str) -> Option<SortKey> {
    const FIELDS: [(&str, SortField); 3] = [
        ("datePublished", SortField::DatePublished),
        ("name", SortField::Name),
        ("size", SortField::Size),
    ];
    for (token, field) in FIELDS {
        if sort_by.starts_with(token) {
            return Some(SortKey {
                field,
                descending: sort_by.ends_with("desc"),
            });
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Field normalization: every malformed field maps to a defined default
// ---------------------------------------------------------------------------

/// Parse a size string of the form `<decimal><unit?>` into bytes.
///
/// Units are case-insensitive: b×1, kb×1024, mb×1024², gb×1024³. A missing
/// unit means bytes. A recognizable number with an unrecognized unit suffix
/// falls back to a ×1 multiplier; anything without a leading number is 0.
pub fn parse_size(s: &str) -> f64 {
    let s = s.trim();
    let split = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
        .map(|(i, _)| i)
        .unwrap_or(s.len());

    let Ok(number) = s[..split].parse::<f64>() else {
        return 0.0;
    };

    let multiplier = match s[split..].trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1.0,
        "kb" => 1024.0,
        "mb" => 1024.0 * 1024.0,
        "gb" => 1024.0 * 1024.0 * 1024.0,
        // Unknown suffix: treat the number as plain bytes.
        _ => 1.0,
    };
    number * multiplier
}

/// Normalized byte count of a record's size field (absent/malformed → 0).
fn size_bytes(rec: &DatasetRecord) -> f64 {
    match &rec.size {
        Some(SizeValue::Bytes(b)) => *b,
        Some(SizeValue::Text(s)) => parse_size(s),
        None => 0.0,
    }
}

/// Parse an ISO-ish date string into epoch milliseconds.
///
/// Tries RFC 3339, then a naive datetime, then a plain date. Unparsable or
/// absent dates normalize to 0 (the epoch, sorting as earliest).
pub fn parse_date(s: &str) -> i64 {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.timestamp_millis();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return dt.and_utc().timestamp_millis();
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = d.and_hms_opt(0, 0, 0) {
            return dt.and_utc().timestamp_millis();
        }
    }
    0
}

fn date_millis(rec: &DatasetRecord) -> i64 {
    rec.date_published.as_deref().map(parse_date).unwrap_or(0)
}

fn name_key(rec: &DatasetRecord) -> String {
    rec.display_name().to_lowercase()
}

// ---------------------------------------------------------------------------
// Comparator
// ---------------------------------------------------------------------------

/// Compare two records under the given sort key.
///
/// The direction negates only the primary comparison; the tie-break is
/// applied on primary equality and keeps its own fixed direction:
/// * name → most recent `datePublished` first
/// * datePublished → name ascending
/// * size → name ascending
pub fn compare_records(a: &DatasetRecord, b: &DatasetRecord, key: &SortKey) -> Ordering {
    let primary = match key.field {
        SortField::Name => name_key(a).cmp(&name_key(b)),
        SortField::DatePublished => date_millis(a).cmp(&date_millis(b)),
        SortField::Size => size_bytes(a).total_cmp(&size_bytes(b)),
    };

    if primary == Ordering::Equal {
        return match key.field {
            SortField::Name => date_millis(b).cmp(&date_millis(a)),
            SortField::DatePublished | SortField::Size => name_key(a).cmp(&name_key(b)),
        };
    }

    if key.descending {
        primary.reverse()
    } else {
        primary
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Return a newly allocated, ordered copy of `records`.
///
/// The input is never mutated and the output is always a permutation of the
/// input. An unknown `sort_by` token preserves the original order.
pub fn sort_records(records: &[DatasetRecord], sort_by: &str) -> Vec<DatasetRecord> {
    let mut out: Vec<DatasetRecord> = records.to_vec();
    if let Some(key) = parse_sort_key(sort_by) {
        out.sort_by(|a, b| compare_records(a, b, &key));
    }
    out
}

/// Order a set of record indices (as produced by the facet filter) without
/// cloning the records themselves.
pub fn sorted_indices(catalog: &Catalog, mut indices: Vec<usize>, sort_by: &str) -> Vec<usize> {
    if let Some(key) = parse_sort_key(sort_by) {
        indices.sort_by(|&a, &b| {
            compare_records(&catalog.records[a], &catalog.records[b], &key)
        });
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(title: &str, date: &str, size: &str) -> DatasetRecord {
        DatasetRecord {
            title: (!title.is_empty()).then(|| title.to_string()),
            date_published: (!date.is_empty()).then(|| date.to_string()),
            size: (!size.is_empty()).then(|| SizeValue::Text(size.to_string())),
            ..Default::default()
        }
    }

    fn titles(records: &[DatasetRecord]) -> Vec<&str> {
        records.iter().map(|r| r.display_name()).collect()
    }

    #[test]
    fn parse_size_units() {
        assert_eq!(parse_size("2.5gb"), 2.5 * 1024.0 * 1024.0 * 1024.0);
        assert_eq!(parse_size("500"), 500.0);
        assert_eq!(parse_size("10KB"), 10.0 * 1024.0);
        assert_eq!(parse_size("3 mb"), 3.0 * 1024.0 * 1024.0);
        assert_eq!(parse_size("bogus"), 0.0);
        // Unknown unit suffix falls back to bytes.
        assert_eq!(parse_size("512xb"), 512.0);
    }

    #[test]
    fn parse_date_formats() {
        assert_eq!(parse_date("1970-01-01"), 0);
        assert!(parse_date("2023-06-15") > 0);
        assert!(parse_date("2023-06-15T12:30:00") > parse_date("2023-06-15"));
        assert!(parse_date("2023-06-15T12:30:00Z") > 0);
        assert_eq!(parse_date("not a date"), 0);
    }

    #[test]
    fn sort_key_tokens() {
        for token in SORT_TOKENS {
            assert!(parse_sort_key(token).is_some(), "token {token} must parse");
        }
        assert_eq!(
            parse_sort_key("name-desc"),
            Some(SortKey {
                field: SortField::Name,
                descending: true
            })
        );
        // Suffix check is not hyphen-specific.
        assert_eq!(
            parse_sort_key("sizedesc"),
            Some(SortKey {
                field: SortField::Size,
                descending: true
            })
        );
        assert_eq!(parse_sort_key("bogus"), None);
    }

    #[test]
    fn empty_input_returns_empty() {
        assert!(sort_records(&[], "name").is_empty());
        assert!(sort_records(&[], "bogus").is_empty());
    }

    #[test]
    fn unknown_key_preserves_order() {
        let records = vec![rec("C", "", ""), rec("A", "", ""), rec("B", "", "")];
        let sorted = sort_records(&records, "bogus");
        assert_eq!(titles(&sorted), vec!["C", "A", "B"]);
    }

    #[test]
    fn output_is_a_permutation() {
        let records = vec![
            rec("B", "2023-01-01", "1mb"),
            rec("A", "2024-01-01", "500"),
            rec("A", "2022-01-01", "2gb"),
        ];
        for token in SORT_TOKENS {
            let sorted = sort_records(&records, token);
            assert_eq!(sorted.len(), records.len());
            let mut expected = titles(&records);
            let mut got = titles(&sorted);
            expected.sort();
            got.sort();
            assert_eq!(got, expected, "token {token}");
        }
        // Input untouched.
        assert_eq!(titles(&records), vec!["B", "A", "A"]);
    }

    #[test]
    fn sorting_is_idempotent() {
        let records = vec![
            rec("B", "2023-01-01", "1mb"),
            rec("A", "2024-01-01", "500"),
            rec("A", "2022-01-01", "2gb"),
        ];
        for token in SORT_TOKENS {
            let once = sort_records(&records, token);
            let twice = sort_records(&once, token);
            assert_eq!(once, twice, "token {token}");
        }
    }

    #[test]
    fn name_ascending_breaks_ties_newest_first() {
        let records = vec![
            rec("B", "2023-01-01", ""),
            rec("A", "2024-01-01", ""),
            rec("A", "2022-01-01", ""),
        ];
        let sorted = sort_records(&records, "name");
        let dates: Vec<_> = sorted
            .iter()
            .map(|r| r.date_published.as_deref().unwrap())
            .collect();
        assert_eq!(titles(&sorted), vec!["A", "A", "B"]);
        assert_eq!(dates, vec!["2024-01-01", "2022-01-01", "2023-01-01"]);
    }

    #[test]
    fn name_comparison_is_case_insensitive() {
        let records = vec![rec("banana", "", ""), rec("Apple", "", "")];
        let sorted = sort_records(&records, "name");
        assert_eq!(titles(&sorted), vec!["Apple", "banana"]);
    }

    #[test]
    fn descending_date_keeps_name_tiebreak_ascending() {
        let records = vec![
            rec("Zebra", "2023-05-05", ""),
            rec("Apple", "2023-05-05", ""),
        ];
        let sorted = sort_records(&records, "datePublished-desc");
        assert_eq!(titles(&sorted), vec!["Apple", "Zebra"]);
    }

    #[test]
    fn size_sort_normalizes_mixed_fields() {
        let mut numeric = rec("Numeric", "", "");
        numeric.size = Some(SizeValue::Bytes(2048.0));
        let records = vec![
            rec("Big", "", "1gb"),
            numeric,
            rec("Broken", "", "???"),
            rec("Small", "", "1kb"),
        ];
        let sorted = sort_records(&records, "size");
        assert_eq!(titles(&sorted), vec!["Broken", "Small", "Numeric", "Big"]);
        let desc = sort_records(&records, "size-desc");
        assert_eq!(titles(&desc), vec!["Big", "Numeric", "Small", "Broken"]);
    }

    #[test]
    fn missing_fields_never_panic() {
        let records = vec![DatasetRecord::default(), rec("A", "junk", "junk")];
        for token in SORT_TOKENS {
            assert_eq!(sort_records(&records, token).len(), 2);
        }
    }

    #[test]
    fn sorted_indices_orders_a_subset() {
        let catalog = Catalog::from_records(vec![
            rec("C", "", ""),
            rec("A", "", ""),
            rec("B", "", ""),
        ]);
        let ordered = sorted_indices(&catalog, vec![0, 2], "name");
        assert_eq!(ordered, vec![2, 0]);
        // Unknown token leaves the subset order alone.
        assert_eq!(sorted_indices(&catalog, vec![0, 2], "bogus"), vec![0, 2]);
    }
}
