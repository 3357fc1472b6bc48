use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// SizeValue – a dataset's size field as found in the catalog
// ---------------------------------------------------------------------------

/// A dataset size as it appears in catalog files: either a raw byte count or
/// an unparsed string like `"2.5GB"`. Interpretation is deferred to the
/// sorter's normalization (see [`crate::data::sort::parse_size`]).
#[derive(Debug, Clone, PartialEq)]
pub enum SizeValue {
    Bytes(f64),
    Text(String),
}

impl fmt::Display for SizeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeValue::Bytes(b) => write!(f, "{}", format_size(*b)),
            SizeValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Render a byte count in the largest fitting unit (1024 steps).
pub fn format_size(bytes: f64) -> String {
    const UNITS: [&str; 4] = ["b", "kb", "mb", "gb"];
    let mut value = bytes.max(0.0);
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", value as u64, UNITS[unit])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

// ---------------------------------------------------------------------------
// DatasetRecord – one entry of the catalog
// ---------------------------------------------------------------------------

/// A single dataset record (one row of the source catalog).
///
/// Every field is optional: catalogs aggregated from many publishers carry
/// partial metadata, and a missing field must never break browsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetRecord {
    /// Preferred display name.
    pub title: Option<String>,
    /// Fallback display name used when `title` is absent.
    pub name: Option<String>,
    /// ISO-8601-ish publication date kept as text.
    pub date_published: Option<String>,
    /// Declared size, numeric or textual.
    pub size: Option<SizeValue>,
    /// Remaining string metadata: facet_name → value (publisher, license, …).
    pub facets: BTreeMap<String, String>,
}

impl DatasetRecord {
    /// The name shown in the list and used by the name sort key:
    /// `title`, else `name`, else the empty string.
    pub fn display_name(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Catalog – the complete loaded dataset catalog
// ---------------------------------------------------------------------------

/// The full parsed catalog with a pre-computed facet index.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// All dataset records (rows).
    pub records: Vec<DatasetRecord>,
    /// Ordered list of facet names present anywhere in the catalog.
    pub facet_names: Vec<String>,
    /// For each facet the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<String>>,
}

impl Catalog {
    /// Build the facet index from the loaded records.
    pub fn from_records(records: Vec<DatasetRecord>) -> Self {
        let mut facet_names_set: BTreeSet<String> = BTreeSet::new();
        let mut unique_values: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for rec in &records {
            for (facet, val) in &rec.facets {
                facet_names_set.insert(facet.clone());
                unique_values
                    .entry(facet.clone())
                    .or_default()
                    .insert(val.clone());
            }
        }
        let facet_names: Vec<String> = facet_names_set.into_iter().collect();
        Catalog {
            records,
            facet_names,
            unique_values,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
