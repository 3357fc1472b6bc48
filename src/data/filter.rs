use std::collections::{BTreeMap, BTreeSet};

use super::model::Catalog;

// ---------------------------------------------------------------------------
// Facet filter: which unique values are selected per facet
// ---------------------------------------------------------------------------

/// Per-facet selection state: maps facet_name → set of selected values.
pub type FilterState = BTreeMap<String, BTreeSet<String>>;

/// Initialise a [`FilterState`] with all values selected (i.e., show everything).
pub fn init_filter_state(catalog: &Catalog) -> FilterState {
    catalog
        .unique_values
        .iter()
        .map(|(facet, vals)| (facet.clone(), vals.clone()))
        .collect()
}

/// Return indices of records that pass all active facet filters.
///
/// A record passes a facet filter when:
/// * The facet is not present in `filters` → passes (no constraint)
/// * The filter set for that facet is empty → nothing selected → fails
/// * All unique values are selected → no effective filter → passes
/// * The record's value for that facet is in the selected set → passes
/// * The record lacks the facet entirely → passes (partial metadata must
///   never hide a dataset the user did not explicitly filter out)
pub fn filtered_indices(catalog: &Catalog, filters: &FilterState) -> Vec<usize> {
    catalog
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            for (facet, selected) in filters {
                if selected.is_empty() {
                    // Nothing selected for this facet → hide everything
                    return false;
                }
                // Check all unique values are selected → no effective filter
                if let Some(all_vals) = catalog.unique_values.get(facet) {
                    if selected.len() == all_vals.len() {
                        continue;
                    }
                }
                if let Some(val) = rec.facets.get(facet) {
                    if !selected.contains(val) {
                        return false;
                    }
                }
            }
            true
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::DatasetRecord;

    fn catalog() -> Catalog {
        let mk = |title: &str, publisher: Option<&str>| {
            let mut rec = DatasetRecord {
                title: Some(title.to_string()),
                ..Default::default()
            };
            if let Some(p) = publisher {
                rec.facets.insert("publisher".into(), p.into());
            }
            rec
        };
        Catalog::from_records(vec![
            mk("A", Some("NOAA")),
            mk("B", Some("USGS")),
            mk("C", None),
        ])
    }

    #[test]
    fn all_selected_shows_everything() {
        let cat = catalog();
        let filters = init_filter_state(&cat);
        assert_eq!(filtered_indices(&cat, &filters), vec![0, 1, 2]);
    }

    #[test]
    fn narrowing_a_facet_hides_other_values() {
        let cat = catalog();
        let mut filters = init_filter_state(&cat);
        filters.get_mut("publisher").unwrap().remove("USGS");
        // Record without the facet still passes.
        assert_eq!(filtered_indices(&cat, &filters), vec![0, 2]);
    }

    #[test]
    fn empty_selection_hides_everything() {
        let cat = catalog();
        let mut filters = init_filter_state(&cat);
        filters.insert("publisher".into(), BTreeSet::new());
        assert!(filtered_indices(&cat, &filters).is_empty());
    }
}
