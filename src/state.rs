use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::color::ColorMap;
use crate::data::filter::{FilterState, filtered_indices, init_filter_state};
use crate::data::model::Catalog;
use crate::data::sort::{SORT_TOKENS, sorted_indices};
use crate::favorites::{Favorites, JsonFileStore};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded catalog (None until the user opens a file).
    pub catalog: Option<Catalog>,

    /// Per-facet filter selections.
    pub filters: FilterState,

    /// Active sort selector token (one of [`SORT_TOKENS`]).
    pub sort_by: String,

    /// Indices of records passing filters, in display order (cached).
    pub visible_indices: Vec<usize>,

    /// The user's favorite datasets.
    pub favorites: Favorites,

    /// Restrict the list to favorites.
    pub favorites_only: bool,

    /// Which facet is used for colouring rows.
    pub color_facet: Option<String>,

    /// Active colour map.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        let store = JsonFileStore::new(PathBuf::from("datascout_favorites.json"));
        Self {
            catalog: None,
            filters: FilterState::default(),
            sort_by: SORT_TOKENS[0].to_string(),
            visible_indices: Vec::new(),
            favorites: Favorites::load_or_default(Box::new(store)),
            favorites_only: false,
            color_facet: None,
            color_map: None,
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded catalog, initialise filters and colour.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.filters = init_filter_state(&catalog);

        // Default colour facet: first facet (if any).
        self.color_facet = catalog.facet_names.first().cloned();
        self.rebuild_color_map(&catalog);

        self.catalog = Some(catalog);
        self.status_message = None;
        self.loading = false;
        self.rebuild_visible();
    }

    /// Rebuild the colour map from the current `color_facet`.
    pub fn rebuild_color_map(&mut self, catalog: &Catalog) {
        self.color_map = self.color_facet.as_ref().and_then(|facet| {
            catalog
                .unique_values
                .get(facet)
                .map(|vals| ColorMap::new(facet, vals))
        });
    }

    /// Recompute `visible_indices`: facet filters → favorites mask → sort.
    pub fn rebuild_visible(&mut self) {
        let Some(catalog) = &self.catalog else {
            self.visible_indices.clear();
            return;
        };
        let mut indices = filtered_indices(catalog, &self.filters);
        if self.favorites_only {
            indices.retain(|&i| {
                self.favorites
                    .contains(catalog.records[i].display_name())
            });
        }
        self.visible_indices = sorted_indices(catalog, indices, &self.sort_by);
    }

    /// Switch the sort selector and re-order the list.
    pub fn set_sort_by(&mut self, token: &str) {
        self.sort_by = token.to_string();
        self.rebuild_visible();
    }

    /// Set colour facet and rebuild the map.
    pub fn set_color_facet(&mut self, facet: String) {
        self.color_facet = Some(facet);
        if let Some(catalog) = self.catalog.take() {
            self.rebuild_color_map(&catalog);
            self.catalog = Some(catalog);
        }
    }

    /// Flip a dataset's favorite status.
    pub fn toggle_favorite(&mut self, name: &str) {
        self.favorites.toggle(name);
        if self.favorites_only {
            self.rebuild_visible();
        }
    }

    /// Toggle a single facet value in the filter.
    pub fn toggle_filter_value(&mut self, facet: &str, value: &str) {
        let selected = self.filters.entry(facet.to_string()).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.rebuild_visible();
    }

    /// Select all values of a facet.
    pub fn select_all(&mut self, facet: &str) {
        if let Some(catalog) = &self.catalog {
            if let Some(all_vals) = catalog.unique_values.get(facet) {
                let all_vals = all_vals.clone();
                self.filters.insert(facet.to_string(), all_vals);
                self.rebuild_visible();
            }
        }
    }

    /// Deselect all values of a facet.
    pub fn select_none(&mut self, facet: &str) {
        self.filters.insert(facet.to_string(), BTreeSet::new());
        self.rebuild_visible();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::DatasetRecord;
    use crate::favorites::{FavoritesStore, StoreError};

    struct NullStore;

    impl FavoritesStore for NullStore {
        fn load(&self) -> Result<BTreeSet<String>, StoreError> {
            Ok(BTreeSet::new())
        }
        fn save(&self, _: &BTreeSet<String>) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn state_with_catalog() -> AppState {
        let mk = |title: &str, publisher: &str| {
            let mut rec = DatasetRecord {
                title: Some(title.to_string()),
                ..Default::default()
            };
            rec.facets.insert("publisher".into(), publisher.into());
            rec
        };
        let mut state = AppState {
            favorites: Favorites::load_or_default(Box::new(NullStore)),
            ..Default::default()
        };
        state.set_catalog(Catalog::from_records(vec![
            mk("Zebra Migration", "WWF"),
            mk("Air Quality", "EPA"),
            mk("Quake Feed", "USGS"),
        ]));
        state
    }

    #[test]
    fn set_catalog_sorts_by_default_key() {
        let state = state_with_catalog();
        // Default token is "name": ascending by title.
        assert_eq!(state.visible_indices, vec![1, 2, 0]);
    }

    #[test]
    fn favorites_only_masks_the_list() {
        let mut state = state_with_catalog();
        state.toggle_favorite("Quake Feed");
        state.favorites_only = true;
        state.rebuild_visible();
        assert_eq!(state.visible_indices, vec![2]);

        state.toggle_favorite("Quake Feed");
        assert!(state.visible_indices.is_empty());
    }

    #[test]
    fn facet_selection_narrows_then_restores() {
        let mut state = state_with_catalog();
        state.select_none("publisher");
        assert!(state.visible_indices.is_empty());
        state.select_all("publisher");
        assert_eq!(state.visible_indices.len(), 3);
    }

    #[test]
    fn switching_sort_reorders() {
        let mut state = state_with_catalog();
        state.set_sort_by("name-desc");
        assert_eq!(state.visible_indices, vec![0, 2, 1]);
    }
}
