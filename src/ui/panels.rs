use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::sort::SORT_TOKENS;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(catalog) = &state.catalog {
            ui.label(format!(
                "{} datasets, {} shown",
                catalog.len(),
                state.visible_indices.len()
            ));
        }

        ui.separator();

        // ---- Sort selector ----
        ui.label("Sort by");
        let current = state.sort_by.clone();
        let mut next: Option<String> = None;
        egui::ComboBox::from_id_salt("sort_by")
            .selected_text(&current)
            .show_ui(ui, |ui: &mut Ui| {
                for token in SORT_TOKENS {
                    if ui.selectable_label(current == token, token).clicked() {
                        next = Some(token.to_string());
                    }
                }
            });
        if let Some(token) = next {
            state.set_sort_by(&token);
        }

        ui.separator();

        if ui
            .selectable_label(state.favorites_only, "★ Favorites only")
            .clicked()
        {
            state.favorites_only = !state.favorites_only;
            state.rebuild_visible();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – facet filter widgets
// ---------------------------------------------------------------------------

/// Render the left facet panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Facets");
    ui.separator();

    let catalog = match &state.catalog {
        Some(catalog) => catalog,
        None => {
            ui.label("No catalog loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the loop.
    let facets = catalog.facet_names.clone();
    let unique = catalog.unique_values.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Colour-by selector ----
            ui.strong("Color by");
            let current_facet = state.color_facet.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("color_by")
                .selected_text(&current_facet)
                .show_ui(ui, |ui: &mut Ui| {
                    for facet in &facets {
                        if ui
                            .selectable_label(current_facet == *facet, facet)
                            .clicked()
                        {
                            state.set_color_facet(facet.clone());
                        }
                    }
                });
            ui.separator();

            // ---- Per-facet filter widgets (collapsible) ----
            for facet in &facets {
                let Some(all_values) = unique.get(facet) else {
                    continue;
                };

                let n_selected = state
                    .filters
                    .get(facet)
                    .map(|s| s.len())
                    .unwrap_or_default();
                let n_total = all_values.len();
                let header_text = format!("{facet}  ({n_selected}/{n_total})");

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(facet)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        // Select all / none buttons
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(facet);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(facet);
                            }
                        });

                        for val in all_values {
                            let is_selected = state
                                .filters
                                .get(facet)
                                .map(|s| s.contains(val))
                                .unwrap_or(false);

                            // Show colour swatch if this is the colour facet
                            let mut text = RichText::new(val);
                            if state.color_facet.as_deref() == Some(facet) {
                                if let Some(cm) = &state.color_map {
                                    text = text.color(cm.color_for(val));
                                }
                            }

                            let mut checked = is_selected;
                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle_filter_value(facet, val);
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open dataset catalog")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(catalog) => {
                log::info!(
                    "Loaded {} datasets with facets {:?}",
                    catalog.len(),
                    catalog.facet_names
                );
                state.set_catalog(catalog);
            }
            Err(e) => {
                log::error!("Failed to load catalog: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}
