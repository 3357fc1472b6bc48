use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{SizeValue, format_size};
use crate::data::sort::parse_size;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Dataset list (central panel)
// ---------------------------------------------------------------------------

/// Render the dataset table in the central panel.
pub fn dataset_list(ui: &mut Ui, state: &mut AppState) {
    let catalog = match &state.catalog {
        Some(catalog) => catalog,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a catalog to browse datasets  (File → Open…)");
            });
            return;
        }
    };

    let color_map = &state.color_map;
    let color_facet = state.color_facet.as_deref();

    // Favorite toggles are applied after the table borrow ends.
    let mut toggled: Option<String> = None;

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::exact(24.0))
        .column(Column::remainder().at_least(200.0))
        .column(Column::auto().at_least(100.0))
        .column(Column::auto().at_least(80.0))
        .header(20.0, |mut header| {
            header.col(|_| {});
            header.col(|ui| {
                ui.strong("Name");
            });
            header.col(|ui| {
                ui.strong("Published");
            });
            header.col(|ui| {
                ui.strong("Size");
            });
        })
        .body(|mut body| {
            for &idx in &state.visible_indices {
                let rec = &catalog.records[idx];
                let name = rec.display_name();

                // Determine colour from the colour-by facet.
                let color = color_facet
                    .and_then(|facet| {
                        let val = rec.facets.get(facet)?;
                        let cm = color_map.as_ref()?;
                        Some(cm.color_for(val))
                    })
                    .unwrap_or(Color32::LIGHT_BLUE);

                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        let star = if state.favorites.contains(name) {
                            "★"
                        } else {
                            "☆"
                        };
                        if ui.button(star).clicked() {
                            toggled = Some(name.to_string());
                        }
                    });
                    row.col(|ui| {
                        let label = if name.is_empty() { "(unnamed)" } else { name };
                        ui.label(RichText::new(label).color(color));
                    });
                    row.col(|ui| {
                        ui.label(rec.date_published.as_deref().unwrap_or("—"));
                    });
                    row.col(|ui| {
                        ui.label(size_label(rec.size.as_ref()));
                    });
                });
            }
        });

    if let Some(name) = toggled {
        state.toggle_favorite(&name);
    }
}

/// Human-readable size cell: numeric counts are formatted, textual sizes are
/// re-rendered from their normalized byte count so the column is uniform.
fn size_label(size: Option<&SizeValue>) -> String {
    match size {
        Some(SizeValue::Bytes(b)) => format_size(*b),
        Some(SizeValue::Text(s)) => {
            let bytes = parse_size(s);
            if bytes > 0.0 {
                format_size(bytes)
            } else {
                s.clone()
            }
        }
        None => "—".to_string(),
    }
}
