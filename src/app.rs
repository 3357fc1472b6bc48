use eframe::egui;

use crate::state::AppState;
use crate::ui::{list, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct DatascoutApp {
    pub state: AppState,
}

impl eframe::App for DatascoutApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar, sort selector ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: facet filters ----
        egui::SidePanel::left("facet_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dataset list ----
        egui::CentralPanel::default().show(ctx, |ui| {
            list::dataset_list(ui, &mut self.state);
        });
    }
}
