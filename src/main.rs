// Flowstate calendar application
// Main entry point

use flowstate_calendar::ui_egui::FlowstateApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    log::info!("Starting Flowstate calendar");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Flowstate")
            .with_inner_size([480.0, 860.0])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Flowstate",
        options,
        Box::new(|cc| {
            let app = FlowstateApp::new(cc).map_err(|err| {
                log::error!("Failed to start: {:#}", err);
                err
            })?;
            Ok(Box::new(app))
        }),
    )
}
