use std::path::PathBuf;

mod app;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let open = std::env::args().nth(1).map(PathBuf::from);
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Takeoff",
        native_options,
        Box::new(|cc| Ok(Box::new(app::MeasureApp::new(cc, open)))),
    )
}
