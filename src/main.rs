mod api;
mod app;
mod chat;
mod config;
mod event;
mod recommend;
mod session;
mod theme;
mod typewriter;

use api::CoachClient;
use app::FlowRollApp;
use config::AppConfig;
use eframe::egui;
use log::debug;
use session::SessionToken;
use std::sync::mpsc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = AppConfig::from_env();
    debug!("starting with backend {}", config.api_base);

    let session = SessionToken::generate();
    let (tx, rx) = mpsc::channel();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("flowroll-runtime")
        .build()?;

    let client = runtime.block_on(async { CoachClient::new(&config, session, tx.clone()) })?;

    let app = FlowRollApp::new(rx, client);
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([960.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "FlowRoll",
        native_options,
        Box::new(move |creation_context| {
            app.theme().apply_visuals(&creation_context.egui_ctx);
            Ok(Box::new(app))
        }),
    )?;

    Ok(())
}
