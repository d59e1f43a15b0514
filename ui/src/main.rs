#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::anyhow;
use login_ui::LoginApp;
use login_ui::config::Config;
use login_ui::state::State;

mod alloc {
    #[global_allocator]
    static MALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;
}

fn main() -> anyhow::Result<()> {
    // Log to stderr (if you run with `RUST_LOG=debug`).
    // egui_winit logs an error whenever the clipboard holds non-text content.
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_module("egui_winit::clipboard", log::LevelFilter::Off)
        .init();

    let config = Config::init()?;

    // Credential checks are spawned onto this runtime from the UI thread.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;
    let _guard = runtime.enter();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 400.0])
            .with_min_inner_size([320.0, 340.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Evil Martians",
        native_options,
        Box::new(move |_cc| {
            let state = State::new(config.credential_checker());
            Ok(Box::new(LoginApp::new(state)))
        }),
    )
    .map_err(|err| anyhow!("failed to run the login window: {err}"))
}
