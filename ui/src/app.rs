use std::time::Duration;

use crate::{pages, state::State};

/// How often to poll for a finished credential check while one is running.
const LOADING_REPAINT_INTERVAL: Duration = Duration::from_millis(50);

pub struct LoginApp {
    state: State,
}

impl LoginApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }
}

impl eframe::App for LoginApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.sync();

        egui::CentralPanel::default().show(ctx, |ui| {
            pages::login_page(&mut self.state, ui);
        });

        // Nothing else wakes the UI when the check finishes.
        if self.state.controller.is_loading() {
            ctx.request_repaint_after(LOADING_REPAINT_INTERVAL);
        }
    }
}
