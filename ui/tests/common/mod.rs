use std::sync::Arc;
use std::time::Duration;

use egui_kittest::Harness;
use login_business::{CredentialChecker, MockCredentialChecker};
use login_ui::LoginApp;
use login_ui::state::State;

/// Delay of the mock checker used by the UI tests.
pub const CHECK_DELAY: Duration = Duration::from_millis(100);

pub struct TestCtx<'a, T = State> {
    harness: Harness<'a, T>,
}

impl<'a, T> TestCtx<'a, T> {
    pub fn harness_mut(&mut self) -> &mut Harness<'a, T> {
        &mut self.harness
    }

    #[allow(unused)]
    pub fn harness(&self) -> &Harness<'a, T> {
        &self.harness
    }
}

impl<'a> TestCtx<'a, State> {
    #[allow(unused)]
    pub fn new(app: impl FnMut(&mut egui::Ui, &mut State) + 'a) -> Self {
        Self::with_checker(app, mock_checker())
    }

    #[allow(unused)]
    pub fn with_checker(
        app: impl FnMut(&mut egui::Ui, &mut State) + 'a,
        checker: Arc<dyn CredentialChecker>,
    ) -> Self {
        let harness = Harness::new_ui_state(app, State::new(checker));
        Self { harness }
    }
}

impl<'a> TestCtx<'a, LoginApp> {
    #[allow(unused)]
    pub fn new_app() -> Self {
        let app = LoginApp::new(State::new(mock_checker()));
        let harness = Harness::new_eframe(|_| app);
        Self { harness }
    }
}

fn mock_checker() -> Arc<dyn CredentialChecker> {
    Arc::new(MockCredentialChecker::default().with_delay(CHECK_DELAY))
}

/// Fills both inputs the way typing into them would.
#[allow(unused)]
pub fn fill(state: &mut State, email: &str, password: &str) {
    state.controller.on_email_change(email);
    state.controller.on_password_change(password);
}

/// Lets the spawned credential check finish.
#[allow(unused)]
pub async fn wait_for_check() {
    tokio::time::sleep(CHECK_DELAY * 3).await;
}
