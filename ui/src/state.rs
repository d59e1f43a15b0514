use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use login_business::{CredentialChecker, LoginController, SubmitOutcome};
use log::{info, warn};

/// Visibility of the "Login successful!" notice.
///
/// Clones share the same flag, so the controller's success callback and the
/// view can both hold one.
#[derive(Debug, Clone, Default)]
pub struct SuccessNotice(Rc<Cell<bool>>);

impl SuccessNotice {
    pub fn show(&self) {
        self.0.set(true);
    }

    pub fn dismiss(&self) {
        self.0.set(false);
    }

    pub fn is_visible(&self) -> bool {
        self.0.get()
    }
}

/// The main application state.
#[derive(Debug)]
pub struct State {
    pub controller: LoginController,
    pub success_notice: SuccessNotice,
}

impl State {
    pub fn new(checker: Arc<dyn CredentialChecker>) -> Self {
        let success_notice = SuccessNotice::default();
        let notice = success_notice.clone();
        let controller = LoginController::new(checker).on_success(move || notice.show());

        Self {
            controller,
            success_notice,
        }
    }

    /// Applies a finished credential check, if one arrived since the last frame.
    pub fn sync(&mut self) -> Option<SubmitOutcome> {
        let outcome = self.controller.sync();
        match &outcome {
            Some(SubmitOutcome::Succeeded) => info!("Login succeeded"),
            Some(SubmitOutcome::Failed(message)) => warn!("Login failed: {message}"),
            None => {}
        }
        outcome
    }
}
