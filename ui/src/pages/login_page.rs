//! Login page.
//!
//! Displays the login form centered on the screen, with the success notice
//! layered on top once a login goes through.

use crate::{state::State, widgets};
use egui::{Response, Ui};

/// Renders the login page.
pub fn login_page(state: &mut State, ui: &mut Ui) -> Response {
    let response = widgets::login_form(&mut state.controller, ui);
    widgets::success_notice(&state.success_notice, ui);
    response
}
