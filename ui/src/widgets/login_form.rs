//! Email/password login form.
//!
//! Every frame the widget renders a [`LoginFormView`] snapshot and forwards
//! what the user did (edits, focus loss, submit) to the [`LoginController`].

use egui::{Align, Button, Key, Layout, Response, RichText, TextEdit, Ui};
use log::debug;
use login_business::{Field, LoginController, LoginFormView, SubmitStart};

use crate::utils::colors::COLOR_RED;

const FORM_WIDTH: f32 = 280.0;

#[derive(Default)]
struct Interaction {
    changes: Vec<(Field, String)>,
    blurred: Vec<Field>,
    submit: bool,
}

/// Renders the login form and applies the user's input to `controller`.
pub fn login_form(controller: &mut LoginController, ui: &mut Ui) -> Response {
    let view = controller.view();
    let mut interaction = Interaction::default();

    let response = ui
        .with_layout(Layout::top_down(Align::Center), |ui| {
            ui.set_max_width(FORM_WIDTH);
            ui.add_space(20.0);
            ui.heading("Evil Martians");
            ui.add_space(24.0);

            field_input(ui, &view, Field::Email, &mut interaction);
            ui.add_space(8.0);
            field_input(ui, &view, Field::Password, &mut interaction);

            if let Some(message) = view.errors.submit.as_deref() {
                ui.add_space(8.0);
                ui.colored_label(COLOR_RED, message);
            }

            ui.add_space(16.0);
            if submit_button(ui, &view) {
                interaction.submit = true;
            }
        })
        .response;

    for (field, value) in interaction.changes {
        controller.on_change(field, value);
    }
    for field in interaction.blurred {
        controller.on_blur(field);
    }
    if interaction.submit {
        match controller.on_submit() {
            SubmitStart::Dispatch(credentials) => {
                debug!("Checking credentials for '{}'", credentials.email);
            }
            SubmitStart::Rejected => debug!("Login form has validation errors"),
            SubmitStart::Busy => {}
        }
    }

    response
}

fn field_input(ui: &mut Ui, view: &LoginFormView, field: Field, interaction: &mut Interaction) {
    let mut value = view.value(field).to_owned();

    ui.label(field.label());
    let edit = TextEdit::singleline(&mut value)
        .password(field == Field::Password)
        .desired_width(f32::INFINITY);
    let response = ui.add_enabled(view.inputs_enabled(), edit);

    if response.changed() {
        interaction.changes.push((field, value));
    }
    if response.lost_focus() {
        interaction.blurred.push(field);
        if ui.input(|i| i.key_pressed(Key::Enter)) {
            interaction.submit = true;
        }
    }

    if let Some(message) = view.error(field) {
        ui.label(RichText::new(message).small().color(COLOR_RED));
    }
}

/// Returns `true` when the button was clicked.
fn submit_button(ui: &mut Ui, view: &LoginFormView) -> bool {
    let text = if view.is_loading {
        "Signing in..."
    } else {
        "Sign in"
    };

    let clicked = ui
        .add_enabled(view.can_submit(), Button::new(text).min_size([FORM_WIDTH, 32.0].into()))
        .clicked();

    if view.is_loading {
        ui.add_space(8.0);
        ui.spinner();
    }

    clicked
}

#[cfg(test)]
mod login_form_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use egui_kittest::Harness;
    use kittest::Queryable;
    use login_business::MockCredentialChecker;

    use super::*;

    fn controller() -> LoginController {
        LoginController::new(Arc::new(
            MockCredentialChecker::default().with_delay(Duration::from_millis(200)),
        ))
    }

    #[tokio::test]
    async fn test_login_form_displayed() {
        let mut harness = Harness::new_ui_state(
            |ui, controller: &mut LoginController| {
                login_form(controller, ui);
            },
            controller(),
        );
        harness.step();

        assert!(harness.query_by_label("Evil Martians").is_some());
        assert!(harness.query_by_label("Email").is_some());
        assert!(harness.query_by_label("Password").is_some());
        assert!(harness.query_by_label("Sign in").is_some());
    }

    #[tokio::test]
    async fn test_no_errors_before_submit() {
        let mut harness = Harness::new_ui_state(
            |ui, controller: &mut LoginController| {
                login_form(controller, ui);
            },
            controller(),
        );
        harness.state_mut().on_email_change("bad");
        harness.step();

        assert!(harness.query_by_label("Please enter a valid email address").is_none());
        assert!(harness.query_by_label("Email is required").is_none());
    }

    #[tokio::test]
    async fn test_loading_state_replaces_button_text() {
        let mut harness = Harness::new_ui_state(
            |ui, controller: &mut LoginController| {
                login_form(controller, ui);
            },
            controller(),
        );
        {
            let controller = harness.state_mut();
            controller.on_email_change("demo@example.com");
            controller.on_password_change("password123");
            let _ = controller.on_submit();
        }
        harness.step();

        assert!(harness.query_by_label("Signing in...").is_some());
        assert!(harness.query_by_label("Sign in").is_none());
    }
}
