use egui::{Id, Modal, Ui};

use crate::state::SuccessNotice;

/// Shows the "Login successful!" modal while `notice` is visible.
pub fn success_notice(notice: &SuccessNotice, ui: &mut Ui) {
    if !notice.is_visible() {
        return;
    }

    let modal = Modal::new(Id::new("login_success_notice")).show(ui.ctx(), |ui| {
        ui.set_width(220.0);
        ui.heading("Login successful!");
        ui.add_space(12.0);
        ui.button("OK").clicked()
    });

    if modal.inner || modal.should_close() {
        notice.dismiss();
    }
}
