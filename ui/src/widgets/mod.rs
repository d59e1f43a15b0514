mod login_form;
mod success_notice;

pub use login_form::login_form;
pub use success_notice::success_notice;
