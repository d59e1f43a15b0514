//! Submission orchestration for the login form.
//!
//! `LoginController` is the one object a view talks to. It keeps the
//! [`LoginForm`] inside a [`StateCtx`] so every change reaches subscribed
//! listeners, and runs the credential check as a cancellable task whose single
//! outcome is posted back through an [`Updater`](login_states::Updater).
//!
//! ## Flow
//!
//! 1. `on_submit()` validates; on success the form locks and a check is spawned
//! 2. The task resolves and posts a [`CheckCompletion`]
//! 3. `sync()` (called by the view every frame) unlocks the form, records the
//!    outcome, and fires the success callback on the owning thread
//!
//! Dropping the controller cancels an in-flight check; its result is never applied.
//! A check that panics, or an inline [`LoginController::submit`] future that is
//! dropped early, still ends the submission with the generic failure message.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use log::error;
use login_states::{State, StateCtx, SubscriptionId, run_isolated, spawn_task};
use tokio_util::sync::CancellationToken;

use crate::credentials::{CredentialChecker, CredentialError};
use crate::login_form::{Field, LoginForm, LoginFormView, SubmitOutcome, SubmitStart};

/// Slot the spawned check writes its result into.
#[derive(Debug, Default)]
pub struct CheckCompletion {
    pending: Option<(u64, Result<(), CredentialError>)>,
}

impl State for CheckCompletion {}

/// The spawned check currently owning the form's submitting flag.
#[derive(Debug)]
struct InFlight {
    generation: u64,
    cancel: CancellationToken,
}

type SuccessCallback = Box<dyn FnMut()>;

pub struct LoginController {
    ctx: StateCtx,
    checker: Arc<dyn CredentialChecker>,
    on_success: Option<SuccessCallback>,
    in_flight: Option<InFlight>,
    generation: u64,
}

impl Debug for LoginController {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginController")
            .field("ctx", &self.ctx)
            .field("checker", &self.checker)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl LoginController {
    pub fn new(checker: Arc<dyn CredentialChecker>) -> Self {
        let mut ctx = StateCtx::new();
        ctx.add_state(LoginForm::new());
        ctx.add_state(CheckCompletion::default());

        Self {
            ctx,
            checker,
            on_success: None,
            in_flight: None,
            generation: 0,
        }
    }

    /// Sets the callback fired once per successful login.
    pub fn on_success(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Registers a listener called after every state change.
    pub fn subscribe(&mut self, listener: impl FnMut(&'static str) + 'static) -> SubscriptionId {
        self.ctx.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.ctx.unsubscribe(id)
    }

    pub fn form(&self) -> &LoginForm {
        self.ctx.state::<LoginForm>()
    }

    pub fn view(&self) -> LoginFormView {
        self.form().view()
    }

    pub fn is_loading(&self) -> bool {
        self.form().is_loading()
    }

    pub fn on_email_change(&mut self, text: impl Into<String>) -> bool {
        self.on_change(Field::Email, text)
    }

    pub fn on_password_change(&mut self, text: impl Into<String>) -> bool {
        self.on_change(Field::Password, text)
    }

    pub fn on_change(&mut self, field: Field, text: impl Into<String>) -> bool {
        let text = text.into();
        self.ctx.update::<LoginForm, _>(move |form| form.on_change(field, text))
    }

    pub fn on_email_blur(&mut self) {
        self.on_blur(Field::Email);
    }

    pub fn on_password_blur(&mut self) {
        self.on_blur(Field::Password);
    }

    pub fn on_blur(&mut self, field: Field) {
        self.ctx.update::<LoginForm, _>(|form| form.on_blur(field));
    }

    /// Validates and, if both fields pass, spawns the credential check.
    ///
    /// Requires an entered tokio runtime when the check is spawned.
    pub fn on_submit(&mut self) -> SubmitStart {
        let start = self.ctx.update::<LoginForm, _>(LoginForm::begin_submit);

        if let SubmitStart::Dispatch(credentials) = &start {
            self.generation += 1;
            let generation = self.generation;
            let cancel = CancellationToken::new();
            let updater = self.ctx.updater();
            let checker = Arc::clone(&self.checker);
            let credentials = credentials.clone();

            spawn_task(cancel.clone(), async move {
                let check = async move { checker.check_credentials(&credentials).await };
                let result = run_isolated(check).await.unwrap_or_else(|err| {
                    error!("Credential check aborted: {err}");
                    Err(CredentialError::Transport(String::new()))
                });
                updater.set(CheckCompletion {
                    pending: Some((generation, result)),
                });
            });

            self.in_flight = Some(InFlight { generation, cancel });
        }

        start
    }

    /// Validates and runs the credential check inline.
    ///
    /// Returns `None` if validation rejected the form or a spawned check is
    /// still in flight. The exclusive borrow keeps the form from being
    /// resubmitted while this future is pending. Dropping the future before
    /// it resolves fails the submission with [`CredentialError::Cancelled`].
    pub async fn submit(&mut self) -> Option<SubmitOutcome> {
        let start = self.ctx.update::<LoginForm, _>(LoginForm::begin_submit);
        let SubmitStart::Dispatch(credentials) = start else {
            return None;
        };

        let checker = Arc::clone(&self.checker);
        let mut pending = PendingSubmit {
            controller: self,
            done: false,
        };
        let result = checker.check_credentials(&credentials).await;
        pending.done = true;
        pending.controller.finish(result)
    }

    /// Applies any result posted by a spawned check.
    ///
    /// Call this once per frame; it is cheap when nothing is pending.
    pub fn sync(&mut self) -> Option<SubmitOutcome> {
        self.ctx.sync();
        self.take_completion()
    }

    /// Waits for the in-flight check (if any) and applies its result.
    pub async fn settle(&mut self) -> Option<SubmitOutcome> {
        while self.in_flight.is_some() {
            self.ctx.wait_sync().await;
            if let Some(outcome) = self.take_completion() {
                return Some(outcome);
            }
        }
        None
    }

    fn take_completion(&mut self) -> Option<SubmitOutcome> {
        if self.ctx.state::<CheckCompletion>().pending.is_none() {
            return None;
        }
        let (generation, result) = self
            .ctx
            .update::<CheckCompletion, _>(|slot| slot.pending.take())?;

        match &self.in_flight {
            Some(in_flight) if in_flight.generation == generation => {}
            _ => return None,
        }
        self.in_flight = None;

        self.finish(result)
    }

    fn finish(&mut self, result: Result<(), CredentialError>) -> Option<SubmitOutcome> {
        let outcome = self
            .ctx
            .update::<LoginForm, _>(|form| form.finish_submit(result))?;

        if outcome == SubmitOutcome::Succeeded
            && let Some(callback) = self.on_success.as_mut()
        {
            callback();
        }
        Some(outcome)
    }
}

impl Drop for LoginController {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancel.cancel();
        }
    }
}

/// Unlocks the form if an inline submit is dropped before its check resolves.
struct PendingSubmit<'a> {
    controller: &'a mut LoginController,
    done: bool,
}

impl Drop for PendingSubmit<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.controller
                .ctx
                .update::<LoginForm, _>(|form| form.finish_submit(Err(CredentialError::Cancelled)));
        }
    }
}
