//! Sign-up form state, validation and the two-step submission workflow
//! (create the account, then sign in with the same credentials).

mod form;
mod validation;

pub use form::{FieldUpdate, FormField, SignUpForm};
pub use validation::*;

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::api::ApiResult;
use crate::auth::{AuthError, SessionAuth};
use crate::navigation::Navigator;
use plaza_types::{Route, SignUpRequest};

pub const CREATE_ACCOUNT_FAILED: &str = "Failed to create account";
pub const SIGN_IN_FAILED: &str = "Account created but sign-in failed. Please sign in manually.";
pub const NETWORK_ERROR: &str = "Network error. Please try again.";
pub const SIGNUP_SUCCESS: &str = "Account created successfully! Redirecting to dashboard...";

/// Capability to create an account on the backend.
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn create_account(&self, request: &SignUpRequest) -> ApiResult<()>;
}

/// Why a submission attempt ended without an account and session.
/// `Display` is the banner text shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Please fix the highlighted fields")]
    Validation(FormErrors),

    #[error("{0}")]
    ServerRejection(String),

    #[error("{}", NETWORK_ERROR)]
    Network,

    /// The account exists but no session could be established
    #[error("{}", SIGN_IN_FAILED)]
    SessionEstablishment,

    #[error("A submission is already in progress")]
    InFlight,
}

/// Snapshot of the form observed by the view layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpView {
    pub form: SignUpForm,
    pub errors: FormErrors,
    pub is_loading: bool,
}

impl SignUpView {
    pub fn button_label(&self) -> String {
        let demo = if self.form.demo_user { "demo " } else { "" };
        if self.is_loading {
            format!("Creating {}account...", demo)
        } else if self.form.demo_user {
            "Create Demo Account".to_string()
        } else {
            "Create Account".to_string()
        }
    }

    pub fn demo_notice(&self) -> Option<&'static str> {
        self.form
            .demo_user
            .then_some("Demo account selected - you can upgrade later")
    }
}

#[derive(Debug, Default)]
struct FormState {
    form: SignUpForm,
    errors: FormErrors,
}

/// Held for the duration of one submission; releases the gate on drop so
/// every exit path (including a dropped future) leaves submitting state.
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the sign-up form. Clones share the same state, so the view can keep
/// rendering snapshots while a clone drives `submit()` on another task.
#[derive(Clone)]
pub struct SignUpFormController {
    state: Arc<Mutex<FormState>>,
    in_flight: Arc<AtomicBool>,
    accounts: Arc<dyn AccountService>,
    auth: Arc<dyn SessionAuth>,
    navigator: Arc<dyn Navigator>,
}

impl SignUpFormController {
    pub fn new(
        accounts: Arc<dyn AccountService>,
        auth: Arc<dyn SessionAuth>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(FormState::default())),
            in_flight: Arc::new(AtomicBool::new(false)),
            accounts,
            auth,
            navigator,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one edit and clear any error shown for that field
    pub fn update_field(&self, update: FieldUpdate) {
        let field = update.field();
        let mut state = self.lock();
        state.form.apply(update);
        if state.errors.clear_field(field) {
            log::debug!(target: "form_state", "Cleared error for {}", field.as_str());
        }
    }

    pub fn validate(&self) -> FormErrors {
        validate(&self.lock().form)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> SignUpView {
        let state = self.lock();
        SignUpView {
            form: state.form.clone(),
            errors: state.errors.clone(),
            is_loading: self.is_loading(),
        }
    }

    /// Validate, create the account, then sign in. The outcome is also
    /// published to the form errors; on success the form is reset and the
    /// dashboard route is pushed.
    pub async fn submit(&self) -> Result<(), SubmitError> {
        let form = {
            let mut state = self.lock();
            let errors = validate(&state.form);
            if !errors.is_empty() {
                log::debug!(
                    target: "form_state",
                    "Submission blocked by {} invalid field(s)",
                    errors.fields().count()
                );
                state.errors = errors.clone();
                return Err(SubmitError::Validation(errors));
            }
            state.form.clone()
        };

        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            log::warn!("Ignoring submit: a submission is already in flight");
            SubmitError::InFlight
        })?;
        self.lock().errors = FormErrors::new();

        let result = self.run_submission(&form).await;

        match &result {
            Ok(()) => {
                log::info!("{}", SIGNUP_SUCCESS);
                *self.lock() = FormState::default();
                self.navigator.push(Route::Dashboard);
            }
            Err(err) => {
                self.lock().errors = FormErrors::submit_only(err.to_string());
            }
        }

        result
    }

    async fn run_submission(&self, form: &SignUpForm) -> Result<(), SubmitError> {
        log::info!("Creating account (demo_user={})", form.demo_user);

        match self.accounts.create_account(&form.to_request()).await {
            Ok(()) => {}
            Err(err) if err.is_rejection() => {
                log::warn!("Account creation rejected: {}", err);
                let message = err.server_message().unwrap_or(CREATE_ACCOUNT_FAILED);
                return Err(SubmitError::ServerRejection(message.to_string()));
            }
            Err(err) => {
                log::error!("Account creation failed: {}", err);
                return Err(SubmitError::Network);
            }
        }

        match self.auth.sign_in_with_password(&form.credentials()).await {
            Ok(_) => Ok(()),
            Err(AuthError::Rejected(reason)) => {
                // The account now exists without a session; the user signs in manually
                log::warn!("Account created but sign-in was rejected: {}", reason);
                Err(SubmitError::SessionEstablishment)
            }
            Err(AuthError::Serialization(err)) => {
                // Answered but unreadable: still no session for an account that exists
                log::error!("Account created but the sign-in reply was unreadable: {}", err);
                Err(SubmitError::SessionEstablishment)
            }
            Err(err @ AuthError::Network(_)) => {
                log::error!("Sign-in after account creation failed: {}", err);
                Err(SubmitError::Network)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use plaza_types::{AuthSession, SignInRequest};
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    async fn transport_error() -> reqwest::Error {
        reqwest::Client::new()
            .get("not a url")
            .send()
            .await
            .unwrap_err()
    }

    #[derive(Clone, Copy)]
    enum Reply {
        Ok,
        Reject(Option<&'static str>),
        Transport,
        Garbled,
    }

    struct FakeAccounts {
        reply: Reply,
        calls: Mutex<Vec<SignUpRequest>>,
        hold: Option<(Arc<Notify>, Arc<Notify>)>,
    }

    impl FakeAccounts {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: Mutex::new(Vec::new()),
                hold: None,
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl AccountService for FakeAccounts {
        async fn create_account(&self, request: &SignUpRequest) -> ApiResult<()> {
            self.calls.lock().unwrap().push(request.clone());
            if let Some((entered, release)) = &self.hold {
                entered.notify_one();
                release.notified().await;
            }
            match self.reply {
                Reply::Ok => Ok(()),
                Reply::Reject(message) => Err(ApiError::Status {
                    status: 409,
                    message: message.map(str::to_string),
                }),
                Reply::Transport => Err(transport_error().await.into()),
                Reply::Garbled => Err(serde_json::from_str::<()>("{").unwrap_err().into()),
            }
        }
    }

    struct FakeAuth {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl FakeAuth {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl SessionAuth for FakeAuth {
        async fn sign_in_with_password(&self, credentials: &SignInRequest) -> Result<AuthSession, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Ok => Ok(AuthSession {
                    access_token: format!("token-for-{}", credentials.email),
                    refresh_token: None,
                    expires_at: None,
                    user: None,
                }),
                Reply::Reject(message) => Err(AuthError::Rejected(
                    message.unwrap_or("Invalid login credentials").to_string(),
                )),
                Reply::Transport => Err(transport_error().await.into()),
                Reply::Garbled => Err(serde_json::from_str::<AuthSession>(r#"{"user":{"id":42}}"#)
                    .unwrap_err()
                    .into()),
            }
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        routes: Mutex<Vec<Route>>,
    }

    impl Navigator for RecordingNavigator {
        fn push(&self, route: Route) {
            self.routes.lock().unwrap().push(route);
        }
    }

    fn build_controller(
        accounts: Arc<FakeAccounts>,
        auth: Arc<FakeAuth>,
    ) -> (SignUpFormController, Arc<RecordingNavigator>) {
        let navigator = Arc::new(RecordingNavigator::default());
        let controller = SignUpFormController::new(accounts, auth, navigator.clone());
        (controller, navigator)
    }

    fn fill_valid(controller: &SignUpFormController) {
        controller.update_field(FieldUpdate::FirstName("sasha".to_string()));
        controller.update_field(FieldUpdate::LastName("smith".to_string()));
        controller.update_field(FieldUpdate::Email("sasha.smith@gmail.com".to_string()));
        controller.update_field(FieldUpdate::Password("11111111".to_string()));
        controller.update_field(FieldUpdate::ConfirmPassword("11111111".to_string()));
    }

    #[test]
    fn test_form_starts_empty() {
        let (controller, _) = build_controller(FakeAccounts::new(Reply::Ok), FakeAuth::new(Reply::Ok));
        let view = controller.snapshot();
        assert_eq!(view.form, SignUpForm::default());
        assert!(view.errors.is_empty());
        assert!(!view.is_loading);
        assert_eq!(view.button_label(), "Create Account");
        assert_eq!(view.demo_notice(), None);
    }

    #[test]
    fn test_update_clears_only_that_field_error() {
        let (controller, _) = build_controller(FakeAccounts::new(Reply::Ok), FakeAuth::new(Reply::Ok));
        controller.lock().errors = validate(&SignUpForm::default());

        controller.update_field(FieldUpdate::Email("x".to_string()));

        let errors = controller.snapshot().errors;
        assert!(!errors.contains(FormField::Email));
        assert!(errors.contains(FormField::FirstName));
    }

    #[test]
    fn test_demo_flag_changes_labels() {
        let (controller, _) = build_controller(FakeAccounts::new(Reply::Ok), FakeAuth::new(Reply::Ok));
        controller.update_field(FieldUpdate::DemoUser(true));

        let mut view = controller.snapshot();
        assert_eq!(view.button_label(), "Create Demo Account");
        assert!(view.demo_notice().is_some());

        view.is_loading = true;
        assert_eq!(view.button_label(), "Creating demo account...");
    }

    #[tokio::test]
    async fn test_invalid_form_makes_no_network_call() {
        let accounts = FakeAccounts::new(Reply::Ok);
        let auth = FakeAuth::new(Reply::Ok);
        let (controller, navigator) = build_controller(accounts.clone(), auth.clone());

        let err = controller.submit().await.unwrap_err();

        let errors = match err {
            SubmitError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        };
        assert!(errors.contains(FormField::FirstName));
        assert_eq!(controller.snapshot().errors, errors);
        assert_eq!(accounts.call_count(), 0);
        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
        assert!(!controller.is_loading());
        assert!(navigator.routes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_successful_submit_resets_and_navigates() {
        let accounts = FakeAccounts::new(Reply::Ok);
        let auth = FakeAuth::new(Reply::Ok);
        let (controller, navigator) = build_controller(accounts.clone(), auth.clone());
        fill_valid(&controller);
        controller.update_field(FieldUpdate::DemoUser(true));

        controller.submit().await.unwrap();

        let sent = accounts.calls.lock().unwrap()[0].clone();
        assert_eq!(sent.first_name, "sasha");
        assert_eq!(sent.email, "sasha.smith@gmail.com");
        assert!(sent.demo_user);
        assert_eq!(auth.calls.load(Ordering::SeqCst), 1);

        let view = controller.snapshot();
        assert_eq!(view.form, SignUpForm::default());
        assert!(view.errors.is_empty());
        assert!(!view.is_loading);
        assert_eq!(*navigator.routes.lock().unwrap(), vec![Route::Dashboard]);
    }

    #[tokio::test]
    async fn test_server_rejection_message_is_shown_verbatim() {
        let auth = FakeAuth::new(Reply::Ok);
        let (controller, navigator) =
            build_controller(FakeAccounts::new(Reply::Reject(Some("Email taken"))), auth.clone());
        fill_valid(&controller);

        let err = controller.submit().await.unwrap_err();

        assert_eq!(err, SubmitError::ServerRejection("Email taken".to_string()));
        assert_eq!(controller.snapshot().errors.submit(), Some("Email taken"));
        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
        assert!(navigator.routes.lock().unwrap().is_empty());
        // Input is kept so the user can correct it
        assert_eq!(controller.snapshot().form.first_name, "sasha");
    }

    #[tokio::test]
    async fn test_server_rejection_without_message_uses_fallback() {
        let (controller, _) =
            build_controller(FakeAccounts::new(Reply::Reject(None)), FakeAuth::new(Reply::Ok));
        fill_valid(&controller);

        controller.submit().await.unwrap_err();
        assert_eq!(controller.snapshot().errors.submit(), Some(CREATE_ACCOUNT_FAILED));
    }

    #[tokio::test]
    async fn test_sign_in_failure_is_partial_success() {
        let (controller, navigator) =
            build_controller(FakeAccounts::new(Reply::Ok), FakeAuth::new(Reply::Reject(None)));
        fill_valid(&controller);

        let err = controller.submit().await.unwrap_err();

        assert_eq!(err, SubmitError::SessionEstablishment);
        assert_eq!(controller.snapshot().errors.submit(), Some(SIGN_IN_FAILED));
        assert!(navigator.routes.lock().unwrap().is_empty());
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_unreadable_sign_in_reply_is_partial_success() {
        let accounts = FakeAccounts::new(Reply::Ok);
        let (controller, navigator) =
            build_controller(accounts.clone(), FakeAuth::new(Reply::Garbled));
        fill_valid(&controller);

        let err = controller.submit().await.unwrap_err();

        assert_eq!(err, SubmitError::SessionEstablishment);
        assert_eq!(controller.snapshot().errors.submit(), Some(SIGN_IN_FAILED));
        assert_eq!(accounts.call_count(), 1);
        assert!(navigator.routes.lock().unwrap().is_empty());
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_transport_failures_are_network_errors() {
        for (accounts, auth) in [
            (Reply::Transport, Reply::Ok),
            (Reply::Ok, Reply::Transport),
        ] {
            let (controller, navigator) =
                build_controller(FakeAccounts::new(accounts), FakeAuth::new(auth));
            fill_valid(&controller);

            assert_eq!(controller.submit().await.unwrap_err(), SubmitError::Network);
            assert_eq!(controller.snapshot().errors.submit(), Some(NETWORK_ERROR));
            assert!(navigator.routes.lock().unwrap().is_empty());
            assert!(!controller.is_loading());
        }
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_rejected() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let accounts = Arc::new(FakeAccounts {
            reply: Reply::Ok,
            calls: Mutex::new(Vec::new()),
            hold: Some((entered.clone(), release.clone())),
        });
        let (controller, navigator) = build_controller(accounts.clone(), FakeAuth::new(Reply::Ok));
        fill_valid(&controller);

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit().await }
        });
        entered.notified().await;

        assert!(controller.is_loading());
        assert_eq!(controller.snapshot().button_label(), "Creating account...");
        assert_eq!(controller.submit().await.unwrap_err(), SubmitError::InFlight);
        assert_eq!(accounts.call_count(), 1);

        release.notify_one();
        first.await.unwrap().unwrap();

        assert!(!controller.is_loading());
        assert_eq!(navigator.routes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dropped_submission_releases_gate() {
        let entered = Arc::new(Notify::new());
        let accounts = Arc::new(FakeAccounts {
            reply: Reply::Ok,
            calls: Mutex::new(Vec::new()),
            hold: Some((entered.clone(), Arc::new(Notify::new()))),
        });
        let (controller, _) = build_controller(accounts, FakeAuth::new(Reply::Ok));
        fill_valid(&controller);

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit().await }
        });
        entered.notified().await;
        assert!(controller.is_loading());

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        assert!(!controller.is_loading());
    }
}
