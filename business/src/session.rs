//! Signed-in account context and sign-out.
//!
//! The access token lives in [`Session`] and is handed to commands through
//! their snapshot. Nothing in this crate reads credentials from the process
//! environment; that is the job of the [`IdentityProvider`] the binary picks.

use std::any::{Any, TypeId};
use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dashboard_states::{
    Command, CommandFuture, CommandSnapshot, Compute, Dep, LatestOnlyUpdater, State, Updater,
};
use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::BusinessConfig;
use crate::api::{ApiRequest, TransportState};
use crate::http::Method;

pub const FALLBACK_DISPLAY_NAME: &str = "User";

/// The signed-in account as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub name: String,
}

/// External sign-in integration.
pub trait IdentityProvider: Send + Sync + Debug {
    fn current_account(&self) -> Option<Account>;

    fn access_token(&self) -> Option<String>;

    /// Ends the provider session and sends the user to `redirect`.
    fn sign_out(&self, redirect: &str);
}

#[derive(Debug, Default, Deserialize)]
struct RawIdentity {
    dashboard_account_name: Option<String>,
    dashboard_access_token: Option<String>,
}

/// Identity read once from `DASHBOARD_ACCOUNT_NAME` and `DASHBOARD_ACCESS_TOKEN`.
#[derive(Debug, Default)]
pub struct EnvIdentity {
    account_name: Option<String>,
    access_token: Option<String>,
    signed_out: AtomicBool,
}

impl EnvIdentity {
    pub fn new(account_name: Option<String>, access_token: Option<String>) -> Self {
        Self {
            account_name,
            access_token,
            signed_out: AtomicBool::new(false),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let raw: RawIdentity = serde_env::from_iter(std::env::vars())?;
        Ok(Self::new(
            raw.dashboard_account_name.filter(|name| !name.trim().is_empty()),
            raw.dashboard_access_token.filter(|token| !token.is_empty()),
        ))
    }

    pub fn is_signed_out(&self) -> bool {
        self.signed_out.load(Ordering::Acquire)
    }
}

impl IdentityProvider for EnvIdentity {
    fn current_account(&self) -> Option<Account> {
        if self.is_signed_out() {
            return None;
        }
        self.account_name.clone().map(|name| Account { name })
    }

    fn access_token(&self) -> Option<String> {
        if self.is_signed_out() {
            return None;
        }
        self.access_token.clone()
    }

    fn sign_out(&self, redirect: &str) {
        info!("Signing out, redirecting to {redirect}");
        self.signed_out.store(true, Ordering::Release);
    }
}

/// The identity provider of this dashboard.
#[derive(Debug, Clone)]
pub struct IdentityState(pub Arc<dyn IdentityProvider>);

impl IdentityState {
    pub fn new(provider: impl IdentityProvider + 'static) -> Self {
        Self(Arc::new(provider))
    }
}

impl State for IdentityState {
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

/// Who is signed in and the token their requests carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub account: Option<Account>,
    pub access_token: Option<String>,
}

impl Session {
    pub fn new(account_name: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            account: Some(Account {
                name: account_name.into(),
            }),
            access_token,
        }
    }

    pub fn from_provider(provider: &dyn IdentityProvider) -> Self {
        Self {
            account: provider.current_account(),
            access_token: provider.access_token(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.account.is_none()
    }

    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

impl State for Session {
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

/// Names shown in the header and the welcome card, derived from [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greeting {
    pub display_name: String,
    pub first_name: String,
    pub initial: String,
}

impl Greeting {
    pub fn for_account(account: Option<&Account>) -> Self {
        let display_name = account
            .map(|account| account.name.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_DISPLAY_NAME)
            .to_owned();
        let first_name = display_name
            .split(' ')
            .next()
            .unwrap_or_default()
            .to_owned();
        let initial = display_name
            .chars()
            .next()
            .map(String::from)
            .unwrap_or_default();

        Self {
            display_name,
            first_name,
            initial,
        }
    }
}

impl Default for Greeting {
    fn default() -> Self {
        Self::for_account(None)
    }
}

impl State for Greeting {}

impl Compute for Greeting {
    fn deps(&self) -> Vec<TypeId> {
        vec![TypeId::of::<Session>()]
    }

    fn compute(&self, deps: Dep<'_>, updater: Updater) {
        let session = deps.get_state_ref::<Session>();
        let next = Self::for_account(session.account.as_ref());
        if next != *self {
            updater.set(next);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogoutStatus {
    #[default]
    Idle,
    SigningOut,
    SignedOut,
}

impl State for LogoutStatus {
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(*self))
    }
}

impl Compute for LogoutStatus {}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LogoutError {
    #[error("could not reach the server: {0}")]
    Transport(String),
    #[error("server answered sign-out with status {0}")]
    Status(u16),
}

/// Notifies the backend, then signs out of the identity provider.
///
/// The provider sign-out and the session reset happen whether or not the
/// backend call succeeds.
#[derive(Debug, Default)]
pub struct LogoutCommand;

impl Command for LogoutCommand {
    fn accepts(&self, snap: &CommandSnapshot) -> bool {
        *snap.compute::<LogoutStatus>() == LogoutStatus::Idle
    }

    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let config = snap.state::<BusinessConfig>().clone();
        let session = snap.state::<Session>().clone();
        let identity = snap.state::<IdentityState>().clone();
        let transport = snap.state::<TransportState>().transport();

        updater.set(LogoutStatus::SigningOut);

        Box::pin(async move {
            let request = ApiRequest::new(Method::Post, config.logout_url())
                .with_bearer(session.token());
            let result = match transport.send(request).await {
                Ok(response) if response.is_success() => Ok(()),
                Ok(response) => Err(LogoutError::Status(response.status)),
                Err(err) => Err(LogoutError::Transport(err.message)),
            };
            if let Err(err) = result {
                warn!("Logout notification failed: {err}");
            }

            identity.0.sign_out(&config.post_logout_redirect);
            updater.set(Session::default());
            updater.set(LogoutStatus::SignedOut);
        })
    }
}
