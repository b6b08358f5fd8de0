use dashboard_business::{
    BusinessConfig, EnvIdentity, HttpTransport, IdentityState, TransportState, build_state_ctx,
};
use dashboard_states::StateCtx;
use log::info;
use serde::Deserialize;

/// Which parts of the dashboard are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    /// Attachment picker, drop target and preview in the feedback form.
    pub attachments: bool,
    /// Paged video carousel under the tutorial video.
    pub carousel: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            attachments: true,
            carousel: true,
        }
    }
}

impl ViewOptions {
    /// Text-only feedback and the tutorial video.
    pub fn basic() -> Self {
        Self {
            attachments: false,
            carousel: false,
        }
    }

    /// Reads `DASHBOARD_ATTACHMENTS` and `DASHBOARD_CAROUSEL`, both defaulting to on.
    pub fn from_env() -> anyhow::Result<Self> {
        #[derive(Debug, Deserialize)]
        struct RawViewOptions {
            dashboard_attachments: Option<bool>,
            dashboard_carousel: Option<bool>,
        }

        let raw: RawViewOptions = serde_env::from_iter(std::env::vars())?;
        let defaults = Self::default();
        Ok(Self {
            attachments: raw.dashboard_attachments.unwrap_or(defaults.attachments),
            carousel: raw.dashboard_carousel.unwrap_or(defaults.carousel),
        })
    }
}

/// Per-frame view flags that do not belong to the business layer.
#[derive(Debug, Default)]
pub struct ViewState {
    /// Set by the attach button, consumed by the app after the frame.
    pub pick_file_requested: bool,
}

/// The main application state.
pub struct State {
    /// The state context for business logic.
    pub ctx: StateCtx,
    pub options: ViewOptions,
    pub view: ViewState,
}

impl State {
    pub fn new(ctx: StateCtx, options: ViewOptions) -> Self {
        Self {
            ctx,
            options,
            view: ViewState::default(),
        }
    }

    /// State wired to the environment: endpoints, identity and view options.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = BusinessConfig::from_env()?;
        let identity = EnvIdentity::from_env()?;
        let options = ViewOptions::from_env()?;
        info!("Dashboard at {} with {options:?}", config.api_base_url);

        let ctx = build_state_ctx(
            config,
            IdentityState::new(identity),
            TransportState::new(HttpTransport),
        );
        Ok(Self::new(ctx, options))
    }

    /// State for view tests. Requests would go to `base_url`.
    pub fn test(base_url: String, account: Option<&str>, options: ViewOptions) -> Self {
        let identity = EnvIdentity::new(account.map(str::to_owned), Some("test_token".to_owned()));
        let ctx = build_state_ctx(
            BusinessConfig::new(base_url),
            IdentityState::new(identity),
            TransportState::new(HttpTransport),
        );
        Self::new(ctx, options)
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("ctx", &self.ctx)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
