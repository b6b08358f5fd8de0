use std::any::Any;
use std::env::vars;

use dashboard_states::State;
use log::info;
use serde::Deserialize;
use ustr::Ustr;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_LOGOUT_PATH: &str = "/auth/logout";
pub const DEFAULT_CREATE_MESSAGE_PATH: &str = "/messages";
pub const DEFAULT_POST_LOGOUT_REDIRECT: &str = "/";
pub const DEFAULT_TUTORIAL_VIDEO: &str = "YZZcnFKMSM0";

/// Configuration of the backend endpoints and the static dashboard content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    pub api_base_url: String,
    pub logout_path: String,
    pub create_message_path: String,
    pub post_logout_redirect: String,
    pub tutorial_video: Ustr,
    pub carousel_videos: Vec<Ustr>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    api_base_url: Option<String>,
    logout_path: Option<String>,
    create_message_path: Option<String>,
    post_logout_redirect: Option<String>,
    tutorial_video: Option<String>,
    // comma separated video ids
    carousel_videos: Option<String>,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        info!("Loading dashboard configuration from environment variables");
        let raw: RawConfig = serde_env::from_iter(vars())?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawConfig) -> Self {
        let defaults = Self::default();
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let carousel_videos = non_empty(raw.carousel_videos)
            .map(|list| parse_video_list(&list))
            .unwrap_or(defaults.carousel_videos);

        Self {
            api_base_url: non_empty(raw.api_base_url).unwrap_or(defaults.api_base_url),
            logout_path: non_empty(raw.logout_path).unwrap_or(defaults.logout_path),
            create_message_path: non_empty(raw.create_message_path)
                .unwrap_or(defaults.create_message_path),
            post_logout_redirect: non_empty(raw.post_logout_redirect)
                .unwrap_or(defaults.post_logout_redirect),
            tutorial_video: non_empty(raw.tutorial_video)
                .map(|id| Ustr::from(id.trim()))
                .unwrap_or(defaults.tutorial_video),
            carousel_videos,
        }
    }

    /// Joins the base URL and `path` with exactly one slash.
    pub fn api_url(&self, path: &str) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base.to_owned()
        } else {
            format!("{base}/{path}")
        }
    }

    pub fn logout_url(&self) -> String {
        self.api_url(&self.logout_path)
    }

    pub fn create_message_url(&self) -> String {
        self.api_url(&self.create_message_path)
    }
}

fn parse_video_list(list: &str) -> Vec<Ustr> {
    list.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(Ustr::from)
        .collect()
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            logout_path: DEFAULT_LOGOUT_PATH.to_owned(),
            create_message_path: DEFAULT_CREATE_MESSAGE_PATH.to_owned(),
            post_logout_redirect: DEFAULT_POST_LOGOUT_REDIRECT.to_owned(),
            tutorial_video: Ustr::from(DEFAULT_TUTORIAL_VIDEO),
            carousel_videos: [
                DEFAULT_TUTORIAL_VIDEO,
                "dQw4w9WgXcQ",
                "M7lc1UVf-VE",
                "aqz-KE-bpKQ",
                "ScMzIvxBSi4",
            ]
            .into_iter()
            .map(Ustr::from)
            .collect(),
        }
    }
}

impl State for BusinessConfig {
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}
