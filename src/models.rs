//! Data models and structures
//!
//! Defines the profile snapshot handed to the response pipeline
//! ([`UserContext`]) and the environment-driven [`Config`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileLink {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Twitter,
    Instagram,
    LinkedIn,
    GitHub,
    YouTube,
    TikTok,
    Facebook,
    Threads,
}

impl SocialPlatform {
    const HOSTS: [(&'static str, SocialPlatform); 9] = [
        ("x.com", SocialPlatform::Twitter),
        ("twitter.com", SocialPlatform::Twitter),
        ("instagram.com", SocialPlatform::Instagram),
        ("linkedin.com", SocialPlatform::LinkedIn),
        ("github.com", SocialPlatform::GitHub),
        ("youtube.com", SocialPlatform::YouTube),
        ("tiktok.com", SocialPlatform::TikTok),
        ("facebook.com", SocialPlatform::Facebook),
        ("threads.net", SocialPlatform::Threads),
    ];

    /// Detect the platform a URL points at, matching on its host.
    pub fn detect(url: &str) -> Option<Self> {
        Self::from_url(&Url::parse(url).ok()?)
    }

    fn from_url(url: &Url) -> Option<Self> {
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        let host = url.host_str()?.trim_start_matches("www.");
        Self::HOSTS
            .iter()
            .find(|(domain, _)| host == *domain || host.ends_with(&format!(".{}", domain)))
            .map(|(_, platform)| *platform)
    }

    /// Handle from a profile-shaped path: `/<handle>`, `/@handle`, or
    /// LinkedIn's `/in/<handle>`. Channel, page and company paths carry none.
    fn handle(&self, url: &Url) -> Option<String> {
        let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
        let first = segments.next()?;
        let handle = match (*self, first) {
            (SocialPlatform::LinkedIn, "in") => segments.next()?,
            (SocialPlatform::LinkedIn, _) => return None,
            (_, "channel" | "c" | "user" | "company" | "profile.php" | "pages" | "groups") => {
                return None
            }
            _ => first,
        };

        let handle = handle.strip_prefix('@').unwrap_or(handle);
        let valid = !handle.is_empty()
            && handle
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
        valid.then(|| handle.to_string())
    }

    pub fn label(&self) -> &'static str {
        match self {
            SocialPlatform::Twitter => "X (Twitter)",
            SocialPlatform::Instagram => "Instagram",
            SocialPlatform::LinkedIn => "LinkedIn",
            SocialPlatform::GitHub => "GitHub",
            SocialPlatform::YouTube => "YouTube",
            SocialPlatform::TikTok => "TikTok",
            SocialPlatform::Facebook => "Facebook",
            SocialPlatform::Threads => "Threads",
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub platform: SocialPlatform,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl SocialLink {
    pub fn from_url(url: &str) -> Option<Self> {
        let parsed = Url::parse(url).ok()?;
        let platform = SocialPlatform::from_url(&parsed)?;
        Some(Self {
            platform,
            url: url.to_string(),
            username: platform.handle(&parsed),
        })
    }
}

/// Read-only profile snapshot passed into the pipeline.
///
/// `links` holds the active, non-social links in display order; links that
/// point at a known social platform are listed under `social_links` instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub profile: Profile,
    #[serde(default)]
    pub links: Vec<ProfileLink>,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
}

/// On-disk profile export: the profile plus its links in display order.
#[derive(Debug, Deserialize)]
struct ProfileFile {
    profile: Profile,
    #[serde(default)]
    links: Vec<ProfileLink>,
}

impl UserContext {
    pub fn from_profile(profile: Profile, links: Vec<ProfileLink>) -> Self {
        let mut active = Vec::new();
        let mut social_links = Vec::new();

        for link in links.into_iter().filter(|l| l.is_active) {
            match SocialLink::from_url(&link.url) {
                Some(social) => social_links.push(social),
                None => active.push(link),
            }
        }

        Self {
            profile,
            links: active,
            social_links,
        }
    }

    /// Load a profile export (`{"profile": {...}, "links": [...]}`) from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let file: ProfileFile = serde_json::from_str(&fs::read_to_string(path)?)?;
        if file.profile.display_name.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "profile in {} has an empty displayName",
                path.display()
            )));
        }
        Ok(Self::from_profile(file.profile, file.links))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    OpenAi,
    Gemini,
}

impl AiProvider {
    pub fn default_model(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "gpt-4o-mini",
            AiProvider::Gemini => "gemini-2.0-flash",
        }
    }

    fn api_key_var(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "OPENAI_API_KEY",
            AiProvider::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl FromStr for AiProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(AiProvider::OpenAi),
            "gemini" => Ok(AiProvider::Gemini),
            other => Err(Error::Config(format!(
                "Unknown AI_PROVIDER '{}'. Expected 'openai' or 'gemini'",
                other
            ))),
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: AiProvider,
    /// `None` when the credential for `provider` is not set.
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: AiProvider::OpenAi,
            api_key: None,
            model: AiProvider::OpenAi.default_model().to_string(),
            timeout: Duration::from_millis(8000),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let provider = match lookup("AI_PROVIDER") {
            Some(value) => value.parse()?,
            None => defaults.provider,
        };

        let api_key = lookup(provider.api_key_var()).filter(|k| !k.trim().is_empty());
        let model = lookup("AI_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| provider.default_model().to_string());

        let timeout = match lookup("AI_TIMEOUT_MS") {
            Some(value) => Duration::from_millis(parse_var("AI_TIMEOUT_MS", &value)?),
            None => defaults.timeout,
        };
        let temperature = match lookup("AI_TEMPERATURE") {
            Some(value) => parse_var("AI_TEMPERATURE", &value)?,
            None => defaults.temperature,
        };
        let max_tokens = match lookup("AI_MAX_TOKENS") {
            Some(value) => parse_var("AI_MAX_TOKENS", &value)?,
            None => defaults.max_tokens,
        };

        Ok(Self {
            provider,
            api_key,
            model,
            timeout,
            temperature,
            max_tokens,
        })
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} has an invalid value '{}'", key, value)))
}
