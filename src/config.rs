use crate::error::EnhanceError;
use crate::logging::LogLevel;
use serde::Deserialize;

pub const CONFIG_ELEMENT_ID: &str = "site-enhance-config";

const DEFAULT_FOLLOWER_SMOOTHING: f64 = 0.15;
const DEFAULT_MAGNETIC_STRENGTH: f64 = 0.3;
const DEFAULT_COPY_FEEDBACK_MS: u32 = 2_000;
const DEFAULT_MODAL_CLOSE_MS: u32 = 300;
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;
const DEFAULT_THEME_KEY: &str = "theme";
const DEFAULT_NATIVE_CURSOR_KEY: &str = "nativeCursor";

const FOLLOWER_SMOOTHING_BOUNDS: (f64, f64) = (0.01, 1.0);
const MAGNETIC_STRENGTH_BOUNDS: (f64, f64) = (0.0, 1.0);
const COPY_FEEDBACK_MS_BOUNDS: (u32, u32) = (100, 10_000);
const MODAL_CLOSE_MS_BOUNDS: (u32, u32) = (0, 5_000);

#[derive(Clone, Debug, PartialEq)]
pub struct EnhanceConfig {
    pub follower_smoothing: f64,
    pub magnetic_strength: f64,
    pub copy_feedback_ms: u32,
    pub modal_close_ms: u32,
    pub log_level: LogLevel,
    pub storage_keys: StorageKeys,
    pub features: FeatureFlags,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub theme: String,
    pub native_cursor: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME_KEY.to_string(),
            native_cursor: DEFAULT_NATIVE_CURSOR_KEY.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub video: bool,
    pub cursor: bool,
    pub magnetic: bool,
    pub code_toolbar: bool,
    pub theme_toggle: bool,
    pub cursor_toggle: bool,
    pub toc: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            video: true,
            cursor: true,
            magnetic: true,
            code_toolbar: true,
            theme_toggle: true,
            cursor_toggle: true,
            toc: true,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    follower_smoothing: Option<f64>,
    magnetic_strength: Option<f64>,
    copy_feedback_ms: Option<u64>,
    modal_close_ms: Option<u64>,
    log_level: Option<String>,
    #[serde(default)]
    storage_keys: StorageKeys,
    #[serde(default)]
    features: FeatureFlags,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            follower_smoothing: DEFAULT_FOLLOWER_SMOOTHING,
            magnetic_strength: DEFAULT_MAGNETIC_STRENGTH,
            copy_feedback_ms: DEFAULT_COPY_FEEDBACK_MS,
            modal_close_ms: DEFAULT_MODAL_CLOSE_MS,
            log_level: DEFAULT_LOG_LEVEL,
            storage_keys: StorageKeys::default(),
            features: FeatureFlags::default(),
        }
    }
}

impl EnhanceConfig {
    /// Parses the page's JSON config blob. Missing fields take their defaults
    /// and numeric knobs are clamped into their bounds.
    pub fn from_json(source: &str) -> Result<Self, EnhanceError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: RawConfig = serde_json::from_str(source)?;

        let storage_keys = StorageKeys {
            theme: non_empty_or(raw.storage_keys.theme, DEFAULT_THEME_KEY),
            native_cursor: non_empty_or(raw.storage_keys.native_cursor, DEFAULT_NATIVE_CURSOR_KEY),
        };

        Ok(Self {
            follower_smoothing: clamp_f64(
                raw.follower_smoothing,
                DEFAULT_FOLLOWER_SMOOTHING,
                FOLLOWER_SMOOTHING_BOUNDS,
            ),
            magnetic_strength: clamp_f64(
                raw.magnetic_strength,
                DEFAULT_MAGNETIC_STRENGTH,
                MAGNETIC_STRENGTH_BOUNDS,
            ),
            copy_feedback_ms: clamp_ms(
                raw.copy_feedback_ms,
                DEFAULT_COPY_FEEDBACK_MS,
                COPY_FEEDBACK_MS_BOUNDS,
            ),
            modal_close_ms: clamp_ms(raw.modal_close_ms, DEFAULT_MODAL_CLOSE_MS, MODAL_CLOSE_MS_BOUNDS),
            log_level: raw
                .log_level
                .as_deref()
                .and_then(LogLevel::parse)
                .unwrap_or(DEFAULT_LOG_LEVEL),
            storage_keys,
            features: raw.features,
        })
    }
}

fn clamp_f64(value: Option<f64>, default: f64, bounds: (f64, f64)) -> f64 {
    value
        .filter(|value| value.is_finite())
        .map(|value| value.clamp(bounds.0, bounds.1))
        .unwrap_or(default)
}

fn clamp_ms(value: Option<u64>, default: u32, bounds: (u32, u32)) -> u32 {
    value
        .map(|value| value.clamp(u64::from(bounds.0), u64::from(bounds.1)) as u32)
        .unwrap_or(default)
}

fn non_empty_or(value: String, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}
