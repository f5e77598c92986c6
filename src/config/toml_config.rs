use crate::core::controller::PageSettings;
use crate::core::date_range::{DateRangePolicy, DEFAULT_MAX_SPAN_DAYS};
use crate::core::profile_store::PROFILE_KEY;
use crate::domain::model::{ImageRef, ProfileDefaults, SortMode, DEFAULT_AVATAR, DEFAULT_NICKNAME};
use crate::utils::error::{MyPageError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// 日期範圍允許設定的上限（一年）
pub const MAX_CONFIGURABLE_SPAN_DAYS: i64 = 366;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub profile: ProfileConfig,
    pub listing: ListingConfig,
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
    pub profile_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "./.mypage".to_string(),
            profile_key: PROFILE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub default_nickname: String,
    pub default_avatar: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            default_nickname: DEFAULT_NICKNAME.to_string(),
            default_avatar: DEFAULT_AVATAR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub default_sort: SortMode,
    pub trim_search_term: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub max_span_days: i64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            max_span_days: DEFAULT_MAX_SPAN_DAYS,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 檔案不存在時使用預設值
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MyPageError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MYPAGE_HOME})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("storage.path", &self.storage.path)?;
        validation::validate_non_empty_string("storage.profile_key", &self.storage.profile_key)?;
        validation::validate_non_empty_string(
            "profile.default_nickname",
            &self.profile.default_nickname,
        )?;
        validation::validate_non_empty_string(
            "profile.default_avatar",
            &self.profile.default_avatar,
        )?;
        validation::validate_range(
            "calendar.max_span_days",
            self.calendar.max_span_days,
            1,
            MAX_CONFIGURABLE_SPAN_DAYS,
        )?;
        Ok(())
    }

    pub fn profile_defaults(&self) -> ProfileDefaults {
        ProfileDefaults {
            nickname: self.profile.default_nickname.clone(),
            avatar: ImageRef(self.profile.default_avatar.clone()),
        }
    }

    pub fn page_settings(&self) -> PageSettings {
        PageSettings {
            default_sort: self.listing.default_sort,
            trim_search_term: self.listing.trim_search_term,
            date_policy: DateRangePolicy::new(self.calendar.max_span_days),
            profile_defaults: self.profile_defaults(),
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[storage]
path = "/var/lib/mypage"
profile_key = "profile"

[profile]
default_nickname = "닉네임 없음"
default_avatar = "asset://avatar.png"

[listing]
default_sort = "latest"
trim_search_term = true

[calendar]
max_span_days = 14
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.storage.path, "/var/lib/mypage");
        assert_eq!(config.storage.profile_key, "profile");
        assert_eq!(config.profile_defaults().nickname, "닉네임 없음");

        let settings = config.page_settings();
        assert_eq!(settings.default_sort, SortMode::Newest);
        assert!(settings.trim_search_term);
        assert_eq!(settings.date_policy.max_span_days, 14);
        assert_eq!(settings.profile_defaults, config.profile_defaults());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage.profile_key, "userInfo");
        assert_eq!(config.calendar.max_span_days, 7);
        assert_eq!(config.listing.default_sort, SortMode::Newest);
        assert!(!config.listing.trim_search_term);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = AppConfig::from_toml_str("[listing]\ndefault_sort = \"oldest\"\n").unwrap();

        assert_eq!(config.listing.default_sort, SortMode::Oldest);
        assert_eq!(config.profile, ProfileConfig::default());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MYPAGE_TEST_STORAGE_DIR", "/tmp/mypage-test");

        let config =
            AppConfig::from_toml_str("[storage]\npath = \"${MYPAGE_TEST_STORAGE_DIR}/state\"\n")
                .unwrap();
        assert_eq!(config.storage.path, "/tmp/mypage-test/state");

        std::env::remove_var("MYPAGE_TEST_STORAGE_DIR");
    }

    #[test]
    fn test_unset_env_var_is_left_alone() {
        let config =
            AppConfig::from_toml_str("[storage]\npath = \"${MYPAGE_TEST_NEVER_SET}\"\n").unwrap();
        assert_eq!(config.storage.path, "${MYPAGE_TEST_NEVER_SET}");
    }

    #[test]
    fn test_config_validation() {
        let zero_span = AppConfig::from_toml_str("[calendar]\nmax_span_days = 0\n").unwrap();
        assert!(zero_span.validate().is_err());

        let blank_nickname =
            AppConfig::from_toml_str("[profile]\ndefault_nickname = \"  \"\n").unwrap();
        assert!(blank_nickname.validate().is_err());

        let empty_path = AppConfig::from_toml_str("[storage]\npath = \"\"\n").unwrap();
        assert!(empty_path.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = AppConfig::from_toml_str("[calendar]\nmax_span_days = \"seven\"\n");
        assert!(matches!(
            result,
            Err(MyPageError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[calendar]\nmax_span_days = 10\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.calendar.max_span_days, 10);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig::from_file_or_default(temp_dir.path().join("mypage.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
