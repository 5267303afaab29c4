use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use validator::Validate;

/// ソース管理ビューに表示する件数の数え方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountMode {
    /// 件数を表示しない
    Off,
    /// Includedグループのみ数える
    Included,
    /// 全グループを数える
    #[default]
    All,
}

impl FromStr for CountMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" => Ok(CountMode::Off),
            "included" => Ok(CountMode::Included),
            "all" => Ok(CountMode::All),
            _ => Err(format!("Unknown count mode: '{}'. Use off, included or all", s)),
        }
    }
}

impl fmt::Display for CountMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountMode::Off => write!(f, "off"),
            CountMode::Included => write!(f, "included"),
            CountMode::All => write!(f, "all"),
        }
    }
}

/// 更新中に届いた更新要求の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshPolicy {
    /// 実行中の更新が終わった後に一度だけ再実行する
    #[default]
    Coalesce,
    /// 実行中の更新があれば要求を捨てる
    Drop,
}

/// `.tfvc.yml` 設定ファイルの構造
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TfvcSettings {
    /// TFコマンドラインツールのパス
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PathBuf>,

    /// プロキシURL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub proxy: Option<String>,

    /// ワークスペースをリポジトリルート配下に限定するか
    #[serde(default)]
    pub restrict_workspace: bool,

    /// 件数の表示方法
    #[serde(default)]
    pub count_mode: CountMode,

    /// 重複した更新要求の扱い
    #[serde(default)]
    pub refresh_policy: RefreshPolicy,

    /// コマンドのタイムアウト（秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 3600))]
    pub command_timeout_secs: Option<u64>,

    /// ポーリング間隔（秒）、watch時のみ使用
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub poll_interval_secs: Option<u64>,

    /// チームプロジェクトコレクションURL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub collection_url: Option<String>,

    /// ログインユーザー名（パスワードは環境変数からのみ読む）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl TfvcSettings {
    /// 空の設定を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// ツールのパスを設定
    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// プロキシを設定
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// 更新ポリシーを設定
    pub fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.refresh_policy = policy;
        self
    }

    /// 値が設定されている項目だけ上書きする
    pub fn merge(mut self, other: TfvcSettings) -> Self {
        if other.location.is_some() {
            self.location = other.location;
        }
        if other.proxy.is_some() {
            self.proxy = other.proxy;
        }
        if other.command_timeout_secs.is_some() {
            self.command_timeout_secs = other.command_timeout_secs;
        }
        if other.poll_interval_secs.is_some() {
            self.poll_interval_secs = other.poll_interval_secs;
        }
        if other.collection_url.is_some() {
            self.collection_url = other.collection_url;
        }
        if other.username.is_some() {
            self.username = other.username;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TfvcSettings::new();
        assert_eq!(settings.count_mode, CountMode::All);
        assert_eq!(settings.refresh_policy, RefreshPolicy::Coalesce);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
location: /opt/tee/tf
proxy: http://proxy.local:8080
count_mode: included
refresh_policy: drop
command_timeout_secs: 60
"#;
        let settings: TfvcSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.location, Some(PathBuf::from("/opt/tee/tf")));
        assert_eq!(settings.count_mode, CountMode::Included);
        assert_eq!(settings.refresh_policy, RefreshPolicy::Drop);
        assert_eq!(settings.command_timeout_secs, Some(60));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let settings = TfvcSettings::new().with_proxy("not a url");
        assert!(settings.validate().is_err());

        let settings = TfvcSettings {
            command_timeout_secs: Some(0),
            ..TfvcSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_merge_overrides_only_set_values() {
        let base = TfvcSettings::new()
            .with_location("/opt/a/tf")
            .with_proxy("http://a:1");
        let merged = base.merge(TfvcSettings::new().with_location("/opt/b/tf"));
        assert_eq!(merged.location, Some(PathBuf::from("/opt/b/tf")));
        assert_eq!(merged.proxy.as_deref(), Some("http://a:1"));
    }

    #[test]
    fn test_count_mode_from_str() {
        assert_eq!("OFF".parse::<CountMode>().unwrap(), CountMode::Off);
        assert!("some".parse::<CountMode>().is_err());
    }
}
