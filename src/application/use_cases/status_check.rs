use crate::application::services::{SourceControlProvider, WorkspaceSession};
use crate::common::result::TfvcResult;
use crate::domain::entities::resource::{ResourceGroup, ResourceGroupKind};
use crate::domain::entities::workspace::TfvcWorkspace;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, warn};

/// ステータス確認の設定
#[derive(Debug, Clone, Default)]
pub struct StatusCheckConfig {
    /// Excludedグループへ移すパス
    pub excludes: Vec<PathBuf>,

    /// ツールのバージョンを確認するか
    pub check_version: bool,

    /// ワークスペース情報も取得するか
    pub with_workspace: bool,
}

impl StatusCheckConfig {
    pub fn new() -> Self {
        Self {
            check_version: true,
            ..Self::default()
        }
    }

    pub fn with_excludes(mut self, excludes: Vec<PathBuf>) -> Self {
        self.excludes = excludes;
        self
    }

    pub fn with_workspace(mut self, with_workspace: bool) -> Self {
        self.with_workspace = with_workspace;
        self
    }
}

/// 一つのリソースの表示用情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceStatus {
    /// ローカルパス
    pub path: String,

    /// 変更種別の文字列（例: `edit, rename`）
    pub change_type: String,

    /// 状態を表す一文字
    pub letter: char,

    /// 削除済みとして表示するか
    pub strike_through: bool,
}

/// グループごとのステータス
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupStatus {
    pub id: &'static str,
    pub label: &'static str,
    pub resources: Vec<ResourceStatus>,
}

impl From<&ResourceGroup> for GroupStatus {
    fn from(group: &ResourceGroup) -> Self {
        let resources = group
            .resources
            .iter()
            .map(|resource| ResourceStatus {
                path: resource.local_path().display().to_string(),
                change_type: resource.change.change_type.clone(),
                letter: resource.status().letter(),
                strike_through: resource.decorations().strike_through,
            })
            .collect();
        Self {
            id: group.kind.id(),
            label: group.kind.label(),
            resources,
        }
    }
}

/// ステータス確認の結果
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// リポジトリルート
    pub root: PathBuf,

    /// 検出したツールのバージョン
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_version: Option<String>,

    /// ワークスペース情報
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<TfvcWorkspace>,

    /// 表示するグループ（空のMerge/Excludedは含まない）
    pub groups: Vec<GroupStatus>,

    /// バッジに表示する件数
    pub count: usize,
}

impl StatusReport {
    /// 指定種別のグループ
    pub fn group(&self, kind: ResourceGroupKind) -> Option<&GroupStatus> {
        self.groups.iter().find(|group| group.id == kind.id())
    }

    /// 保留中の変更があるか
    pub fn has_changes(&self) -> bool {
        self.groups.iter().any(|group| !group.resources.is_empty())
    }
}

/// ステータス確認のユースケース
pub struct StatusCheckUseCase {
    /// 設定
    config: StatusCheckConfig,
}

impl StatusCheckUseCase {
    /// 新しいStatusCheckUseCaseインスタンスを作成
    pub fn new(config: StatusCheckConfig) -> Self {
        Self { config }
    }

    /// ステータス確認を実行
    pub async fn execute(&self, session: &WorkspaceSession) -> TfvcResult<StatusReport> {
        // 1. ツールのバージョン確認
        let tool_version = if self.config.check_version {
            session
                .repository()
                .check_version()
                .await?
                .map(|version| version.to_string())
        } else {
            None
        };

        // 2. ワークスペース情報の取得（失敗しても続行）
        let workspace = if self.config.with_workspace {
            match session.repository().find_workspace(session.root()).await {
                Ok(workspace) => Some(workspace),
                Err(e) => {
                    warn!("Failed to determine the workspace: {}", e);
                    None
                }
            }
        } else {
            None
        };

        // 3. 除外パスの登録（更新は次の一回にまとめる）
        let model = session.model();
        let excludes = self
            .config
            .excludes
            .iter()
            .map(|path| self.absolute(path, session))
            .collect::<Vec<_>>();
        debug!(?excludes, "Restoring exclusions");
        model.restore_exclusions(&excludes);

        // 4. 保留中の変更を取得して分類
        model.refresh().await?;

        let provider = session.provider();
        let groups = provider
            .resource_groups()
            .iter()
            .map(GroupStatus::from)
            .collect();

        Ok(StatusReport {
            root: session.root().to_path_buf(),
            tool_version,
            workspace,
            groups,
            count: provider.count(),
        })
    }

    /// 相対パスはリポジトリルート基準で解決
    fn absolute(&self, path: &std::path::Path, session: &WorkspaceSession) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            session.root().join(path)
        }
    }
}
