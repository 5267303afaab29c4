use super::pending_change_model::PendingChangeModel;
use super::scm_provider::TfvcScmProvider;
use crate::common::result::TfvcResult;
use crate::domain::entities::settings::TfvcSettings;
use crate::infrastructure::filesystem::settings_store::{server_context, SettingsStore};
use crate::infrastructure::process::TfCommandRunner;
use crate::infrastructure::tfvc::{PendingChangeSource, Repository, ToolLocator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

/// セッションを開くための指定
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// リポジトリルート（`.tfvc.yml` を探す場所でもある）
    pub root: PathBuf,

    /// 設定ファイルより優先するツールのパス
    pub tool_path: Option<PathBuf>,

    /// 設定ファイルより優先するプロキシ
    pub proxy: Option<String>,

    /// 次のプロセスを事前に起動するか
    pub prewarm: bool,
}

impl SessionOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tool_path: None,
            proxy: None,
            prewarm: true,
        }
    }

    pub fn with_tool_path(mut self, tool_path: Option<PathBuf>) -> Self {
        self.tool_path = tool_path;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_prewarm(mut self, prewarm: bool) -> Self {
        self.prewarm = prewarm;
        self
    }
}

/// 一つのリポジトリルートに対する設定・ツール・リポジトリ・モデルの組
///
/// 設定の読み込み、ツールの解決、ランナーとモデルの生成をまとめて行う。
pub struct WorkspaceSession {
    settings: TfvcSettings,
    runner: Arc<TfCommandRunner>,
    repository: Arc<Repository>,
    model: Arc<PendingChangeModel>,
}

impl WorkspaceSession {
    /// 設定を読み込みツールを解決してセッションを開く
    pub async fn open(options: SessionOptions) -> TfvcResult<Self> {
        let mut settings = SettingsStore::new().load(&options.root).await?;
        if let Some(proxy) = options.proxy.filter(|p| !p.trim().is_empty()) {
            settings.proxy = Some(proxy);
        }
        settings.validate()?;
        debug!(?settings, "Effective settings");

        let tool = ToolLocator::new(settings.clone())
            .with_explicit_path(options.tool_path)
            .resolve()?;
        let context = server_context(&settings, |key| std::env::var(key).ok())?;

        let runner = Arc::new(
            TfCommandRunner::new()
                .with_timeout(settings.command_timeout_secs)
                .with_prewarm(options.prewarm),
        );
        let repository = Arc::new(
            Repository::new(tool, runner.clone(), &options.root)
                .with_server_context(context)
                .with_restrict_workspace(settings.restrict_workspace),
        );

        let source: Arc<dyn PendingChangeSource> = repository.clone();
        let model = Arc::new(PendingChangeModel::new(source, settings.refresh_policy));

        info!("Opened TFVC session for {}", options.root.display());
        Ok(Self {
            settings,
            runner,
            repository,
            model,
        })
    }

    pub fn root(&self) -> &Path {
        self.repository.root()
    }

    pub fn settings(&self) -> &TfvcSettings {
        &self.settings
    }

    pub fn repository(&self) -> &Arc<Repository> {
        &self.repository
    }

    pub fn model(&self) -> &Arc<PendingChangeModel> {
        &self.model
    }

    /// 設定の件数モードを使うプロバイダー
    pub fn provider(&self) -> TfvcScmProvider {
        TfvcScmProvider::new(self.model.clone(), self.settings.count_mode)
    }

    /// 実行中のコマンドを取り消し、待機中のプロセスを終了する
    pub async fn dispose(&self) {
        self.runner.dispose().await;
    }
}
