//! The analysis pipeline: fetch, discover, extract, compile, clean up.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ExtractionSettings;
use crate::context::ServiceContext;
use crate::discovery;
use crate::dot::{self, DotStyle};
use crate::error::AnalyzeError;
use crate::extract::SchemaExtractor;
use crate::ports::GitTransport;

/// Successful outcome of one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Always `true`; failures are reported through [`AnalyzeError`].
    pub success: bool,
    /// The repository URL as given.
    pub repo_url: String,
    /// Technology labels found by discovery.
    pub detected_tech: Vec<String>,
    /// Files that were sent for extraction.
    pub files_analyzed: Vec<String>,
    /// The extracted schema object as the model returned it.
    pub schema: serde_json::Value,
    /// DOT text for the schema.
    pub dot_string: String,
    /// Number of entities in the schema.
    pub tables_count: usize,
}

/// Removes a checkout when dropped.
///
/// Removal failures are logged and never surface to the caller.
struct Checkout<'a> {
    git: &'a dyn GitTransport,
    path: PathBuf,
}

impl Checkout<'_> {
    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Checkout<'_> {
    fn drop(&mut self) {
        match self.git.remove(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "checkout removed"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove checkout"),
        }
    }
}

/// Runs the analysis pipeline against the ports of a [`ServiceContext`].
pub struct Analyzer<'a> {
    ctx: &'a ServiceContext,
    checkout_dir: PathBuf,
    settings: ExtractionSettings,
    style: DotStyle,
}

impl<'a> Analyzer<'a> {
    /// Creates an analyzer that checks repositories out under `checkout_dir`.
    pub fn new(
        ctx: &'a ServiceContext,
        checkout_dir: impl Into<PathBuf>,
        settings: ExtractionSettings,
    ) -> Self {
        Self { ctx, checkout_dir: checkout_dir.into(), settings, style: DotStyle::default() }
    }

    /// Selects the DOT style of the result.
    #[must_use]
    pub fn with_style(mut self, style: DotStyle) -> Self {
        self.style = style;
        self
    }

    /// Analyzes one repository.
    ///
    /// The checkout is removed before this returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::Validation`] for a bad URL,
    /// [`AnalyzeError::Transport`] when the clone fails,
    /// [`AnalyzeError::NotFound`] when no schema file is found, and
    /// [`AnalyzeError::Upstream`] when extraction fails.
    pub async fn analyze(&self, repo_url: &str) -> Result<AnalysisResult, AnalyzeError> {
        validate_url(repo_url)?;

        let path = self.checkout_path(repo_url);
        info!(url = repo_url, path = %path.display(), "cloning repository");
        self.ctx
            .git
            .clone_shallow(repo_url, &path)
            .map_err(|e| AnalyzeError::Transport(format!("Failed to clone repository: {e}")))?;
        let checkout = Checkout { git: self.ctx.git.as_ref(), path };

        let files = discovery::discover(checkout.path());
        info!(
            files = files.total_files,
            tech = %files.detected_tech.join(", "),
            "schema files discovered"
        );
        if files.is_empty() {
            return Err(AnalyzeError::NotFound);
        }

        let extraction =
            SchemaExtractor::new(self.ctx.llm.as_ref(), &self.settings).extract(&files).await?;
        let dot_string = dot::compile(&extraction.schema, self.style);

        Ok(AnalysisResult {
            success: true,
            repo_url: repo_url.to_string(),
            detected_tech: files.detected_tech,
            files_analyzed: files.files_analyzed,
            tables_count: extraction.schema.tables_count(),
            schema: extraction.raw,
            dot_string,
        })
    }

    fn checkout_path(&self, repo_url: &str) -> PathBuf {
        let millis = self.ctx.clock.now().timestamp_millis();
        self.checkout_dir.join(format!("{}-{millis}", repo_name(repo_url)))
    }
}

/// Rejects empty and non-GitHub URLs.
///
/// # Errors
///
/// Returns [`AnalyzeError::Validation`] with the user-facing message.
pub fn validate_url(repo_url: &str) -> Result<(), AnalyzeError> {
    if repo_url.trim().is_empty() {
        return Err(AnalyzeError::Validation("Repository URL is required".into()));
    }
    if !repo_url.contains("github.com") {
        return Err(AnalyzeError::Validation(
            "Please provide a valid GitHub repository URL".into(),
        ));
    }
    Ok(())
}

/// Last path segment of a repository URL, without the first `.git`.
#[must_use]
pub fn repo_name(repo_url: &str) -> String {
    let last = repo_url.rsplit('/').next().unwrap_or(repo_url);
    last.replacen(".git", "", 1)
}
