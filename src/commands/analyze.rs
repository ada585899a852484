//! `schemaviz analyze` command.

use std::env;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::analyze::{AnalysisResult, Analyzer};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::dot::DotStyle;
use crate::error::{AnalyzeError, ErrorResponse};

use super::RECORD_VAR;

/// Output switches for `analyze`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Use the enhanced diagram style.
    pub styled: bool,
    /// Print only the DOT text.
    pub dot_only: bool,
}

/// Execute the `analyze` command.
///
/// With `replay`, every port call is answered from that cassette and no API
/// key is needed. Otherwise the live adapters are used, and `SCHEMAVIZ_RECORD`
/// names a cassette to record into.
///
/// # Errors
///
/// Returns the JSON error body when configuration or the analysis fails.
pub async fn run(repo_url: &str, options: Options, replay: Option<&Path>) -> Result<(), String> {
    let (config, mut ctx) = match replay {
        Some(cassette) => {
            let config = Config::for_replay().map_err(|e| e.to_string())?;
            let ctx = ServiceContext::replaying(cassette).map_err(|e| e.to_string())?;
            (config, ctx)
        }
        None => {
            let config = Config::from_env().map_err(|e| e.to_string())?;
            let ctx = match env::var(RECORD_VAR).ok().filter(|p| !p.is_empty()) {
                Some(path) => ServiceContext::recording(&config, &PathBuf::from(path)),
                None => ServiceContext::live(&config),
            }
            .map_err(|e| format!("failed to initialize adapters: {e}"))?;
            (config, ctx)
        }
    };
    ctx.tag_recording(repo_url);

    let result = Analyzer::new(&ctx, config.checkout_dir.clone(), config.extraction.clone())
        .with_style(DotStyle::from_flag(options.styled))
        .analyze(repo_url)
        .await;

    if let Err(e) = ctx.finish_recording() {
        warn!(error = %e, "failed to write cassette");
    }

    match result {
        Ok(analysis) => {
            println!("{}", render_output(&analysis, options)?);
            Ok(())
        }
        Err(err) => Err(error_body(&err)),
    }
}

fn render_output(analysis: &AnalysisResult, options: Options) -> Result<String, String> {
    if options.dot_only {
        return Ok(analysis.dot_string.clone());
    }
    serde_json::to_string_pretty(analysis).map_err(|e| format!("failed to encode result: {e}"))
}

/// Formats an analysis failure as its JSON error body.
fn error_body(err: &AnalyzeError) -> String {
    warn!(status = err.status_code(), error = %err, "analysis failed");
    let body = ErrorResponse::from(err);
    serde_json::to_string_pretty(&body).unwrap_or_else(|_| err.to_string())
}
