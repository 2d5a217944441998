use axum::{
    http::header,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

use super::{ApiError, with_cache_control};

const ENTRY_FILE: &str = "index.html";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: &'static str,
    pub dist_dir: String,
    pub dist_exists: bool,
    pub index_exists: bool,
    pub timestamp: String,
}

pub(super) async fn bundle_status(dist_dir: &Path) -> StatusResponse {
    let dist_exists = tokio::fs::metadata(dist_dir)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);
    let index_exists = is_file(&dist_dir.join(ENTRY_FILE)).await;

    StatusResponse {
        status: "ok",
        dist_dir: dist_dir.display().to_string(),
        dist_exists,
        index_exists,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

/// Serves a file from the bundle, or the entry page for client-side routes.
pub(super) async fn serve_asset(dist_dir: &Path, request_path: &str) -> Result<Response, ApiError> {
    if let Some(path) = resolve_asset_path(dist_dir, request_path) {
        if is_file(&path).await {
            let body = tokio::fs::read(&path).await?;
            return Ok(([(header::CONTENT_TYPE, content_type_for(&path))], body).into_response());
        }
    }

    let index_path = dist_dir.join(ENTRY_FILE);
    match tokio::fs::read_to_string(&index_path).await {
        Ok(index) => Ok(with_cache_control(Html(index))),
        Err(e) => {
            log::error!("failed to read {}: {e}", index_path.display());
            Err(ApiError::BundleMissing(dist_dir.display().to_string()))
        }
    }
}

/// Maps a URL path onto the bundle directory. Rejects anything that could
/// climb out of it.
fn resolve_asset_path(dist_dir: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = Path::new(request_path.trim_start_matches('/'));
    if relative.as_os_str().is_empty() {
        return None;
    }
    if !relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        return None;
    }
    Some(dist_dir.join(relative))
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json" | "map") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        Some("woff") => "font/woff",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn missing_dist() -> PathBuf {
        std::env::temp_dir().join("habitmath-no-such-bundle-dir")
    }

    #[test]
    fn resolve_asset_path_rejects_traversal() {
        let dist = Path::new("dist");
        assert_eq!(
            resolve_asset_path(dist, "/assets/app.js"),
            Some(PathBuf::from("dist/assets/app.js"))
        );
        assert_eq!(resolve_asset_path(dist, "/"), None);
        assert_eq!(resolve_asset_path(dist, "/../secret"), None);
        assert_eq!(resolve_asset_path(dist, "/assets/../../secret"), None);
        assert_eq!(resolve_asset_path(dist, "/./index.html"), None);
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for(Path::new("a/index.html")), "text/html; charset=utf-8");
        assert_eq!(
            content_type_for(Path::new("app.js")),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(content_type_for(Path::new("logo.svg")), "image/svg+xml");
        assert_eq!(content_type_for(Path::new("blob")), "application/octet-stream");
    }

    #[tokio::test]
    async fn status_reports_missing_bundle() {
        let status = bundle_status(&missing_dist()).await;
        assert!(!status.dist_exists);
        assert!(!status.index_exists);
        assert!(chrono::DateTime::parse_from_rfc3339(&status.timestamp).is_ok());
    }

    #[tokio::test]
    async fn missing_bundle_is_a_server_error() {
        let err = serve_asset(&missing_dist(), "/how-much-coffee-costs")
            .await
            .expect_err("bundle is missing");
        assert!(matches!(err, ApiError::BundleMissing(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
