//! HTML pages and static assets, embedded into the binary.
//!
//! Templates use `{{ name }}` placeholders. Every value is HTML-escaped before
//! substitution except the pre-rendered fragments built in this module.

use std::path::Path as FsPath;

use axum::body::Body;
use axum::extract::Path;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_embed::RustEmbed;

use crate::pipeline::PipelineOutcome;
use crate::status::StatusSnapshot;

#[derive(RustEmbed)]
#[folder = "templates"]
struct Templates;

#[derive(RustEmbed)]
#[folder = "static"]
struct StaticAssets;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{ ([a-z_]+) \}\}").unwrap());

fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

fn render(name: &str, vars: &[(&str, String)]) -> String {
    let Some(file) = Templates::get(name) else {
        tracing::error!(template = name, "Template missing from build");
        return format!("<!doctype html><p>Template {} is missing.</p>", escape(name));
    };

    let template = String::from_utf8_lossy(&file.data);
    // One pass over the template, so substituted values are never rescanned.
    PLACEHOLDER
        .replace_all(&template, |caps: &regex::Captures<'_>| {
            vars.iter()
                .find(|(key, _)| *key == &caps[1])
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

pub fn index_page(snapshot: &StatusSnapshot, archive_dir: &FsPath, ocr_available: bool) -> String {
    let log_entries = if snapshot.recent_requests.is_empty() {
        "<li class=\"log-empty\">No requests yet.</li>".to_string()
    } else {
        snapshot
            .recent_requests
            .iter()
            .map(|entry| format!("<li><pre>{}</pre></li>", escape(&entry.lines().join("\n"))))
            .collect::<Vec<_>>()
            .join("\n")
    };

    render(
        "index.html",
        &[
            ("status", escape(snapshot.status.as_str())),
            ("indicator", snapshot.status.as_str().to_string()),
            ("uptime", format!("{:.2}", snapshot.uptime_secs)),
            ("processed_requests", snapshot.processed_count.to_string()),
            ("current_date", Local::now().format("%Y-%m-%d").to_string()),
            ("server_info", escape(&archive_dir.display().to_string())),
            (
                "ocr_status",
                if ocr_available { "available" } else { "unavailable" }.to_string(),
            ),
            ("log_entries", log_entries),
        ],
    )
}

pub fn demo_form_page(error: Option<&str>) -> String {
    let error = error
        .map(|msg| format!("<p class=\"form-error\">{}</p>", escape(msg)))
        .unwrap_or_default();
    render("demo.html", &[("form_error", error)])
}

pub fn demo_result_page(outcome: &PipelineOutcome) -> String {
    render(
        "result.html",
        &[
            ("extracted_text", escape(&outcome.extracted_text)),
            ("original_filename", escape(&outcome.record.original_filename)),
            ("content_hash", escape(&outcome.record.content_hash)),
            ("request_id", outcome.request_id.to_string()),
        ],
    )
}

pub fn error_page(message: &str) -> String {
    render("error.html", &[("message", escape(message))])
}

pub async fn serve_static(Path(path): Path<String>) -> Response {
    let target = path.trim_start_matches('/');
    if target.is_empty() || target.contains("..") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let Some(file) = StaticAssets::get(target) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let mime = mime_guess::from_path(target).first_or_octet_stream();

    let mut response = Response::new(Body::from(file.data.into_owned()));
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    response
}
