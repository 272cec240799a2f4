//! Saving report files the server hands out for download.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;

use crate::error::RequestError;
use crate::transport::FileReply;

/// A report file written to disk
#[derive(Debug, Clone)]
pub struct DownloadedReport {
    pub path: PathBuf,
    pub bytes: u64,
    pub sha256: String,
}

/// Pull the file name out of a `Content-Disposition` header.
///
/// Only the final path component is kept so a hostile header cannot write
/// outside the download directory.
pub fn file_name_from_disposition(header: &str) -> Option<String> {
    let raw = header.split(';').map(str::trim).find_map(|part| {
        let (key, value) = part.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("filename") {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })?;

    let name = raw.rsplit(['/', '\\']).next().unwrap_or("").trim();
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}

fn extension_for(content_type: Option<&str>) -> &'static str {
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|m| m.trim().to_ascii_lowercase())
        .unwrap_or_default();
    match mime.as_str() {
        "application/pdf" => "pdf",
        "application/json" => "json",
        "text/html" => "html",
        "text/markdown" => "md",
        "text/plain" => "txt",
        _ => "bin",
    }
}

/// Name used when the server does not suggest one, e.g.
/// `report-17-20240405T120000.pdf` for `/generate-report/17`.
pub fn fallback_name(href: &str, content_type: Option<&str>) -> String {
    let tail = href
        .rsplit(['/', '=', '?'])
        .find(|s| !s.is_empty())
        .unwrap_or("scan");
    let id: String = tail
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    format!(
        "report-{}-{}.{}",
        if id.is_empty() { "scan" } else { id.as_str() },
        chrono::Utc::now().format("%Y%m%dT%H%M%S"),
        extension_for(content_type)
    )
}

/// Write a downloaded report into `dir`, hashing it on the way.
pub async fn save(dir: &Path, href: &str, reply: &FileReply) -> Result<DownloadedReport, RequestError> {
    tokio::fs::create_dir_all(dir).await?;

    let name = reply
        .disposition
        .as_deref()
        .and_then(file_name_from_disposition)
        .unwrap_or_else(|| fallback_name(href, reply.content_type.as_deref()));
    let path = dir.join(name);

    let mut file = tokio::fs::File::create(&path).await?;
    file.write_all(&reply.bytes).await?;
    file.flush().await?;

    let mut hasher = Sha256::new();
    hasher.update(&reply.bytes);
    let sha256 = format!("{:x}", hasher.finalize());

    tracing::info!(
        "Saved {} ({} bytes, SHA256: {})",
        path.display(),
        reply.bytes.len(),
        sha256
    );

    Ok(DownloadedReport {
        path,
        bytes: reply.bytes.len() as u64,
        sha256,
    })
}
