use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use owo_colors::OwoColorize;

use crate::error::RequestError;
use crate::page::ReportView;
use crate::report::catalog::{ScanDetail, ScanStatus, ScanSummary};

fn status_colored(status: &ScanStatus) -> String {
    match status {
        ScanStatus::Completed => status.as_str().green().to_string(),
        ScanStatus::Error => status.as_str().red().bold().to_string(),
        ScanStatus::Unknown => status.as_str().dimmed().to_string(),
        _ => status.as_str().yellow().to_string(),
    }
}

/// Build the scan listing table
pub fn catalog_table(scans: &[ScanSummary]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Scan", "Status", "Target", "Started"]);

    for scan in scans {
        table.add_row(vec![
            scan.scan_id.clone(),
            status_colored(&scan.status),
            scan.target.clone(),
            scan.start_time.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table
}

/// Render the scan listing to the terminal
pub fn render_catalog(scans: &[ScanSummary]) {
    println!();
    if scans.is_empty() {
        println!("  {}", "No scans on the server yet.".dimmed());
        println!();
        return;
    }

    println!("{}", catalog_table(scans));

    let finished = scans.iter().filter(|s| s.status.is_finished()).count();
    println!(
        " {} scans, {} finished",
        scans.len().to_string().bold(),
        finished.to_string().green()
    );
    println!();
}

/// Status line of one scan, followed by its results once completed
pub fn format_status(detail: &ScanDetail) -> Result<String, RequestError> {
    let mut text = format!(
        "  Scan {} [{}] {}",
        detail.scan_id.bold(),
        status_colored(&detail.status),
        detail.target
    );
    match &detail.results {
        Some(results) => {
            text.push_str("\n\n");
            text.push_str(&crate::report::json::render(results)?);
        }
        None if !detail.status.is_finished() => {
            text.push_str(&format!("\n  {}", "Still running, no results yet.".dimmed()));
        }
        None => {}
    }
    Ok(text)
}

/// A rendered report followed by its download link
pub fn format_report(view: &ReportView, download_url: &str) -> String {
    let marker = if view.download.download { "⬇" } else { "→" };
    format!(
        "{}\n\n  {} {}: {}",
        view.preformatted,
        marker.green(),
        view.download.label.bold(),
        download_url.cyan().underline()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Link;

    #[test]
    fn report_text_ends_with_download_link() {
        let view = ReportView {
            preformatted: "{\n  \"ok\": true\n}".into(),
            download: Link {
                href: "/download?scan=1".into(),
                label: "Download Report".into(),
                download: true,
            },
        };
        let text = format_report(&view, "http://127.0.0.1:5000/download?scan=1");
        assert!(text.starts_with("{\n  \"ok\": true\n}\n\n"));
        assert!(text.contains("Download Report"));
        assert!(text.contains("http://127.0.0.1:5000/download?scan=1"));
    }

    #[test]
    fn status_shows_results_of_completed_scans() {
        let detail = ScanDetail {
            scan_id: "1".into(),
            status: ScanStatus::Completed,
            target: "http://x/api".into(),
            results: Some(serde_json::json!({"findings": []})),
        };
        let text = format_status(&detail).unwrap();
        assert!(text.contains("http://x/api"));
        assert!(text.ends_with("{\n  \"findings\": []\n}"));
    }

    #[test]
    fn status_of_running_scan_says_so() {
        let detail = ScanDetail {
            scan_id: "2".into(),
            status: ScanStatus::Scanning,
            target: "http://y".into(),
            results: None,
        };
        let text = format_status(&detail).unwrap();
        assert!(text.contains("no results yet"));
    }

    #[test]
    fn table_has_a_row_per_scan() {
        let scans = vec![
            ScanSummary {
                scan_id: "1".into(),
                status: ScanStatus::Completed,
                target: "http://x/api".into(),
                start_time: None,
            },
            ScanSummary {
                scan_id: "2".into(),
                status: ScanStatus::Scanning,
                target: "http://y/api".into(),
                start_time: Some("2024-04-05T12:00:00".into()),
            },
        ];
        let table = catalog_table(&scans);
        assert_eq!(table.row_iter().count(), 2);
        let text = table.to_string();
        assert!(text.contains("http://x/api"));
        assert!(text.contains("2024-04-05T12:00:00"));
    }
}
