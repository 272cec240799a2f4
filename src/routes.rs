use comfy_table::{presets::UTF8_FULL, Table};

use crate::config::ServerConfig;
use crate::page::ElementId;
use crate::report::catalog::scan_status_path;
use crate::report::{download_path, generate_report_path, report_path};
use crate::scan::SCAN_PATH;

/// The HTTP interface the client consumes: (method, path, request body, response)
pub fn consumed_routes(config: &ServerConfig) -> Vec<(&'static str, String, &'static str, &'static str)> {
    vec![
        ("POST", SCAN_PATH.to_string(), "{\"endpoint\": string}", "JSON object"),
        ("GET", generate_report_path("{scanId}"), "-", "file download"),
        ("GET", report_path("{scanId}"), "-", "JSON object"),
        ("GET", download_path("{scanId}"), "-", "file download"),
        ("GET", config.scans_path.clone(), "-", "{\"scans\": [...]}"),
        (
            "GET",
            scan_status_path(&config.scan_status_path, "{scanId}"),
            "-",
            "{\"scan_id\", \"status\", \"target\", \"results\"}",
        ),
    ]
}

/// List the server routes and page elements argus relies on
pub fn list_routes(config: &ServerConfig) {
    println!();
    println!("🛰  Argus server interface ({})", config.base_url);
    println!();

    let mut routes = Table::new();
    routes
        .load_preset(UTF8_FULL)
        .set_header(vec!["Method", "Path", "Request body", "Response"]);
    for (method, path, body, response) in consumed_routes(config) {
        routes.add_row(vec![method.to_string(), path, body.to_string(), response.to_string()]);
    }
    println!("{}", routes);
    println!();

    let mut elements = Table::new();
    elements.load_preset(UTF8_FULL).set_header(vec!["Element", "Role"]);
    for id in ElementId::ALL {
        elements.add_row(vec![id.to_string(), id.role().to_string()]);
    }
    println!("{}", elements);
    println!();
    println!("  Run `argus scan <endpoint>` to start a scan");
    println!("  Run `argus status <scan-id>` to follow a scan");
    println!("  Run `argus report <scan-id>` to fetch its report");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_consumed_route() {
        let routes = consumed_routes(&ServerConfig::default());
        let paths: Vec<&str> = routes.iter().map(|r| r.1.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "/scan",
                "/generate-report/{scanId}",
                "/report?scan={scanId}",
                "/download?scan={scanId}",
                "/api/scans",
                "/api/scan/{scanId}",
            ]
        );
    }
}
