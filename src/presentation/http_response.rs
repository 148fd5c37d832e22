// HTTP response utilities for panel reports
use crate::application::report::ReportTable;
use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
};

/// Serialize a report table as a downloadable CSV attachment
pub fn csv_report_response(report: &ReportTable) -> Result<Response<Body>, StatusCode> {
    let body = report.to_csv();
    let disposition = format!("attachment; filename=\"{}.csv\"", file_stem(&report.title));

    let disposition = HeaderValue::from_str(&disposition).map_err(|e| {
        tracing::error!("Invalid content-disposition for report {}: {}", report.title, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(body))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// "Total Renewable vs Non-Renewable Energy (TWh)" -> "Total_Renewable_vs_Non-Renewable_Energy_TWh_Report"
fn file_stem(title: &str) -> String {
    let words: Vec<String> = title
        .split_whitespace()
        .map(|w| w.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '-').collect::<String>())
        .filter(|w| !w.is_empty())
        .collect();
    format!("{}_Report", words.join("_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::Table;

    #[test]
    fn test_file_stem() {
        assert_eq!(
            file_stem("Total Renewable vs Non-Renewable Energy (TWh)"),
            "Total_Renewable_vs_Non-Renewable_Energy_TWh_Report"
        );
        assert_eq!(file_stem("CO2 Emissions Map"), "CO2_Emissions_Map_Report");
    }

    #[test]
    fn test_csv_headers() {
        let report = ReportTable {
            title: "Plotted Disaster Locations".to_string(),
            table: Table::new(vec!["Type".to_string()], vec![vec!["Flood".to_string()]]),
        };
        let response = csv_report_response(&report).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Plotted_Disaster_Locations_Report.csv\""
        );
    }
}
