// Tabular reports built from a panel's ready data
use crate::application::geo_join::feature_key;
use crate::domain::panel::PanelData;
use crate::domain::series::Table;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub title: String,
    pub table: Table,
}

impl ReportTable {
    pub fn from_panel(title: &str, data: &PanelData) -> Self {
        let table = match data {
            PanelData::Series(series) => {
                let mut columns = vec![series.key_label.clone()];
                columns.extend(series.value_labels.iter().cloned());
                let rows = series
                    .points
                    .iter()
                    .map(|point| {
                        let mut row = vec![point.key.clone()];
                        row.extend(point.values.iter().map(|v| format_number(*v)));
                        row
                    })
                    .collect();
                Table::new(columns, rows)
            }
            PanelData::Map(collection) => {
                let rows = collection
                    .features
                    .iter()
                    .map(|feature| {
                        let code = feature_key(feature).unwrap_or_default().to_string();
                        let co2 = feature
                            .properties
                            .get("co2")
                            .and_then(serde_json::Value::as_f64)
                            .unwrap_or(0.0);
                        vec![code, format_number(co2)]
                    })
                    .collect();
                Table::new(vec!["Country".to_string(), "CO2".to_string()], rows)
            }
            PanelData::Markers(markers) => {
                let rows = markers
                    .iter()
                    .map(|m| vec![m.country.clone(), m.year.clone(), format_number(m.co2)])
                    .collect();
                Table::new(
                    vec!["Country".to_string(), "Year".to_string(), "CO2".to_string()],
                    rows,
                )
            }
            PanelData::Table(table) => table.clone(),
        };

        Self {
            title: title.to_string(),
            table,
        }
    }

    /// Render as CSV: header line, then one line per row.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        push_line(&mut out, &self.table.columns);
        for row in &self.table.rows {
            push_line(&mut out, row);
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String]) {
    let line: Vec<String> = cells.iter().map(|c| escape_cell(c)).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

fn escape_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

// Measures always carry two decimals
fn format_number(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::panel::Marker;
    use crate::domain::series::{Series, SeriesPoint};

    #[test]
    fn test_joined_series_report() {
        let data = PanelData::Series(Series::new(
            "mode",
            vec!["Renewable".to_string(), "NonRenewable".to_string()],
            vec![
                SeriesPoint::new("Solar", vec![50.0, 0.0]),
                SeriesPoint::new("Coal", vec![0.0, 200.25]),
            ],
        ));

        let report = ReportTable::from_panel("Energy", &data);
        assert_eq!(
            report.to_csv(),
            "mode,Renewable,NonRenewable\nSolar,50.00,0.00\nCoal,0.00,200.25\n"
        );
    }

    #[test]
    fn test_marker_report_quotes_cells() {
        let data = PanelData::Markers(vec![Marker {
            country: "Korea, Republic of".to_string(),
            year: "2020".to_string(),
            co2: 611_000_000.0,
            lat: 35.9,
            lng: 127.7,
            color: "#BD0026".to_string(),
        }]);

        let report = ReportTable::from_panel("Markers", &data);
        assert_eq!(
            report.to_csv(),
            "Country,Year,CO2\n\"Korea, Republic of\",2020,611000000.00\n"
        );
    }

    #[test]
    fn test_table_passes_through() {
        let table = Table::new(vec!["Type".to_string()], vec![vec!["Say \"hi\"".to_string()]]);
        let report = ReportTable::from_panel("Disasters", &PanelData::Table(table.clone()));
        assert_eq!(report.table, table);
        assert_eq!(report.to_csv(), "Type\n\"Say \"\"hi\"\"\"\n");
    }
}
