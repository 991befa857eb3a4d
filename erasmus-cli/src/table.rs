/// Table formatting for records and budget summaries using comfy-table

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use erasmus_core::BudgetSummary;
use erasmus_store::{StoreStats, StoredUrl};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Render a Unix millisecond timestamp as UTC
pub fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn money(value: f64) -> Cell {
    Cell::new(format!("{:.2}", value)).set_alignment(CellAlignment::Right)
}

/// One row per stored link, newest first
pub fn format_records_table(records: &[StoredUrl]) -> String {
    if records.is_empty() {
        return "No links stored".to_string();
    }

    let mut sorted: Vec<&StoredUrl> = records.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut table = new_table();
    table.set_header(vec!["id", "created", "accesses", "state bytes"]);
    for record in sorted {
        table.add_row(vec![
            Cell::new(&record.id),
            Cell::new(format_timestamp(record.created_at)),
            Cell::new(record.access_count).set_alignment(CellAlignment::Right),
            Cell::new(record.original_state.len()).set_alignment(CellAlignment::Right),
        ]);
    }

    table.to_string()
}

pub fn format_stats_table(stats: &StoreStats) -> String {
    let mut table = new_table();
    table.set_header(vec!["stat", "value"]);
    table.add_row(vec![Cell::new("links"), Cell::new(stats.record_count)]);
    table.add_row(vec![Cell::new("total accesses"), Cell::new(stats.total_accesses)]);
    let oldest = stats.oldest_created_at.map(format_timestamp).unwrap_or_else(|| "-".into());
    let newest = stats.newest_created_at.map(format_timestamp).unwrap_or_else(|| "-".into());
    table.add_row(vec![Cell::new("oldest"), Cell::new(oldest)]);
    table.add_row(vec![Cell::new("newest"), Cell::new(newest)]);
    table.to_string()
}

pub fn format_summary_table(summary: &BudgetSummary, stay_months: f64) -> String {
    let mut table = new_table();
    table.set_header(vec!["item", "monthly", "whole stay"]);

    for (category, monthly) in &summary.monthly {
        table.add_row(vec![Cell::new(category), money(*monthly), money(monthly * stay_months)]);
    }
    table.add_row(vec![
        Cell::new("monthly total"),
        money(summary.total_monthly),
        money(summary.total_for_stay),
    ]);
    table.add_row(vec![Cell::new("deposit"), Cell::new(""), money(summary.deposit)]);
    table.add_row(vec![Cell::new("flights"), Cell::new(""), money(summary.flight_costs)]);
    table.add_row(vec![Cell::new("total cost"), Cell::new(""), money(summary.total_cost)]);
    table.add_row(vec![
        Cell::new("scholarship"),
        Cell::new(""),
        money(-summary.scholarship_total),
    ]);
    table.add_row(vec![Cell::new("net cost"), Cell::new(""), money(summary.net_cost)]);
    table.add_row(vec![
        Cell::new("net after deposit refund"),
        Cell::new(""),
        money(summary.net_cost_after_deposit),
    ]);

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use erasmus_core::SharedState;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
    }

    #[test]
    fn test_empty_records() {
        assert_eq!(format_records_table(&[]), "No links stored");
    }

    #[test]
    fn test_records_table_lists_ids() {
        let records = vec![
            StoredUrl {
                id: "abc123".to_string(),
                original_state: "state".to_string(),
                created_at: 1_000,
                access_count: 4,
            },
            StoredUrl {
                id: "xyz789".to_string(),
                original_state: "state-2".to_string(),
                created_at: 2_000,
                access_count: 0,
            },
        ];
        let rendered = format_records_table(&records);
        let newest = rendered.find("xyz789").unwrap();
        let oldest = rendered.find("abc123").unwrap();
        assert!(newest < oldest);
    }

    #[test]
    fn test_summary_table_has_every_category() {
        let summary = BudgetSummary::calculate(&SharedState::default());
        let rendered = format_summary_table(&summary, 0.0);
        for name in ["accommodation", "leisure", "other", "net cost"] {
            assert!(rendered.contains(name), "missing {}", name);
        }
    }
}
