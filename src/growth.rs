use crate::error::{Error, Result};
use crate::models::StatementTable;

/// Suffix appended to a metric row name for its derived growth row.
pub const GROWTH_RATE_SUFFIX: &str = "GrowthRate";

/// Appends `{row_name}GrowthRate`: the period-over-period percent change of
/// `row_name`, always computed oldest-to-newest no matter how the table's
/// periods are presented. The oldest period has no predecessor and gets NaN.
///
/// The table's observable column order is untouched; order-in equals
/// order-out.
pub fn add_growth_rate(table: &mut StatementTable, row_name: &str) -> Result<()> {
    let values = table
        .row(row_name)
        .ok_or_else(|| Error::missing(format!("row '{row_name}'")))?
        .to_vec();

    // Chronological positions, independent of presentation order.
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| table.periods()[a].cmp(&table.periods()[b]));

    let mut growth = vec![f64::NAN; values.len()];
    for pair in order.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        growth[cur] = (values[cur] - values[prev]) / values[prev];
    }

    table.add_row(format!("{row_name}{GROWTH_RATE_SUFFIX}"), growth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn descending_table() -> StatementTable {
        // Most-recent-first, the provider's usual presentation.
        let mut table = StatementTable::new(vec![
            "2023-12-31".into(),
            "2022-12-31".into(),
            "2021-12-31".into(),
        ]);
        table
            .add_row("bookValue", vec![150.0, 120.0, 100.0])
            .unwrap();
        table
    }

    #[test]
    fn growth_is_computed_oldest_to_newest() {
        let mut table = descending_table();
        add_growth_rate(&mut table, "bookValue").unwrap();

        let growth = table.row("bookValueGrowthRate").unwrap();
        assert!((growth[0] - 0.25).abs() < 1e-12); // 120 -> 150
        assert!((growth[1] - 0.20).abs() < 1e-12); // 100 -> 120
        assert!(growth[2].is_nan()); // oldest period
    }

    #[test]
    fn column_order_is_preserved() {
        let mut descending = descending_table();
        let before: Vec<String> = descending.periods().to_vec();
        add_growth_rate(&mut descending, "bookValue").unwrap();
        assert_eq!(descending.periods(), &before[..]);

        let mut ascending = StatementTable::new(vec![
            "2021-12-31".into(),
            "2022-12-31".into(),
            "2023-12-31".into(),
        ]);
        ascending
            .add_row("bookValue", vec![100.0, 120.0, 150.0])
            .unwrap();
        let before: Vec<String> = ascending.periods().to_vec();
        add_growth_rate(&mut ascending, "bookValue").unwrap();
        assert_eq!(ascending.periods(), &before[..]);

        let growth = ascending.row("bookValueGrowthRate").unwrap();
        assert!(growth[0].is_nan());
        assert!((growth[1] - 0.20).abs() < 1e-12);
        assert!((growth[2] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn missing_row_is_missing_data() {
        let mut table = StatementTable::new(vec!["2023-12-31".into()]);
        table.add_row("totalAssets", vec![1.0]).unwrap();
        assert_matches!(
            add_growth_rate(&mut table, "bookValue"),
            Err(Error::MissingData { .. })
        );
    }

    #[test]
    fn single_period_growth_is_nan() {
        let mut table = StatementTable::new(vec!["2023-12-31".into()]);
        table.add_row("bookValue", vec![60.0]).unwrap();
        add_growth_rate(&mut table, "bookValue").unwrap();
        assert!(table.row("bookValueGrowthRate").unwrap()[0].is_nan());
    }
}
