//! Table queries for the floor console

use serde::{Deserialize, Serialize};
use shared::models::{Table, TableStatus};
use std::collections::BTreeMap;

/// Area filter value meaning "every area"
pub const ALL_AREAS: &str = "all";

/// Conjunctive table filter
///
/// Empty query = every table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuery {
    /// Exact area name; `"all"` or `None` matches any area
    #[serde(default)]
    pub area: Option<String>,
    /// Case-insensitive substring over the names of items in open orders
    #[serde(default)]
    pub dish: Option<String>,
    #[serde(default)]
    pub status: Option<TableStatus>,
}

impl TableQuery {
    pub fn area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    pub fn dish(mut self, term: impl Into<String>) -> Self {
        self.dish = Some(term.into());
        self
    }

    pub fn status(mut self, status: TableStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, table: &Table) -> bool {
        let area_ok = match self.area.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(a) if a.eq_ignore_ascii_case(ALL_AREAS) => true,
            Some(a) => table.area == a,
        };
        if !area_ok {
            return false;
        }

        if let Some(status) = self.status
            && table.status != status
        {
            return false;
        }

        match self.dish.as_deref().map(|d| d.trim().to_lowercase()) {
            None => true,
            Some(term) if term.is_empty() => true,
            Some(term) => table
                .open_orders()
                .flat_map(|o| o.items.iter())
                .any(|item| item.name.to_lowercase().contains(&term)),
        }
    }

    /// Keep matching tables, preserving input order
    pub fn apply(&self, tables: Vec<Table>) -> Vec<Table> {
        tables.into_iter().filter(|t| self.matches(t)).collect()
    }
}

/// Per-area occupancy counts for the console header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaSummary {
    pub area: String,
    pub total: usize,
    pub occupied: usize,
    pub reserved: usize,
}

/// Group tables by area (sorted by area name)
pub fn summarize_areas(tables: &[Table]) -> Vec<AreaSummary> {
    let mut by_area: BTreeMap<&str, AreaSummary> = BTreeMap::new();
    for table in tables {
        let entry = by_area.entry(table.area.as_str()).or_insert_with(|| AreaSummary {
            area: table.area.clone(),
            ..Default::default()
        });
        entry.total += 1;
        match table.status {
            TableStatus::Occupied => entry.occupied += 1,
            TableStatus::Reserved => entry.reserved += 1,
            TableStatus::Empty => {}
        }
    }
    by_area.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::default_tables;

    #[test]
    fn test_empty_query_matches_all() {
        let tables = default_tables(0);
        let n = tables.len();
        assert_eq!(TableQuery::default().apply(tables).len(), n);
    }

    #[test]
    fn test_area_filter() {
        let result = TableQuery::default().area("Tầng 2").apply(default_tables(0));
        assert_eq!(result.iter().map(|t| t.id).collect::<Vec<_>>(), vec![5, 6, 7]);

        let all = TableQuery::default().area("all").apply(default_tables(0));
        assert_eq!(all.len(), 9);
    }

    #[test]
    fn test_dish_filter_case_insensitive() {
        let result = TableQuery::default().dish("lẩu thái").apply(default_tables(0));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 2);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let none = TableQuery::default()
            .area("Tầng 2")
            .dish("Lẩu")
            .apply(default_tables(0));
        assert!(none.is_empty());

        let one = TableQuery::default()
            .area("Tầng 1")
            .dish("bia")
            .apply(default_tables(0));
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn test_paid_orders_do_not_match_dish() {
        let mut tables = default_tables(0);
        for order in &mut tables[1].orders {
            order.status = shared::order::OrderStatus::Paid;
        }
        assert!(TableQuery::default().dish("Lẩu").apply(tables).is_empty());
    }

    #[test]
    fn test_status_filter_and_summary() {
        let occupied = TableQuery::default()
            .status(TableStatus::Occupied)
            .apply(default_tables(0));
        assert_eq!(occupied.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 6, 9]);

        let summary = summarize_areas(&default_tables(0));
        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].area, "Tầng 1");
        assert_eq!(summary[0].total, 4);
        assert_eq!(summary[0].occupied, 1);
        assert_eq!(summary[0].reserved, 1);
    }
}
