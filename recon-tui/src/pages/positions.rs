use recon_table::{Alignment, Column, HierarchicalTable, Row, TableError};

use super::{Page, Summary};
use crate::config::Settings;
use crate::format;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Matched,
    NearMatch,
    Unmatched,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Matched => "Matched",
            Status::NearMatch => "Near Match",
            Status::Unmatched => "Unmatched",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Status::Matched => "success",
            Status::NearMatch => "warning",
            Status::Unmatched => "error",
        }
    }
}

struct Position {
    id: &'static str,
    cusip: &'static str,
    security: &'static str,
    fund: &'static str,
    dealer: &'static str,
    security_type: &'static str,
    internal: f64,
    external: f64,
    variance: f64,
    status: Status,
    last_updated: &'static str,
}

const POSITIONS: [Position; 5] = [
    Position {
        id: "1",
        cusip: "912828XM5",
        security: "US Treasury Note 2.5% 2027",
        fund: "Fund A1",
        dealer: "Goldman Sachs",
        security_type: "Government Bond",
        internal: 1_000_000.0,
        external: 1_000_000.0,
        variance: 0.0,
        status: Status::Matched,
        last_updated: "2024-01-15",
    },
    Position {
        id: "2",
        cusip: "037833100",
        security: "Apple Inc Common Stock",
        fund: "Fund B2",
        dealer: "JP Morgan",
        security_type: "Equity",
        internal: 750_000.0,
        external: 770_000.0,
        variance: 0.027,
        status: Status::NearMatch,
        last_updated: "2024-01-15",
    },
    Position {
        id: "3",
        cusip: "594918104",
        security: "Microsoft Corp Common Stock",
        fund: "Fund C3",
        dealer: "Morgan Stanley",
        security_type: "Equity",
        internal: 0.0,
        external: 500_000.0,
        variance: 1.0,
        status: Status::Unmatched,
        last_updated: "2024-01-14",
    },
    Position {
        id: "4",
        cusip: "79466L302",
        security: "Salesforce Inc Common Stock",
        fund: "Fund A1",
        dealer: "Merrill Lynch",
        security_type: "Equity",
        internal: 300_000.0,
        external: 300_000.0,
        variance: 0.0,
        status: Status::Matched,
        last_updated: "2024-01-14",
    },
    Position {
        id: "5",
        cusip: "46625H100",
        security: "JPMorgan Chase & Co",
        fund: "Fund B2",
        dealer: "Goldman Sachs",
        security_type: "Equity",
        internal: 425_000.0,
        external: 400_000.0,
        variance: -0.059,
        status: Status::NearMatch,
        last_updated: "2024-01-13",
    },
];

impl Position {
    fn row(&self) -> Row {
        Row::new(self.id)
            .field("cusip", self.cusip)
            .field("security", self.security)
            .field("fund", self.fund)
            .field("dealer", self.dealer)
            .field("securityType", self.security_type)
            .field("internalPosition", format::currency(self.internal))
            .field("externalPosition", format::currency(self.external))
            .field("variance", format::variance(self.variance))
            .field("status", format::badge(self.status.label(), self.status.color()))
            .field("lastUpdated", self.last_updated)
    }
}

/// Column the breakdown groups positions by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pivot {
    Fund,
    Dealer,
    SecurityType,
}

impl Pivot {
    pub fn key(self) -> &'static str {
        match self {
            Pivot::Fund => "fund",
            Pivot::Dealer => "dealer",
            Pivot::SecurityType => "securityType",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Pivot::Fund => "fund",
            Pivot::Dealer => "dealer",
            Pivot::SecurityType => "security type",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Pivot::Fund => Pivot::Dealer,
            Pivot::Dealer => Pivot::SecurityType,
            Pivot::SecurityType => Pivot::Fund,
        }
    }
}

/// Positions sharing one pivot value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub count: usize,
    pub matched: usize,
    pub unmatched: usize,
}

/// Count positions per pivot value, in first-seen order.
pub fn breakdown(rows: &[Row], pivot: Pivot) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    for row in rows {
        let Some(name) = row.get(pivot.key()).map(|v| v.display_text()) else {
            continue;
        };
        let status = row.get("status").map(|v| v.display_text());
        let index = match groups.iter().position(|g| g.name == name) {
            Some(index) => index,
            None => {
                groups.push(Group {
                    name: name.into_owned(),
                    count: 0,
                    matched: 0,
                    unmatched: 0,
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[index];
        group.count += 1;
        match status.as_deref() {
            Some(label) if label == Status::Matched.label() => group.matched += 1,
            Some(label) if label == Status::Unmatched.label() => group.unmatched += 1,
            _ => {}
        }
    }
    groups
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("cusip", "CUSIP"),
        Column::new("security", "Security"),
        Column::new("fund", "Fund"),
        Column::new("dealer", "Dealer"),
        Column::new("securityType", "Type"),
        Column::new("internalPosition", "Internal Position").align(Alignment::Right),
        Column::new("externalPosition", "External Position").align(Alignment::Right),
        Column::new("variance", "Variance").align(Alignment::Right),
        Column::new("status", "Status"),
        Column::new("lastUpdated", "Last Updated"),
    ]
}

pub fn page(settings: &Settings) -> Result<Page, TableError> {
    let rows = POSITIONS.iter().map(Position::row).collect();
    let table = HierarchicalTable::new(columns(), rows)?.with_options(
        settings.table_options("Search by CUSIP, security, fund, or dealer..."),
    );
    let summary = Summary {
        total: "Positions",
        tally: "status",
        rate: Some(Status::Matched.label()),
    };
    Ok(Page::new("Positions", table)
        .with_fund_filter()
        .with_summary(summary)
        .with_pivot(Pivot::Fund))
}

#[cfg(test)]
mod tests {
    use recon_table::FieldValue;

    use super::*;

    #[test]
    fn positions_are_formatted() {
        let page = page(&Settings::default()).unwrap();
        let row = page.table.data().find("2").unwrap();
        assert_eq!(
            row.get("externalPosition"),
            Some(&FieldValue::from("$770,000"))
        );
        assert_eq!(row.get("variance").unwrap().display_text(), "2.70%");
        assert_eq!(row.get("status").unwrap().display_text(), "Near Match");
        assert!(!row.expandable);
    }

    fn group(name: &str, count: usize, matched: usize, unmatched: usize) -> Group {
        Group {
            name: name.to_string(),
            count,
            matched,
            unmatched,
        }
    }

    #[test]
    fn breakdown_by_each_pivot() {
        let page = page(&Settings::default()).unwrap();
        let rows = page.table.rows();
        assert_eq!(
            breakdown(rows, Pivot::Fund),
            [
                group("Fund A1", 2, 2, 0),
                group("Fund B2", 2, 0, 0),
                group("Fund C3", 1, 0, 1),
            ]
        );
        assert_eq!(
            breakdown(rows, Pivot::Dealer)[0],
            group("Goldman Sachs", 2, 1, 0)
        );
        assert_eq!(
            breakdown(rows, Pivot::SecurityType),
            [group("Government Bond", 1, 1, 0), group("Equity", 4, 1, 1)]
        );
    }

    #[test]
    fn stats_follow_the_fund_filter() {
        let mut page = page(&Settings::default()).unwrap();
        let shown: Vec<String> = page
            .stats()
            .iter()
            .map(|s| format!("{} {}", s.label, s.value))
            .collect();
        assert_eq!(
            shown,
            [
                "Positions 5",
                "Matched 2",
                "Near Match 2",
                "Unmatched 1",
                "Match rate 40.00%"
            ]
        );

        page.cycle_fund().unwrap();
        assert_eq!(page.stats()[0].value, "2");
        assert_eq!(page.stats()[1].color.as_deref(), Some("success"));
        // the breakdown still covers every fund
        let (pivot, groups) = page.pivot().unwrap();
        assert_eq!(pivot, Pivot::Fund);
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn pivot_cycles() {
        let mut page = page(&Settings::default()).unwrap();
        assert!(page.cycle_pivot());
        assert_eq!(page.pivot().unwrap().0, Pivot::Dealer);
        page.cycle_pivot();
        page.cycle_pivot();
        assert_eq!(page.pivot().unwrap().0, Pivot::Fund);
    }

    #[test]
    fn search_matches_formatted_text_and_labels() {
        let mut page = page(&Settings::default()).unwrap();
        page.table.set_search("$1,000,000");
        assert_eq!(page.table.visible_len(), 1);

        page.table.set_search("unmatched");
        let ids: Vec<_> = page.table.visible_rows().iter().map(|v| v.id()).collect();
        assert_eq!(ids, ["3"]);

        // variance is styled and therefore not searchable
        page.table.set_search("5.90%");
        assert_eq!(page.table.visible_len(), 0);
    }
}
