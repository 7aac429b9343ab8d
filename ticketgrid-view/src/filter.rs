//! Free-text search filter
//!
//! Reduces the record set to rows whose rendered representation contains the
//! query as a case-insensitive substring in any column. A blank query is the
//! identity: the input comes back unchanged, in order.

use ticketgrid_lib::model::Record;

use crate::column::Columns;

/// Filters records by a free-text query across all columns.
///
/// Original record order is preserved.
pub fn filter<'a>(records: &'a [Record], columns: &Columns, query: &str) -> Vec<&'a Record> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| {
            columns
                .iter()
                .any(|column| column.search_text(record).to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ticket_columns;

    fn records() -> Vec<Record> {
        serde_json::from_str(
            r#"[
                {"id": 1, "name": "Concert", "type": "VIP", "price": 100},
                {"id": 2, "name": "Theatre", "type": "USUAL", "price": 55.5},
                {"id": 3, "name": "concerto", "type": "CHEAP"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_blank_query_is_identity() {
        let records = records();
        let columns = ticket_columns();
        for query in ["", "   ", "\t"] {
            let out = filter(&records, &columns, query);
            assert_eq!(out.len(), records.len());
            for (kept, original) in out.iter().zip(records.iter()) {
                assert!(std::ptr::eq(*kept, original));
            }
        }
    }

    #[test]
    fn test_case_insensitive_substring() {
        let records = records();
        let columns = ticket_columns();
        let out = filter(&records, &columns, "CONCERT");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id(), Some(1));
        assert_eq!(out[1].id(), Some(3));
    }

    #[test]
    fn test_matches_any_column() {
        let records = records();
        let columns = ticket_columns();
        assert_eq!(filter(&records, &columns, "usual").len(), 1);
        assert_eq!(filter(&records, &columns, "55.5").len(), 1);
        assert_eq!(filter(&records, &columns, "zebra").len(), 0);
    }

    #[test]
    fn test_subset_and_order_preserved() {
        let records = records();
        let columns = ticket_columns();
        let out = filter(&records, &columns, "e");
        let mut last_id = 0;
        for record in out {
            let id = record.id().unwrap();
            assert!(id > last_id, "order not preserved");
            last_id = id;
            assert!(records.iter().any(|r| r.id() == Some(id)));
        }
    }

    #[test]
    fn test_placeholder_dash_never_matches_absent_values() {
        let records = records();
        let columns = ticket_columns();
        // Record 3 has no price, rendered as "—", but search sees empty text.
        assert_eq!(filter(&records, &columns, "—").len(), 0);
    }
}
