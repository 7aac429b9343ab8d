//! Column model
//!
//! A static declarative registry binding each visible column to an accessor
//! over records. Accessors are total: a missing or oddly-shaped nested path
//! resolves to a null cell, never a panic. Column order is fixed and defines
//! both render and search order.

use ticketgrid_lib::model::Record;

use crate::cell::CellValue;

/// How a column extracts its cell from a record.
///
/// Bindings are declarative and resolved when the registry is built; there is
/// no per-row lookup by name at sort time beyond the dotted-path walk itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    /// A numeric field at a dotted path; non-numeric shapes become null.
    Num(&'static str),
    /// A textual field at a dotted path, kept as coerced.
    Text(&'static str),
}

impl Accessor {
    /// Extracts the cell value from a record. Never panics.
    pub fn value(&self, record: &Record) -> CellValue {
        match self {
            Accessor::Num(path) => match CellValue::coerce_opt(record.get_path(path)) {
                cell @ CellValue::Num(_) => cell,
                _ => CellValue::Null,
            },
            Accessor::Text(path) => CellValue::coerce_opt(record.get_path(path)),
        }
    }
}

/// Optional cell-formatting override, applied to the coerced value.
type RenderFn = fn(&CellValue) -> String;

/// One visible column of the table.
#[derive(Debug, Clone)]
pub struct Column {
    /// Unique key identifying the column.
    pub key: &'static str,
    /// Display label.
    pub title: &'static str,
    /// Render width in pixels.
    pub width: u16,
    /// Whether header clicks activate sorting on this column.
    pub sortable: bool,
    accessor: Accessor,
    render: Option<RenderFn>,
}

impl Column {
    /// Creates a sortable column with the default rendering.
    pub fn new(key: &'static str, title: &'static str, width: u16, accessor: Accessor) -> Self {
        Self {
            key,
            title,
            width,
            sortable: true,
            accessor,
            render: None,
        }
    }

    /// Excludes this column from header-click sort activation.
    ///
    /// It remains filterable and renderable.
    pub fn not_sortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Sets a custom cell-formatting function.
    pub fn with_render(mut self, render: RenderFn) -> Self {
        self.render = Some(render);
        self
    }

    /// Extracts the coerced cell value for this column.
    pub fn value(&self, record: &Record) -> CellValue {
        self.accessor.value(record)
    }

    /// The text shown in the cell.
    pub fn cell_text(&self, record: &Record) -> String {
        let value = self.value(record);
        match self.render {
            Some(render) if !value.is_null() => render(&value),
            _ => value.to_string(),
        }
    }

    /// The text matched by the search filter.
    pub fn search_text(&self, record: &Record) -> String {
        self.value(record).search_text()
    }
}

/// The fixed, ordered column registry of a table.
#[derive(Debug, Clone)]
pub struct Columns {
    columns: Vec<Column>,
}

impl Columns {
    /// Builds a registry, enforcing key uniqueness.
    ///
    /// # Panics
    ///
    /// Panics if two columns share a key; that is a programming error in the
    /// registry definition, not a runtime condition.
    pub fn new(columns: Vec<Column>) -> Self {
        for (i, column) in columns.iter().enumerate() {
            assert!(
                columns[..i].iter().all(|c| c.key != column.key),
                "duplicate column key: {}",
                column.key
            );
        }
        Self { columns }
    }

    /// Iterates the columns in render order.
    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Looks up a column by key.
    pub fn by_key(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Returns `true` if the key names a sortable column.
    pub fn sortable(&self, key: &str) -> bool {
        self.by_key(key).is_some_and(|c| c.sortable)
    }
}

/// Renders a numeric cell with exactly two decimal places.
fn two_decimals(value: &CellValue) -> String {
    match value.as_num() {
        Some(n) => format!("{n:.2}"),
        None => value.to_string(),
    }
}

/// The ticket table registry: every scalar field plus the flattened nested
/// person, event, and venue entities.
pub fn ticket_columns() -> Columns {
    Columns::new(vec![
        Column::new("id", "ID", 70, Accessor::Num("id")),
        Column::new("name", "Name", 180, Accessor::Text("name")),
        Column::new("price", "Price", 90, Accessor::Num("price")).with_render(two_decimals),
        Column::new("type", "Type", 110, Accessor::Text("type")),
        Column::new("number", "Quantity", 80, Accessor::Num("number")),
        Column::new("discount", "Discount", 90, Accessor::Num("discount")),
        Column::new("coord_x", "Coord X", 90, Accessor::Num("coordinates.x")),
        Column::new("coord_y", "Coord Y", 90, Accessor::Num("coordinates.y")),
        Column::new("person_id", "Person ID", 100, Accessor::Num("person.id")),
        Column::new("person_passport", "PassportID", 140, Accessor::Text("person.passportID")),
        Column::new("person_weight", "Weight", 100, Accessor::Num("person.weight")),
        Column::new("person_nat", "Nationality", 140, Accessor::Text("person.nationality")),
        Column::new("person_hair", "HairColor", 120, Accessor::Text("person.hairColor")),
        Column::new("person_eye", "EyeColor", 120, Accessor::Text("person.eyeColor")),
        Column::new("person_loc_x", "Loc X", 90, Accessor::Num("person.location.x")),
        Column::new("person_loc_y", "Loc Y", 90, Accessor::Num("person.location.y")),
        Column::new("person_loc_z", "Loc Z", 90, Accessor::Num("person.location.z")),
        Column::new("event_id", "Event ID", 100, Accessor::Num("event.id")),
        Column::new("event_name", "Event name", 160, Accessor::Text("event.name")),
        Column::new("event_count", "Tickets count", 130, Accessor::Num("event.ticketsCount")),
        Column::new("event_type", "Event type", 130, Accessor::Text("event.eventType")),
        Column::new("venue_id", "Venue ID", 100, Accessor::Num("venue.id")),
        Column::new("venue_name", "Venue name", 160, Accessor::Text("venue.name")),
        Column::new("venue_capacity", "Capacity", 110, Accessor::Num("venue.capacity")),
        Column::new("venue_type", "Venue type", 120, Accessor::Text("venue.type")),
        Column::new("comment", "Comment", 220, Accessor::Text("comment")),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketgrid_lib::model::Value;

    fn ticket() -> Record {
        serde_json::from_str(
            r#"{
                "id": 3,
                "name": "VIP",
                "price": 120.5,
                "number": 2,
                "coordinates": {"x": 4, "y": -7},
                "person": {"id": 9, "passportID": "AB12", "location": {"x": 1, "y": 2, "z": 3}}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_registry_has_unique_keys_and_fixed_order() {
        let columns = ticket_columns();
        assert_eq!(columns.len(), 26);
        assert_eq!(columns.iter().next().unwrap().key, "id");
        assert!(columns.by_key("person_loc_z").is_some());
        assert!(columns.by_key("nope").is_none());
    }

    #[test]
    #[should_panic(expected = "duplicate column key")]
    fn test_duplicate_keys_rejected() {
        Columns::new(vec![
            Column::new("id", "ID", 70, Accessor::Num("id")),
            Column::new("id", "ID again", 70, Accessor::Num("id")),
        ]);
    }

    #[test]
    fn test_accessors_never_fail_on_missing_paths() {
        let record = ticket();
        let columns = ticket_columns();
        // event/venue are absent entirely; every accessor still resolves.
        for column in columns.iter() {
            let _ = column.value(&record);
        }
        assert_eq!(columns.by_key("event_name").unwrap().value(&record), CellValue::Null);
        assert_eq!(
            columns.by_key("person_loc_z").unwrap().value(&record),
            CellValue::Num(3.0)
        );
    }

    #[test]
    fn test_num_accessor_rejects_non_numeric() {
        let record = Record::new().set("price", Value::from("not a price"));
        assert_eq!(Accessor::Num("price").value(&record), CellValue::Null);
        // Numeric strings still count as numbers.
        let record = Record::new().set("price", Value::from("99"));
        assert_eq!(Accessor::Num("price").value(&record), CellValue::Num(99.0));
    }

    #[test]
    fn test_price_renders_two_decimals() {
        let columns = ticket_columns();
        let price = columns.by_key("price").unwrap();
        assert_eq!(price.cell_text(&ticket()), "120.50");
        assert_eq!(price.cell_text(&Record::new()), "—");
    }

    #[test]
    fn test_not_sortable_excluded_from_sort() {
        let columns = Columns::new(vec![
            Column::new("a", "A", 10, Accessor::Text("a")).not_sortable(),
            Column::new("b", "B", 10, Accessor::Text("b")),
        ]);
        assert!(!columns.sortable("a"));
        assert!(columns.sortable("b"));
        assert!(!columns.sortable("missing"));
    }
}
