//! Total-order comparator for cell values
//!
//! One comparison function shared by every column, with explicit rules for
//! null, numeric, composite, and string values:
//!
//! - null sorts before any value; two nulls tie
//! - composites compare element-wise, padding the shorter side with nulls
//! - two numbers compare numerically
//! - everything else compares by its string form, case-insensitively, with
//!   digit runs compared by numeric value (so "A2" sorts before "A10")

use std::cmp::Ordering;
use std::iter::Peekable;
use std::slice;

use crate::cell::CellValue;

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9). Nulls first.
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0). Nulls last.
    Desc,
}

impl Direction {
    /// Applies this direction to a base (ascending) ordering.
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        }
    }

    /// Returns the opposite direction.
    pub fn toggled(self) -> Direction {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }
}

/// Compares two cell values under the engine's total order.
pub fn compare(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Null, CellValue::Null) => Ordering::Equal,
        (CellValue::Null, _) => Ordering::Less,
        (_, CellValue::Null) => Ordering::Greater,
        (CellValue::List(_), _) | (_, CellValue::List(_)) => {
            compare_elements(as_elements(a), as_elements(b))
        }
        _ => compare_scalars(a, b),
    }
}

/// A scalar next to a composite is treated as a one-element composite.
fn as_elements(value: &CellValue) -> &[CellValue] {
    match value {
        CellValue::List(items) => items,
        scalar => slice::from_ref(scalar),
    }
}

/// Element-wise comparison, continuing past the shorter side with nulls.
fn compare_elements(a: &[CellValue], b: &[CellValue]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let left = a.get(i).unwrap_or(&CellValue::Null);
        let right = b.get(i).unwrap_or(&CellValue::Null);
        let ord = compare(left, right);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn compare_scalars(a: &CellValue, b: &CellValue) -> Ordering {
    if let (Some(na), Some(nb)) = (a.as_num(), b.as_num()) {
        return na.partial_cmp(&nb).unwrap_or(Ordering::Equal);
    }
    natural_cmp(&a.to_string(), &b.to_string())
}

/// Case-insensitive, numeric-aware string comparison.
///
/// Digit runs compare by numeric value; everything else compares by
/// lowercased characters. Leading zeros do not break ties.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ca = a.chars().peekable();
    let mut cb = b.chars().peekable();
    loop {
        match (ca.peek().copied(), cb.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                if x.is_ascii_digit() && y.is_ascii_digit() {
                    let run_a = take_digits(&mut ca);
                    let run_b = take_digits(&mut cb);
                    let na = run_a.trim_start_matches('0');
                    let nb = run_b.trim_start_matches('0');
                    let ord = na.len().cmp(&nb.len()).then_with(|| na.cmp(nb));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                } else {
                    let ord = x.to_lowercase().cmp(y.to_lowercase());
                    if ord != Ordering::Equal {
                        return ord;
                    }
                    ca.next();
                    cb.next();
                }
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(*c);
        chars.next();
    }
    run
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> CellValue {
        CellValue::Num(n)
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_null_ordering() {
        assert_eq!(compare(&CellValue::Null, &CellValue::Null), Ordering::Equal);
        assert_eq!(compare(&CellValue::Null, &num(1.0)), Ordering::Less);
        assert_eq!(compare(&num(1.0), &CellValue::Null), Ordering::Greater);
        assert_eq!(compare(&CellValue::Null, &text("")), Ordering::Less);
    }

    #[test]
    fn test_numeric_comparison() {
        assert_eq!(compare(&num(2.0), &num(10.0)), Ordering::Less);
        assert_eq!(compare(&num(-1.5), &num(-1.5)), Ordering::Equal);
    }

    #[test]
    fn test_natural_string_order() {
        assert_eq!(natural_cmp("A2", "A10"), Ordering::Less);
        assert_eq!(natural_cmp("a", "B"), Ordering::Less);
        assert_eq!(natural_cmp("B", "C2"), Ordering::Less);
        assert_eq!(natural_cmp("a", "A"), Ordering::Equal);
        assert_eq!(natural_cmp("file10", "file9"), Ordering::Greater);
        assert_eq!(natural_cmp("07", "7"), Ordering::Equal);
    }

    #[test]
    fn test_mixed_scalar_falls_back_to_strings() {
        // A number next to non-numeric text compares by string form.
        assert_eq!(compare(&num(2.0), &text("10a")), Ordering::Less);
        assert_eq!(compare(&text("b"), &num(2.0)), Ordering::Greater);
    }

    #[test]
    fn test_list_element_wise() {
        let a = CellValue::List(vec![num(1.0), num(2.0)]);
        let b = CellValue::List(vec![num(1.0), num(3.0)]);
        assert_eq!(compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_list_null_padding_past_shorter() {
        // [1] vs [1, 0]: the padding null loses to 0.
        let a = CellValue::List(vec![num(1.0)]);
        let b = CellValue::List(vec![num(1.0), num(0.0)]);
        assert_eq!(compare(&a, &b), Ordering::Less);

        let equal = CellValue::List(vec![num(1.0), CellValue::Null]);
        assert_eq!(compare(&a, &equal), Ordering::Equal);
    }

    #[test]
    fn test_scalar_vs_list() {
        let scalar = num(5.0);
        let list = CellValue::List(vec![num(5.0), num(1.0)]);
        assert_eq!(compare(&scalar, &list), Ordering::Less);
        assert_eq!(compare(&list, &scalar), Ordering::Greater);
    }

    #[test]
    fn test_direction() {
        assert_eq!(Direction::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Direction::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Direction::Asc.toggled(), Direction::Desc);
    }
}
