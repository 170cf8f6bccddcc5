//! Dataset parsing and identifier-space validation.

use std::io::BufRead;

use super::csv::split_record;
use super::{CatalogError, Item, ItemId, Rarity, Slot, CATEGORIES};

const REQUIRED_COLUMNS: [&str; 6] = ["id", "name", "base", "slot", "rarity", "category"];

/// Column positions resolved from the header row.
struct Columns {
    id: usize,
    name: usize,
    base: usize,
    slot: usize,
    rarity: usize,
    category: usize,
    width: usize,
}

impl Columns {
    fn from_header(line_no: usize, header: &[String]) -> Result<Self, CatalogError> {
        let find = |column: &str| {
            header
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| CatalogError::corrupt(line_no, format!("missing column '{}'", column)))
        };

        Ok(Self {
            id: find(REQUIRED_COLUMNS[0])?,
            name: find(REQUIRED_COLUMNS[1])?,
            base: find(REQUIRED_COLUMNS[2])?,
            slot: find(REQUIRED_COLUMNS[3])?,
            rarity: find(REQUIRED_COLUMNS[4])?,
            category: find(REQUIRED_COLUMNS[5])?,
            width: header.len(),
        })
    }
}

/// Parse every row of the dataset, returning items paired with their source line.
///
/// Rows come back in file order; density is checked separately by
/// [`into_dense`] once the rows are sorted.
pub(crate) fn parse_rows<R: BufRead>(reader: R) -> Result<Vec<(usize, Item)>, CatalogError> {
    let mut columns: Option<Columns> = None;
    let mut rows = Vec::new();

    for (idx, raw) in reader.split(b'\n').enumerate() {
        let line_no = idx + 1;
        let line = String::from_utf8(raw?)
            .map_err(|e| CatalogError::corrupt(line_no, format!("invalid UTF-8: {}", e)))?;
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_record(&line).map_err(|e| CatalogError::corrupt(line_no, e))?;

        let Some(cols) = columns.as_ref() else {
            columns = Some(Columns::from_header(line_no, &fields)?);
            continue;
        };

        if fields.len() != cols.width {
            return Err(CatalogError::corrupt(
                line_no,
                format!("expected {} fields, found {}", cols.width, fields.len()),
            ));
        }

        rows.push((line_no, parse_item(line_no, cols, &fields)?));
    }

    if columns.is_none() {
        return Err(CatalogError::corrupt(0, "missing header row"));
    }

    Ok(rows)
}

fn parse_item(line_no: usize, cols: &Columns, fields: &[String]) -> Result<Item, CatalogError> {
    let id: ItemId = fields[cols.id].trim().parse().map_err(|_| {
        CatalogError::corrupt(
            line_no,
            format!("id {:?} is not a non-negative integer", fields[cols.id]),
        )
    })?;

    let slot_code = parse_code(line_no, "slot", &fields[cols.slot])?;
    let slot = Slot::try_from(slot_code)
        .map_err(|code| CatalogError::corrupt(line_no, format!("unknown slot code {}", code)))?;

    let rarity_code = parse_code(line_no, "rarity", &fields[cols.rarity])?;
    let rarity = Rarity::try_from(rarity_code)
        .map_err(|code| CatalogError::corrupt(line_no, format!("unknown rarity code {}", code)))?;

    let category: usize = fields[cols.category].trim().parse().map_err(|_| {
        CatalogError::corrupt(
            line_no,
            format!("category {:?} is not an integer", fields[cols.category]),
        )
    })?;
    if category >= CATEGORIES.len() {
        return Err(CatalogError::corrupt(
            line_no,
            format!(
                "category {} outside the category table (0..{})",
                category,
                CATEGORIES.len()
            ),
        ));
    }

    Ok(Item {
        id,
        name: fields[cols.name].clone(),
        base: fields[cols.base].clone(),
        slot,
        rarity,
        category,
    })
}

fn parse_code(line_no: usize, column: &str, raw: &str) -> Result<u8, CatalogError> {
    raw.trim().parse().map_err(|_| {
        CatalogError::corrupt(line_no, format!("{} code {:?} is not an integer", column, raw))
    })
}

/// Sort rows by id and require the ids to be exactly `0..N`.
pub(crate) fn into_dense(mut rows: Vec<(usize, Item)>) -> Result<Vec<Item>, CatalogError> {
    rows.sort_by_key(|(_, item)| item.id);

    for (position, (line_no, item)) in rows.iter().enumerate() {
        if item.id as usize == position {
            continue;
        }
        let reason = if position > 0 && rows[position - 1].1.id == item.id {
            format!("duplicate item id {}", item.id)
        } else {
            format!("item id {} leaves a gap, expected id {}", item.id, position)
        };
        return Err(CatalogError::corrupt(*line_no, reason));
    }

    Ok(rows.into_iter().map(|(_, item)| item).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,name,base,slot,rarity,category\n";

    fn parse(body: &str) -> Result<Vec<Item>, CatalogError> {
        let text = format!("{}{}", HEADER, body);
        parse_rows(text.as_bytes()).and_then(into_dense)
    }

    fn corrupt_reason(result: Result<Vec<Item>, CatalogError>) -> (usize, String) {
        match result {
            Err(CatalogError::Corrupt { line, reason }) => (line, reason),
            other => panic!("expected corrupt catalog, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_sorts_by_id() {
        let items = parse("1,Stone of Jordan,Ring,9,5,33\n0,El Rune,Rune,12,5,32\n").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "El Rune");
        assert_eq!(items[0].slot, Slot::Rune);
        assert_eq!(items[1].id, 1);
        assert_eq!(items[1].rarity, Rarity::Unique);
    }

    #[test]
    fn test_columns_in_any_order() {
        let text = "name,category,id,rarity,slot,base,notes\nEl Rune,32,0,5,12,Rune,first rune\n";
        let items = parse_rows(text.as_bytes()).and_then(into_dense).unwrap();
        assert_eq!(items[0].base, "Rune");
        assert_eq!(items[0].category, 32);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let items = parse("\n0,El Rune,Rune,12,5,32\n\n").unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_header_only_is_empty_catalog() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_missing_header() {
        let (line, reason) = corrupt_reason(parse_rows("".as_bytes()).and_then(into_dense));
        assert_eq!(line, 0);
        assert!(reason.contains("header"));
    }

    #[test]
    fn test_missing_column() {
        let text = "id,name,base,slot,rarity\n0,El Rune,Rune,12,5\n";
        let (line, reason) = corrupt_reason(parse_rows(text.as_bytes()).and_then(into_dense));
        assert_eq!(line, 1);
        assert!(reason.contains("category"));
    }

    #[test]
    fn test_unknown_slot_code() {
        let (line, reason) = corrupt_reason(parse("0,Oddity,Thing,13,5,32\n"));
        assert_eq!(line, 2);
        assert!(reason.contains("slot code 13"));
    }

    #[test]
    fn test_unknown_rarity_code() {
        let (_, reason) = corrupt_reason(parse("0,Oddity,Thing,1,0,32\n"));
        assert!(reason.contains("rarity code 0"));
    }

    #[test]
    fn test_non_integer_id_and_category() {
        let (_, reason) = corrupt_reason(parse("x,Oddity,Thing,1,5,32\n"));
        assert!(reason.contains("id"));

        let (_, reason) = corrupt_reason(parse("0,Oddity,Thing,1,5,two\n"));
        assert!(reason.contains("category"));

        let (_, reason) = corrupt_reason(parse("-1,Oddity,Thing,1,5,32\n"));
        assert!(reason.contains("non-negative"));
    }

    #[test]
    fn test_category_outside_table() {
        let (_, reason) = corrupt_reason(parse("0,Oddity,Thing,1,5,51\n"));
        assert!(reason.contains("category table"));
    }

    #[test]
    fn test_gap_in_ids() {
        let (line, reason) = corrupt_reason(parse("0,A,Ring,9,5,33\n2,B,Ring,9,5,33\n"));
        assert_eq!(line, 3);
        assert!(reason.contains("gap"));
    }

    #[test]
    fn test_duplicate_ids() {
        let (_, reason) = corrupt_reason(parse("0,A,Ring,9,5,33\n0,B,Ring,9,5,33\n"));
        assert!(reason.contains("duplicate item id 0"));
    }

    #[test]
    fn test_invalid_utf8_is_corrupt() {
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(b"0,\xff,Rune,12,1,32\n");

        let (line, reason) = corrupt_reason(parse_rows(bytes.as_slice()).and_then(into_dense));
        assert_eq!(line, 2);
        assert!(reason.contains("UTF-8"));
    }

    #[test]
    fn test_wrong_field_count() {
        let (line, reason) = corrupt_reason(parse("0,A,Ring,9,5\n"));
        assert_eq!(line, 2);
        assert!(reason.contains("expected 6 fields"));
    }
}
