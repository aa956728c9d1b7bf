// src/jtac/mod.rs
//
// Release table extraction: turn the semi-structured per-family tables on
// the JTAC recommended-release article into normalized records. This module
// performs no I/O of its own; tables are supplied in by `crate::fetch` and
// every extraction call is independent.

pub mod cleanup;
pub mod date;
pub mod model;
pub mod release;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

pub use release::Recommended;

/// A Juniper device product line with its own recommended-release table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    Ex,
    Acx,
    Ptx,
    Mx,
    Nfx,
    Qfx,
    Srx,
}

impl Family {
    pub const ALL: [Family; 7] = [
        Family::Ex,
        Family::Acx,
        Family::Ptx,
        Family::Mx,
        Family::Nfx,
        Family::Qfx,
        Family::Srx,
    ];

    /// Lowercase tag used as the output map key.
    pub fn tag(self) -> &'static str {
        match self {
            Family::Ex => "ex",
            Family::Acx => "acx",
            Family::Ptx => "ptx",
            Family::Mx => "mx",
            Family::Nfx => "nfx",
            Family::Qfx => "qfx",
            Family::Srx => "srx",
        }
    }

    /// Cell index of the "last updated" column. Fixed per family, never
    /// inferred from the table.
    pub fn date_column(self) -> usize {
        match self {
            Family::Nfx => 4,
            Family::Srx => 3,
            _ => 2,
        }
    }

    /// MX and PTX share one source table; each family filters out the rows
    /// whose raw model cell names the other.
    fn foreign_model_marker(self) -> Option<&'static str> {
        match self {
            Family::Ptx => Some("MX"),
            Family::Mx => Some("PTX"),
            _ => None,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag().to_uppercase())
    }
}

impl FromStr for Family {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ex" => Ok(Family::Ex),
            "acx" => Ok(Family::Acx),
            "ptx" => Ok(Family::Ptx),
            "mx" => Ok(Family::Mx),
            "nfx" => Ok(Family::Nfx),
            "qfx" => Ok(Family::Qfx),
            "srx" => Ok(Family::Srx),
            other => Err(anyhow!("unknown device family `{}`", other)),
        }
    }
}

/// One table as rows of cell strings, in source order. Header rows carry no
/// `<td>` cells and therefore arrive as empty rows.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

/// One normalized (model, recommended release, last updated) record.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub model: String,
    pub recommended: Recommended,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<NaiveDate>,
}

/// Extract the normalized records for one family from its table.
///
/// Rows are walked top to bottom and output order preserves row order; no
/// deduplication or sorting happens, so duplicate models across rows produce
/// duplicate records. Multi-model rows expand into one record per model,
/// all sharing the row's release and date. A row with fewer cells than the
/// family's layout expects is a data-contract violation and errors out.
pub fn extract(family: Family, table: &Table) -> Result<Vec<Record>> {
    let mut records = Vec::new();

    for (row, cells) in table.rows.iter().enumerate() {
        if cells.is_empty() {
            continue;
        }

        // Shared-table filtering happens on the raw cell, before cleanup.
        if let Some(marker) = family.foreign_model_marker() {
            if cells[0].contains(marker) {
                continue;
            }
        }

        let model_cell = cleanup::cleanup(&cells[0]);
        if model::is_sentinel(family, &model_cell) {
            continue;
        }

        let release_raw = cells
            .get(1)
            .ok_or_else(|| anyhow!("{} row {} has no release column", family, row))?;
        let release_cell = cleanup::cleanup(release_raw);
        if release::is_cross_reference(family, &release_cell) {
            continue;
        }

        let date_raw = cells.get(family.date_column()).ok_or_else(|| {
            anyhow!(
                "{} row {} has no date column at index {}",
                family,
                row,
                family.date_column()
            )
        })?;
        let date_text = match family {
            Family::Qfx => date::collapse_spaces(date_raw),
            _ => date_raw.clone(),
        };
        let updated = date::parse_date(&date_text)
            .with_context(|| format!("{} row {}", family, row))?;

        let recommended = release::parse_release(&release_cell);
        for model in model::split_models(family, &model_cell) {
            records.push(Record {
                model,
                recommended: recommended.clone(),
                updated,
            });
        }
    }

    Ok(records)
}

/// Extract every supplied family table into a `tag -> records` map,
/// preserving each family's row order.
pub fn extract_all<'a>(
    tables: impl IntoIterator<Item = (Family, &'a Table)>,
) -> Result<BTreeMap<String, Vec<Record>>> {
    let mut out = BTreeMap::new();
    for (family, table) in tables {
        let records =
            extract(family, table).with_context(|| format!("extracting {} table", family))?;
        out.insert(family.tag().to_string(), records);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Table {
        Table {
            rows: rows
                .iter()
                .map(|cells| cells.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn mx_table_end_to_end() {
        // Header row (no data cells), a dual-model row, and a cross-reference
        // row. Only the dual-model row yields records, one per model.
        let t = table(&[
            &[],
            &["MX10003/MX10016", "Latest 21.4R3/20.4R3", "March 3, 2023"],
            &["MX5", "See MX Series", "March 3, 2023"],
        ]);

        let records = extract(Family::Mx, &t).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].model, "MX10003");
        assert_eq!(records[1].model, "MX10016");
        for record in &records {
            assert_eq!(
                record.recommended,
                Recommended::Many(vec![
                    "21.4R3 (latest)".to_string(),
                    "20.4R3 (latest)".to_string(),
                ])
            );
            assert_eq!(
                record.updated,
                Some(NaiveDate::from_ymd_opt(2023, 3, 3).unwrap())
            );
        }
    }

    #[test]
    fn shared_table_filters_the_other_family() {
        let t = table(&[
            &["PTX1000", "20.4R3", "April 1, 2023"],
            &["MX240", "21.4R3", "April 1, 2023"],
        ]);

        let ptx = extract(Family::Ptx, &t).unwrap();
        assert_eq!(ptx.len(), 1);
        assert_eq!(ptx[0].model, "PTX1000");

        let mx = extract(Family::Mx, &t).unwrap();
        assert_eq!(mx.len(), 1);
        assert_eq!(mx[0].model, "MX240");
    }

    #[test]
    fn qfx_sentinel_row_is_skipped_and_dates_collapse() {
        let t = table(&[
            &["Asptra Release Considerations", "", ""],
            &["QFX5110/QFX5120", "20.4R3", "June   5,  2022"],
        ]);

        let records = extract(Family::Qfx, &t).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].updated,
            Some(NaiveDate::from_ymd_opt(2022, 6, 5).unwrap())
        );
    }

    #[test]
    fn srx_rows_use_column_three_and_keep_linecards() {
        let t = table(&[&[
            "MX960/MX480 with MPC7E",
            "21.2R3",
            "ignored",
            "May 20, 2023",
        ]]);

        let records = extract(Family::Srx, &t).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].model, "MX960 with MPC7E");
        assert_eq!(records[1].model, "MX480 with MPC7E");
        assert_eq!(
            records[0].updated,
            Some(NaiveDate::from_ymd_opt(2023, 5, 20).unwrap())
        );
    }

    #[test]
    fn blank_date_cells_are_empty_not_errors() {
        let t = table(&[&["EX2300", "18.4R3", ""]]);
        let records = extract(Family::Ex, &t).unwrap();
        assert_eq!(records[0].updated, None);
        assert_eq!(
            records[0].recommended,
            Recommended::One("18.4R3".to_string())
        );
    }

    #[test]
    fn bad_date_text_propagates() {
        let t = table(&[&["EX2300", "18.4R3", "not-a-date-xyz"]]);
        assert!(extract(Family::Ex, &t).is_err());
    }

    #[test]
    fn short_rows_are_contract_violations() {
        let t = table(&[&["EX2300", "18.4R3"]]);
        let err = extract(Family::Ex, &t).unwrap_err();
        assert!(err.to_string().contains("date column"));
    }

    #[test]
    fn duplicate_models_are_preserved_in_order() {
        let t = table(&[
            &["EX4300", "20.4R3", ""],
            &["EX4300", "21.4R3", ""],
        ]);
        let records = extract(Family::Ex, &t).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].model, "EX4300");
        assert_eq!(records[1].model, "EX4300");
        assert_eq!(
            records[0].recommended,
            Recommended::One("20.4R3".to_string())
        );
    }

    #[test]
    fn extract_all_keys_by_family_tag() {
        let ex = table(&[&["EX4300", "20.4R3", ""]]);
        let srx = table(&[&["SRX300", "21.2R3", "x-unused", "May 20, 2023"]]);
        let map =
            extract_all([(Family::Ex, &ex), (Family::Srx, &srx)]).unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), ["ex", "srx"]);
        assert_eq!(map["ex"].len(), 1);
        assert_eq!(map["srx"].len(), 1);
    }
}
