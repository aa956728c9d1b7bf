// src/jtac/model.rs
//
// Splitting a model cell into individual device models. The default is a
// plain slash split; the per-family exceptions below encode known
// irregularities in the vendor tables and must stay exactly as listed.

use super::Family;

/// Split a normalized model cell into one model name per entry.
///
/// Exceptions to the slash-split default:
/// - PTX cells containing `PTX10008` use the slash inside a single SKU.
/// - MX cells containing `MIC` likewise keep the slash.
/// - PTX and MX cells sometimes separate variants with `", "` instead.
/// - SRX cells may carry a shared linecard qualifier after `with`; each
///   split model gets the qualifier re-appended, one `with` clause per model.
pub fn split_models(family: Family, cell: &str) -> Vec<String> {
    match family {
        Family::Ex | Family::Acx | Family::Nfx | Family::Qfx => {
            cell.split('/').map(str::to_string).collect()
        }
        Family::Ptx => {
            if cell.contains('/') && !cell.contains("PTX10008") {
                cell.split('/').map(str::to_string).collect()
            } else if cell.contains(", ") {
                cell.split(", ").map(str::to_string).collect()
            } else {
                vec![cell.to_string()]
            }
        }
        Family::Mx => {
            if cell.contains('/') && !cell.contains("MIC") {
                cell.split('/').map(str::to_string).collect()
            } else if cell.contains(", ") {
                cell.split(", ").map(str::to_string).collect()
            } else {
                vec![cell.to_string()]
            }
        }
        Family::Srx => split_with_linecard(cell),
    }
}

/// SRX rows list chassis models that share a linecard qualifier, e.g.
/// `"MX960/MX480 with MPC7E"`. Every model keeps exactly one `with` clause;
/// a fragment that would repeat an already-emitted model is dropped.
fn split_with_linecard(cell: &str) -> Vec<String> {
    let linecard = cell
        .rsplit_once(" with ")
        .map(|(_, qualifier)| qualifier.trim().to_string());

    if !cell.contains('/') {
        return vec![cell.to_string()];
    }

    let mut models = Vec::new();
    for part in cell.split('/') {
        let part = part.trim();
        match &linecard {
            None => models.push(part.to_string()),
            Some(qualifier) => {
                let base = part.split(" with ").next().unwrap_or(part).trim();
                let model = format!("{} with {}", base, qualifier);
                if models.contains(&model) {
                    continue;
                }
                models.push(model);
            }
        }
    }
    models
}

/// Some rows are mis-parsed section headers, not data. They are skipped
/// entirely rather than emitted as records.
pub fn is_sentinel(family: Family, cell: &str) -> bool {
    match family {
        Family::Qfx => cell == "Asptra Release Considerations",
        Family::Srx => cell.contains("Products for which"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_split_is_on_slash() {
        assert_eq!(
            split_models(Family::Ex, "EX4300/EX4300-48"),
            vec!["EX4300", "EX4300-48"]
        );
        assert_eq!(split_models(Family::Acx, "ACX710"), vec!["ACX710"]);
    }

    #[test]
    fn ptx10008_keeps_its_slash() {
        assert_eq!(
            split_models(Family::Ptx, "PTX10008/PTX10016"),
            vec!["PTX10008/PTX10016"]
        );
        assert_eq!(
            split_models(Family::Ptx, "PTX1000/PTX5000"),
            vec!["PTX1000", "PTX5000"]
        );
    }

    #[test]
    fn comma_space_split_when_no_slash() {
        assert_eq!(
            split_models(Family::Ptx, "PTX3000, PTX5000"),
            vec!["PTX3000", "PTX5000"]
        );
        assert_eq!(
            split_models(Family::Mx, "MX204, MX240"),
            vec!["MX204", "MX240"]
        );
    }

    #[test]
    fn mx_mic_cells_are_not_split() {
        assert_eq!(
            split_models(Family::Mx, "MX2010 with MIC-3D/MIC-6"),
            vec!["MX2010 with MIC-3D/MIC-6"]
        );
    }

    #[test]
    fn shared_linecard_is_reappended_to_each_model() {
        assert_eq!(
            split_models(Family::Srx, "MX960/MX480 with MPC7E"),
            vec!["MX960 with MPC7E", "MX480 with MPC7E"]
        );
    }

    #[test]
    fn srx_split_without_linecard() {
        assert_eq!(
            split_models(Family::Srx, "SRX300/SRX320"),
            vec!["SRX300", "SRX320"]
        );
        assert_eq!(
            split_models(Family::Srx, "SRX5400 with SPC3"),
            vec!["SRX5400 with SPC3"]
        );
    }

    #[test]
    fn sentinel_rows_are_recognized() {
        assert!(is_sentinel(Family::Qfx, "Asptra Release Considerations"));
        assert!(!is_sentinel(Family::Qfx, "QFX5110"));
        assert!(is_sentinel(
            Family::Srx,
            "Products for which severity levels apply"
        ));
        assert!(!is_sentinel(Family::Ex, "Asptra Release Considerations"));
    }
}
