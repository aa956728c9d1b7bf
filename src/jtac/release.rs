// src/jtac/release.rs

use std::fmt;

use serde::Serialize;

use super::Family;

/// The recommended release(s) for one model. A row listing several
/// slash-separated releases becomes `Many`; everything else is `One`.
/// Serialized untagged so JSON output is a string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Recommended {
    One(String),
    Many(Vec<String>),
}

impl fmt::Display for Recommended {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommended::One(release) => f.write_str(release),
            Recommended::Many(releases) => f.write_str(&releases.join(", ")),
        }
    }
}

/// Parse a normalized release cell.
///
/// A case-insensitive `latest` substring marks the row; the literal prefix
/// `"Latest "` is stripped from the text. When the row is marked latest AND
/// the cell split into multiple releases, every split release gets the
/// `" (latest)"` suffix — all of them, not just the one nearest the marker.
/// That overtags rows where only one of several releases is truly the
/// latest, but it is the documented table behavior and is kept as-is.
pub fn parse_release(cell: &str) -> Recommended {
    let latest = cell.to_lowercase().contains("latest");
    let text = cell.replace("Latest ", "");

    if text.contains('/') {
        let releases: Vec<String> = text
            .split('/')
            .map(|release| {
                if latest {
                    format!("{} (latest)", release)
                } else {
                    release.to_string()
                }
            })
            .collect();
        Recommended::Many(releases)
    } else {
        Recommended::One(text)
    }
}

/// MX rows may point at another table instead of carrying data. Such rows
/// produce no records at all.
pub fn is_cross_reference(family: Family, cell: &str) -> bool {
    family == Family::Mx && cell.contains("See MX Series")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_marker_tags_every_split_release() {
        assert_eq!(
            parse_release("Latest 21.4R3/20.4R3"),
            Recommended::Many(vec![
                "21.4R3 (latest)".to_string(),
                "20.4R3 (latest)".to_string(),
            ])
        );
    }

    #[test]
    fn plain_single_release_passes_through() {
        assert_eq!(
            parse_release("18.4R3"),
            Recommended::One("18.4R3".to_string())
        );
    }

    #[test]
    fn single_release_marked_latest_keeps_no_suffix() {
        // The suffix only applies when the cell split into several releases.
        assert_eq!(
            parse_release("Latest 22.2R1"),
            Recommended::One("22.2R1".to_string())
        );
    }

    #[test]
    fn multiple_releases_without_marker() {
        assert_eq!(
            parse_release("20.4R3/19.4R3"),
            Recommended::Many(vec!["20.4R3".to_string(), "19.4R3".to_string()])
        );
    }

    #[test]
    fn cross_reference_detection_is_mx_only() {
        assert!(is_cross_reference(Family::Mx, "See MX Series"));
        assert!(!is_cross_reference(Family::Mx, "21.4R3"));
        assert!(!is_cross_reference(Family::Ptx, "See MX Series"));
    }

    #[test]
    fn json_shape_is_string_or_list() {
        let one = serde_json::to_string(&Recommended::One("18.4R3".into())).unwrap();
        assert_eq!(one, r#""18.4R3""#);
        let many =
            serde_json::to_string(&Recommended::Many(vec!["a".into(), "b".into()])).unwrap();
        assert_eq!(many, r#"["a","b"]"#);
    }
}
