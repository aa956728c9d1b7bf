// src/jtac/cleanup.rs
//
// Cell text from the support portal arrives with non-breaking spaces, tab
// runs, stray spacing around slashes and brackets, and footnote markers.
// The passes below are literal and order-sensitive: later passes assume the
// earlier ones already ran (space collapsing before slash cleanup, slash
// cleanup before the doubled-slash collapse).

/// Footnote annotations stripped verbatim from model and release cells.
static NOTE_MARKERS: &[&str] = &[
    " (See Note 1)",
    " (See Note 2)",
    " (See Note 3)",
    " (See Note 4)",
    " (see notes)",
    " (*1)",
    " (*2)",
    " (*3)",
];

/// Descriptive parentheticals the tables use that carry no model/release data.
static DESCRIPTIVE_MARKERS: &[&str] = &[
    " (Except the ones listed below)",
    " (recommended)",
    " (legacy)",
    " (see note)",
];

/// Normalize one raw table cell.
///
/// A run of N consecutive tabs collapses to exactly one slash, not N slashes:
/// tabs become slashes first and the doubled-slash pass then collapses the
/// run. That is a quirk of the source tables, preserved as the contract.
/// Idempotent: normalizing an already-normalized string returns it unchanged.
pub fn cleanup(raw: &str) -> String {
    let mut cleaned = raw.replace('\u{a0}', " ");

    while cleaned.contains('\t') {
        cleaned = cleaned.replace('\t', "/");
    }

    while cleaned.contains("  ") {
        cleaned = cleaned.replace("  ", " ");
    }

    cleaned = cleaned.replace(" / ", "/");
    cleaned = cleaned.replace(" /", "/");
    cleaned = cleaned.replace("/ ", "/");
    while cleaned.contains("//") {
        cleaned = cleaned.replace("//", "/");
    }

    cleaned = cleaned.replace(" )", ")");
    cleaned = cleaned.replace("( ", "(");

    let mut cleaned = cleaned.trim_matches('.').to_string();

    for marker in NOTE_MARKERS.iter().chain(DESCRIPTIVE_MARKERS) {
        cleaned = cleaned.replace(marker, "");
    }

    cleaned
}
