//! League and tournament identifier derivation.

/// Leagues whose short form collides with another league's. Keyed by the
/// full display name; the mapped id replaces the derived one outright.
const LEAGUE_ID_OVERRIDES: &[(&str, &str)] = &[
    ("LVP SuperLiga", "LVPSL"),
    ("Claro Stars League", "CSL"),
];

/// Turn a display string into an identifier by replacing whitespace with
/// underscores. Pure and deterministic; never fails.
pub fn derive_id(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Derive a league id from its short form, consulting the override table
/// by full league name first.
pub fn league_id(league_name: &str, league_short: &str) -> String {
    for (name, id) in LEAGUE_ID_OVERRIDES {
        if *name == league_name {
            return (*id).to_string();
        }
    }
    derive_id(league_short)
}
