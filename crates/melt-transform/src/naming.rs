//! Canonical column naming.
//!
//! Rewrites run in a fixed order; later rules assume the earlier ones ran
//! (e.g. `#` becomes `nr` before the character whitelist would delete it).

const BRACKETS: [char; 8] = ['(', ')', '{', '}', '[', ']', '<', '>'];

/// Standardize a source column name to the canonical `[a-z0-9_]` form.
///
/// 1. lowercase
/// 2. spaces to `_`
/// 3. `#` to `nr`
/// 4. strip brackets and parentheses
/// 5. strip anything outside `[a-z0-9_]`
/// 6. collapse repeated underscores
/// 7. trim leading and trailing underscores
///
/// The result is a fixed point: standardizing it again changes nothing.
///
/// # Examples
///
/// ```
/// use melt_transform::standardize_column_name;
///
/// assert_eq!(standardize_column_name("Country_Region"), "country_region");
/// assert_eq!(standardize_column_name("Long_"), "long");
/// assert_eq!(standardize_column_name("Province/State"), "provincestate");
/// assert_eq!(standardize_column_name("Case # (Total)"), "case_nr_total");
/// ```
pub fn standardize_column_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let spaced = lowered.replace(' ', "_");
    let numbered = spaced.replace('#', "nr");
    let unbracketed: String = numbered
        .chars()
        .filter(|ch| !BRACKETS.contains(ch))
        .collect();
    let whitelisted: String = unbracketed
        .chars()
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == '_')
        .collect();
    let collapsed = collapse_underscores(&whitelisted);
    collapsed.trim_matches('_').to_string()
}

fn collapse_underscores(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous_underscore = false;
    for ch in value.chars() {
        if ch == '_' {
            if previous_underscore {
                continue;
            }
            previous_underscore = true;
        } else {
            previous_underscore = false;
        }
        out.push(ch);
    }
    out
}
