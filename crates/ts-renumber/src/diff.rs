use similar::TextDiff;

/// Unified diff from `original` to `renumbered`, or `None` when they match.
pub fn unified_diff(original: &str, renumbered: &str, name: &str) -> Option<String> {
    if original == renumbered {
        return None;
    }

    let header_old = format!("a/{name}");
    let header_new = format!("b/{name}");

    Some(
        TextDiff::from_lines(original, renumbered)
            .unified_diff()
            .context_radius(2)
            .header(&header_old, &header_new)
            .to_string(),
    )
}
