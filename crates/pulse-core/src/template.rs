//! Placeholder substitution for activity templates.

/// Replaces the first `{key}` occurrence for every `(key, value)` binding.
///
/// Positions are resolved against the original template, so a substituted
/// value that itself looks like a placeholder is never expanded again and
/// the order of `bindings` does not matter.
pub fn render(template: &str, bindings: &[(&str, String)]) -> String {
    let mut splices: Vec<(usize, usize, &str)> = bindings
        .iter()
        .filter_map(|(key, value)| {
            let placeholder = format!("{{{key}}}");
            template
                .find(&placeholder)
                .map(|start| (start, start + placeholder.len(), value.as_str()))
        })
        .collect();
    splices.sort_by_key(|(start, _, _)| *start);

    let mut rendered = String::with_capacity(template.len());
    let mut cursor = 0;
    for (start, end, value) in splices {
        if start < cursor {
            continue;
        }
        rendered.push_str(&template[cursor..start]);
        rendered.push_str(value);
        cursor = end;
    }
    rendered.push_str(&template[cursor..]);
    rendered
}
