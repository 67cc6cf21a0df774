//! Shared helper functions for rule implementations.

/// Fills `{{ key }}` placeholders in a message template.
///
/// Whitespace inside the braces is optional. Placeholders with no matching
/// entry in `data` are left untouched.
pub fn render_message(template: &str, data: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open + 2..].find("}}") else {
            break;
        };
        let close = open + 2 + close;
        let key = rest[open + 2..close].trim();

        output.push_str(&rest[..open]);
        match data.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => output.push_str(value),
            None => output.push_str(&rest[open..close + 2]),
        }
        rest = &rest[close + 2..];
    }

    output.push_str(rest);
    output
}
