//! Formatting utilities used for CLI outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Wrap free text (activity descriptions, backend messages) for the terminal,
/// indenting every line by `indent` spaces.
pub fn wrap_indented(text: &str, width: usize, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let options = textwrap::Options::new(width)
        .initial_indent(&pad)
        .subsequent_indent(&pad);
    textwrap::fill(text.trim(), options)
}

/// Render a button-like control: `[ Apply Now ]`.
pub fn button(label: &str) -> String {
    format!("[ {} ]", label)
}
