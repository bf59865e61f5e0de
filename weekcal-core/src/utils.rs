/// Clean up free text for the weekly schedule.
///
/// Line breaks become spaces, `/` and `#` become `-` (both are separators in
/// the schedule's text format), and surrounding whitespace is trimmed.
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\n' | '\r' => ' ',
            '/' | '#' => '-',
            other => other,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
