/// Drop quoted lines (first non-whitespace character `>`) from a comment body.
///
/// Quoted authorization strings do not count. `\r\n`, `\r` and `\n` all end a line; the result
/// is joined with `\n`.
pub fn remove_quote_lines(body: &str) -> String {
    body.split(['\r', '\n'])
        .filter(|line| !line.trim_start().starts_with('>'))
        .collect::<Vec<_>>()
        .join("\n")
}
