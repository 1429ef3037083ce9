/// Split a `?search=` value into terms; commas separate terms like whitespace does.
/// A listing matches when every term is found.
pub fn search_terms(search: Option<&str>) -> Vec<String> {
    search
        .unwrap_or_default()
        .replace('\0', "")
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}
