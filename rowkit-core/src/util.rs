pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Splits the first whitespace delimited word off `input`, skipping leading whitespace.
///
/// Returns the word and whether at least one whitespace character follows it.
pub fn leading_word(input: &str) -> (&str, bool) {
    let input = input.trim_start();
    let end = input
        .find(|c: char| c.is_whitespace())
        .unwrap_or(input.len());
    (&input[..end], end < input.len())
}

/// Largest char boundary of `value` not greater than `index`.
pub fn floor_boundary(value: &str, index: usize) -> usize {
    let mut index = index.min(value.len());
    while !value.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            &$query[..$crate::floor_boundary(&$query, 497)].trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}
