//! Delimiter-aware command-line tokenizing.
//!
//! A raw line is split on single spaces after `=` and `,` have been turned into
//! spaces. Text inside a delimiter block (quotes or brackets) is left alone, and
//! any run of tokens that opens with a delimiter and closes with its partner is
//! glued back into one token with the outer delimiters removed.
//!
//! Only one block can be open at a time. Nested or overlapping pairs are not
//! resolved: the first opener wins and everything up to its closer is opaque.

/// Delimiter pairs in the order they are applied.
pub const DEFAULT_DELIMITERS: [(char, char); 6] = [
    ('\'', '\''),
    ('"', '"'),
    ('(', ')'),
    ('[', ']'),
    ('{', '}'),
    ('<', '>'),
];

/// Token separator used by [`split_line`].
pub const SEPARATOR: char = ' ';

/// Replace every `find` outside a delimiter block with `replace`.
///
/// Once an opener from `pairs` is seen, replacement is suspended until the
/// matching closer of that same pair shows up.
pub fn normalize(text: &str, find: char, replace: char, pairs: &[(char, char)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut open: Option<usize> = None;

    for c in text.chars() {
        match open {
            None => {
                if let Some(idx) = pairs.iter().position(|(opener, _)| *opener == c) {
                    open = Some(idx);
                }
            }
            Some(idx) => {
                if pairs[idx].1 == c {
                    open = None;
                }
            }
        }

        if open.is_none() && c == find {
            out.push(replace);
        } else {
            out.push(c);
        }
    }

    out
}

/// Split `text` on `separator`, dropping empty pieces.
pub fn tokenize(text: &str, separator: char) -> Vec<String> {
    text.split(separator)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Re-join token runs that start with `opener` and end with `closer`.
///
/// Closed runs are joined with `separator` and lose their outer delimiters.
/// A run still open at the end of input is flushed joined, delimiters intact.
pub fn join_delimited(
    tokens: Vec<String>,
    opener: char,
    closer: char,
    separator: char,
) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut pending: Vec<String> = Vec::new();
    let mut joining = false;

    for token in tokens {
        let closes = token.ends_with(closer);
        if joining || token.starts_with(opener) {
            pending.push(token);
            joining = true;
        } else {
            out.push(token);
        }

        if joining && closes {
            let joined = pending.join(&separator.to_string());
            out.push(strip_delimiters(&joined, opener, closer).to_string());
            pending.clear();
            joining = false;
        }
    }

    if !pending.is_empty() {
        out.push(pending.join(&separator.to_string()));
    }

    out
}

// A lone delimiter both opens and closes; stripping it leaves nothing.
fn strip_delimiters(joined: &str, opener: char, closer: char) -> &str {
    let inner = joined.strip_prefix(opener).unwrap_or(joined);
    inner.strip_suffix(closer).unwrap_or(inner)
}

/// Run the whole tokenizer pipeline over a raw command line.
pub fn split_line(line: &str, pairs: &[(char, char)]) -> Vec<String> {
    let text = normalize(line, '=', SEPARATOR, pairs);
    let text = normalize(&text, ',', SEPARATOR, pairs);

    let mut tokens = tokenize(&text, SEPARATOR);
    for &(opener, closer) in pairs {
        tokens = join_delimited(tokens, opener, closer, SEPARATOR);
    }

    tracing::trace!(?tokens, "split command line");
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(line: &str) -> Vec<String> {
        split_line(line, &DEFAULT_DELIMITERS)
    }

    #[test]
    fn normalize_skips_quoted_blocks() {
        let out = normalize("-1='a=b'=c", '=', ' ', &DEFAULT_DELIMITERS);
        assert_eq!(out, "-1 'a=b' c");
    }

    #[test]
    fn normalize_waits_for_matching_closer() {
        // `)` does not close a block opened by `(`'s neighbour `[`.
        let out = normalize("[a=b)=c]=d", '=', ' ', &DEFAULT_DELIMITERS);
        assert_eq!(out, "[a=b)=c] d");
    }

    #[test]
    fn normalize_does_not_nest() {
        // The inner `'` is opaque inside `(`, so the first `)` closes the block.
        let out = normalize("(x='a)=b'", '=', ' ', &DEFAULT_DELIMITERS);
        assert_eq!(out, "(x='a) b'");
    }

    #[test]
    fn tokenize_drops_empty_pieces() {
        assert_eq!(tokenize("  -a   -b ", ' '), vec!["-a", "-b"]);
        assert!(tokenize("", ' ').is_empty());
    }

    #[test]
    fn join_delimited_strips_outer_delimiters() {
        let tokens = tokenize("-1 'This is a' -2", ' ');
        assert_eq!(
            join_delimited(tokens, '\'', '\'', ' '),
            vec!["-1", "This is a", "-2"]
        );
    }

    #[test]
    fn join_delimited_single_token_block() {
        let tokens = tokenize("[abc]", ' ');
        assert_eq!(join_delimited(tokens, '[', ']', ' '), vec!["abc"]);
    }

    #[test]
    fn join_delimited_lone_delimiter_becomes_empty() {
        let tokens = tokenize("-1 ' -2", ' ');
        assert_eq!(join_delimited(tokens, '\'', '\'', ' '), vec!["-1", "", "-2"]);
    }

    #[test]
    fn join_delimited_flushes_unterminated_block() {
        let tokens = tokenize("-1 'never closed here", ' ');
        assert_eq!(
            join_delimited(tokens, '\'', '\'', ' '),
            vec!["-1", "'never closed here"]
        );
    }

    #[test]
    fn split_line_keeps_separators_inside_quotes() {
        assert_eq!(
            split("-1='This is =A= long string'"),
            vec!["-1", "This is =A= long string"]
        );
    }

    #[test]
    fn split_line_breaks_on_equals_and_commas() {
        assert_eq!(split("-2=1337,1338 --x"), vec!["-2", "1337", "1338", "--x"]);
    }

    #[test]
    fn split_line_brackets_and_double_quotes() {
        assert_eq!(
            split(r#"-a="x, y" -b=(1,2) -c={k=v}"#),
            vec!["-a", "x, y", "-b", "1,2", "-c", "k=v"]
        );
    }

    #[test]
    fn split_line_later_pass_can_extend_joined_token() {
        // The quote pass yields "(a b", which the paren pass then sees as an opener.
        assert_eq!(split("'(a b' c)"), vec!["a b c"]);
    }

    #[test]
    fn split_line_unterminated_quote_keeps_content() {
        assert_eq!(split("-1='open ended=x"), vec!["-1", "'open ended=x"]);
    }
}
