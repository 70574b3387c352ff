//! English sentence-boundary rules tuned for CV text.

const TERMINATORS: [char; 4] = ['.', '!', '?', '…'];

const CLOSERS: [char; 7] = ['"', '\'', ')', ']', '}', '”', '’'];

// Lowercase, without the final dot.
const ABBREVIATIONS: &[&str] = &[
    "dr", "mr", "mrs", "ms", "prof", "sr", "jr", "st", "mt", "inc", "ltd", "co", "corp", "llc",
    "plc", "vs", "no", "fig", "al", "approx", "dept", "univ", "assoc", "est", "gov", "e.g", "i.e",
    "ph.d", "u.s", "u.k", "b.sc", "m.sc", "b.s", "m.s", "b.a", "m.a", "m.b.a", "b.eng", "m.eng",
    "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
];

// Lowercase words that usually open a new sentence. After a lone capital ("Grade A.", "Plan B.")
// one of these means the letter closed the sentence rather than abbreviating a name. A surname
// spelled like one of these still splits.
const SENTENCE_STARTERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "i", "he", "she", "we", "they", "it",
    "my", "our", "his", "her", "their", "in", "on", "at", "as", "after", "before", "during",
    "while", "since", "also", "then", "later", "however", "additionally", "currently",
    "previously", "led", "built", "managed", "developed", "designed", "created", "founded",
    "launched", "received", "won", "awarded", "published", "served", "authored", "co-authored",
    "delivered", "drove", "grew", "taught", "mentored", "organized", "reviewed", "judged",
    "earned", "achieved", "completed", "graduated", "joined", "worked", "presented", "invited",
];

fn is_terminator(ch: char) -> bool {
    TERMINATORS.contains(&ch)
}

fn is_closer(ch: char) -> bool {
    CLOSERS.contains(&ch)
}

fn is_line_break(ch: char) -> bool {
    ch == '\n' || ch == '\u{000C}'
}

/// Splits `text` into trimmed, non-empty sentence spans in document order.
///
/// Boundaries:
/// - a blank line or form feed always ends a sentence;
/// - a single line break ends a sentence unless the next line starts lowercase;
/// - `!`, `?`, `…` followed by whitespace (after optional closing quotes/brackets);
/// - `.` followed by whitespace, unless it ends an abbreviation, an initial, a list number, or
///   the next word starts lowercase.
pub(crate) fn split_spans(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let byte_at = |i: usize| chars.get(i).map_or(text.len(), |&(pos, _)| pos);

    let mut spans = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, ch) = chars[i];

        if is_line_break(ch) {
            let mut blank = ch == '\u{000C}';
            let mut j = i + 1;
            while j < chars.len() && chars[j].1.is_whitespace() {
                blank |= is_line_break(chars[j].1);
                j += 1;
            }
            let wrapped = chars.get(j).is_some_and(|&(_, next)| next.is_lowercase());
            if blank || !wrapped {
                push_span(&mut spans, &text[start..pos]);
                start = byte_at(j);
            }
            i = j;
            continue;
        }

        if is_terminator(ch) {
            let mut strong = ch != '.';
            let mut j = i + 1;
            while j < chars.len() && (is_terminator(chars[j].1) || is_closer(chars[j].1)) {
                strong |= matches!(chars[j].1, '!' | '?' | '…');
                j += 1;
            }

            let at_space = chars.get(j).is_none_or(|&(_, next)| next.is_whitespace());
            if at_space && (strong || period_ends_sentence(&text[start..pos], &chars[j..])) {
                let end = byte_at(j);
                push_span(&mut spans, &text[start..end]);
                start = end;
            }
            i = j;
            continue;
        }

        i += 1;
    }

    push_span(&mut spans, &text[start..]);
    spans
}

fn period_ends_sentence(before: &str, after: &[(usize, char)]) -> bool {
    let word = before
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .trim_start_matches(|c: char| matches!(c, '(' | '[' | '"' | '\'' | '“' | '‘'));

    if word.is_empty() {
        return true;
    }

    let lower = word.to_lowercase();
    if ABBREVIATIONS.contains(&lower.as_str()) {
        return false;
    }

    let mut letters = word.chars();
    if let (Some(first), None) = (letters.next(), letters.next())
        && first.is_uppercase()
        && continues_name(after)
    {
        return false;
    }

    // "1." opening a numbered list item.
    if word.chars().all(|c| c.is_ascii_digit()) && before.trim() == word {
        return false;
    }

    let next = after.iter().map(|&(_, c)| c).find(|c| !c.is_whitespace());
    !next.is_some_and(char::is_lowercase)
}

/// Whether the text after a lone capital letter reads like the rest of a name ("J. Smith"):
/// the next word sits on the same line, starts uppercase and is not a common sentence opener.
fn continues_name(after: &[(usize, char)]) -> bool {
    let rest = after.iter().map(|&(_, c)| c);
    let mut word = String::new();
    for c in rest.skip_while(|c| *c == ' ' || *c == '\t') {
        if c.is_whitespace() {
            break;
        }
        word.push(c);
    }

    let starts_upper = word.chars().next().is_some_and(char::is_uppercase);
    let bare = word.trim_end_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
    starts_upper && !SENTENCE_STARTERS.contains(&bare.as_str())
}

fn push_span<'a>(spans: &mut Vec<&'a str>, span: &'a str) {
    let span = span.trim();
    if !span.is_empty() {
        spans.push(span);
    }
}
