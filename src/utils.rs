//! Text normalization helpers used when deriving statements from choices.

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_inline_whitespace<T: AsRef<str>>(text: T) -> String {
    let mut normalized = String::new();
    let mut seen_space = false;
    for ch in text.as_ref().chars() {
        if ch.is_whitespace() {
            if !seen_space {
                normalized.push(' ');
                seen_space = true;
            }
        } else {
            normalized.push(ch);
            seen_space = false;
        }
    }
    normalized.trim().to_string()
}

/// Strip leading choice labels (`1.`, `(2)`, `３）`, `ア `, `④`) from a
/// question's choices and normalize whitespace.
///
/// Labels are stripped only when every choice carries one and the labels
/// count 1, 2, 3, … in choice order (`ア` counts as 1, `イ` as 2, …). A
/// choice set that fails this check is only normalized, so text that merely
/// starts with a number ("3.5%の報酬", "30 日以内") stays intact.
pub fn strip_choice_labels<T: AsRef<str>>(choices: &[T]) -> Vec<String> {
    let parsed: Vec<Option<(usize, &str)>> = choices
        .iter()
        .map(|choice| parse_choice_label(choice.as_ref()))
        .collect();
    let sequential = parsed
        .iter()
        .enumerate()
        .all(|(idx, label)| matches!(label, Some((ordinal, _)) if *ordinal == idx + 1));
    if sequential {
        parsed
            .into_iter()
            .flatten()
            .map(|(_, rest)| normalize_inline_whitespace(rest))
            .collect()
    } else {
        choices.iter().map(normalize_inline_whitespace).collect()
    }
}

/// Split a leading label off `text`, returning its ordinal and the rest.
fn parse_choice_label(text: &str) -> Option<(usize, &str)> {
    let trimmed = text.trim_start();
    parse_circled(trimmed)
        .or_else(|| parse_parenthesized(trimmed))
        .or_else(|| parse_separated(trimmed))
}

fn parse_circled(text: &str) -> Option<(usize, &str)> {
    let first = text.chars().next()?;
    ('\u{2460}'..='\u{2473}').contains(&first).then(|| {
        let ordinal = (first as u32 - 0x2460 + 1) as usize;
        (ordinal, &text[first.len_utf8()..])
    })
}

fn parse_parenthesized(text: &str) -> Option<(usize, &str)> {
    let mut chars = text.char_indices();
    let (_, open) = chars.next()?;
    if open != '(' && open != '（' {
        return None;
    }
    let body = &text[open.len_utf8()..];
    let (ordinal, label_len) = parse_label_token(body)?;
    let after = &body[label_len..];
    let close = after.chars().next()?;
    (close == ')' || close == '）').then(|| (ordinal, &after[close.len_utf8()..]))
}

fn parse_separated(text: &str) -> Option<(usize, &str)> {
    let (ordinal, label_len) = parse_label_token(text)?;
    let after = &text[label_len..];
    let Some(separator) = after.chars().next() else {
        return Some((ordinal, after));
    };
    if !is_label_separator(separator) {
        return None;
    }
    let rest = &after[separator.len_utf8()..];
    // "3.5" is a decimal, not label 3.
    if matches!(separator, '.' | '．') && rest.chars().next().is_some_and(is_digit) {
        return None;
    }
    Some((ordinal, rest))
}

/// A one- or two-digit number or a single katakana label, with its byte length.
fn parse_label_token(text: &str) -> Option<(usize, usize)> {
    let first = text.chars().next()?;
    if let Some(ordinal) = katakana_ordinal(first) {
        return Some((ordinal, first.len_utf8()));
    }
    let mut ordinal = 0usize;
    let mut len = 0usize;
    for ch in text.chars().take_while(|&ch| is_digit(ch)).take(3) {
        ordinal = ordinal * 10 + digit_value(ch)?;
        len += ch.len_utf8();
    }
    let digits = text[..len].chars().count();
    (1..=2).contains(&digits).then_some((ordinal, len))
}

fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit() || ('０'..='９').contains(&ch)
}

fn digit_value(ch: char) -> Option<usize> {
    if ch.is_ascii_digit() {
        return ch.to_digit(10).map(|value| value as usize);
    }
    ('０'..='９')
        .contains(&ch)
        .then(|| (ch as u32 - '０' as u32) as usize)
}

fn katakana_ordinal(ch: char) -> Option<usize> {
    ['ア', 'イ', 'ウ', 'エ', 'オ']
        .iter()
        .position(|&label| label == ch)
        .map(|idx| idx + 1)
}

fn is_label_separator(ch: char) -> bool {
    matches!(ch, '.' | '．' | ')' | '）' | '、' | ' ' | '　' | ':' | '：')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(choices: &[&str]) -> Vec<String> {
        strip_choice_labels(choices)
    }

    #[test]
    fn normalize_inline_whitespace_collapses_runs() {
        let input = "Alpha\n\n  Beta\tGamma";
        assert_eq!(normalize_inline_whitespace(input), "Alpha Beta Gamma");
    }

    #[test]
    fn strips_numeric_labels() {
        assert_eq!(
            strip(&["1. 手付金を受領した。", "  ２）宅地の売買", "3 媒介契約"]),
            vec!["手付金を受領した。", "宅地の売買", "媒介契約"]
        );
    }

    #[test]
    fn strips_parenthesized_and_circled_labels() {
        assert_eq!(
            strip(&["(1) 媒介契約", "（2）代理契約"]),
            vec!["媒介契約", "代理契約"]
        );
        assert_eq!(strip(&["①媒介", "②代理", "③売買"]), vec!["媒介", "代理", "売買"]);
        assert_eq!(strip(&["（ア）媒介", "(イ) 代理"]), vec!["媒介", "代理"]);
    }

    #[test]
    fn strips_katakana_labels() {
        assert_eq!(
            strip(&["ア　重要事項の説明", "イ. 37条書面"]),
            vec!["重要事項の説明", "37条書面"]
        );
    }

    #[test]
    fn label_without_text_strips_to_empty() {
        assert_eq!(strip(&["1. 記述", "2.  "]), vec!["記述", ""]);
    }

    #[test]
    fn decimals_are_not_labels() {
        assert_eq!(parse_choice_label("3.5%の報酬"), None);
        assert_eq!(parse_choice_label("1．5倍"), None);
        assert_eq!(
            strip(&["1.5倍の報酬", "2.0倍の報酬"]),
            vec!["1.5倍の報酬", "2.0倍の報酬"]
        );
    }

    #[test]
    fn unlabeled_sets_keep_leading_numbers() {
        assert_eq!(
            strip(&["3.5%の報酬", "5.4%の報酬"]),
            vec!["3.5%の報酬", "5.4%の報酬"]
        );
        // "30 " parses as a label, but not as the first in a 1..n sequence.
        assert_eq!(
            strip(&["30 日以内に通知する", "14 日以内に通知する"]),
            vec!["30 日以内に通知する", "14 日以内に通知する"]
        );
    }

    #[test]
    fn one_unlabeled_choice_disables_stripping_for_the_set() {
        assert_eq!(
            strip(&["1. 売買", "2年以内に登記する"]),
            vec!["1. 売買", "2年以内に登記する"]
        );
    }

    #[test]
    fn out_of_order_labels_are_kept() {
        assert_eq!(strip(&["2. 代理", "1. 媒介"]), vec!["2. 代理", "1. 媒介"]);
        assert_eq!(strip(&["ア 売買", "ウ 代理"]), vec!["ア 売買", "ウ 代理"]);
    }

    #[test]
    fn leaves_unlabeled_text_alone() {
        assert_eq!(
            strip(&["1000万円以上の取引", "アパートの賃貸", "(注意) 例外あり", "   "]),
            vec!["1000万円以上の取引", "アパートの賃貸", "(注意) 例外あり", ""]
        );
    }
}
