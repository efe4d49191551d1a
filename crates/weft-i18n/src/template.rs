//! Template expansion
//!
//! Templates carry two kinds of tokens:
//!
//! - `$N`: the N-th positional argument (1-based). A token without a
//!   matching argument stays in the output verbatim.
//! - `{{OP:subject|form|form..}}`: a selection expression. The inside is
//!   expanded first, so `{{PLURAL:$1|reply|replies}}` works. `PLURAL` and
//!   `GENDER` are understood (case-insensitively); anything else is left in
//!   place with its inside expanded.
//!
//! Expansion is a pure function of the template and its arguments.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Positional tokens, or the shortest `{{..}}` span on one line.
static TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$[0-9]+)|\{\{(.+?)\}\}").expect("Invalid template token regex"));

/// Grammatical gender selected by a `GENDER` expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    /// Exactly `male`
    Male,
    /// Exactly `female`
    Female,
    /// Anything else
    Other,
}

impl Gender {
    /// Classify a subject string; matching is exact and case-sensitive.
    pub fn parse(subject: &str) -> Self {
        match subject {
            "male" => Self::Male,
            "female" => Self::Female,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Plural,
    Gender,
}

impl Operator {
    fn parse(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("PLURAL") {
            Some(Self::Plural)
        } else if name.eq_ignore_ascii_case("GENDER") {
            Some(Self::Gender)
        } else {
            None
        }
    }
}

/// Expand every token of `template` against `args`.
pub fn expand(template: &str, args: &[&str]) -> String {
    TOKEN_REGEX
        .replace_all(template, |caps: &Captures<'_>| {
            if let Some(token) = caps.get(1) {
                positional(token.as_str(), args)
            } else {
                expression(caps.get(2).map_or("", |m| m.as_str()), args)
            }
        })
        .into_owned()
}

fn positional(token: &str, args: &[&str]) -> String {
    token[1..]
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| args.get(index))
        .map_or_else(|| token.to_string(), |arg| (*arg).to_string())
}

fn expression(inner: &str, args: &[&str]) -> String {
    let expanded = expand(inner, args);

    let selected = expanded.split_once(':').and_then(|(op, rest)| {
        let mut parts = rest.split('|');
        let subject = parts.next().unwrap_or_default();
        let forms: Vec<&str> = parts.collect();

        match Operator::parse(op)? {
            Operator::Plural => select_plural(subject, &forms),
            Operator::Gender => select_gender(subject, &forms),
        }
    });

    match selected {
        Some(form) => form.to_string(),
        None => format!("{{{{{expanded}}}}}"),
    }
}

/// `0` picks the last form; `n` picks form `min(n, forms)` (1-based).
///
/// Fractions are truncated, negatives pick the first form, and a subject
/// that is not a number selects nothing.
fn select_plural<'a>(subject: &str, forms: &[&'a str]) -> Option<&'a str> {
    let last = *forms.last()?;
    let subject = subject.trim();
    let count: f64 = if subject.is_empty() {
        0.0
    } else {
        subject.parse().ok().filter(|n: &f64| n.is_finite())?
    };

    if count == 0.0 {
        return Some(last);
    }

    let count = count.trunc();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let index = if count < 1.0 {
        1
    } else if count >= forms.len() as f64 {
        forms.len()
    } else {
        count as usize
    };

    forms.get(index - 1).copied()
}

/// `male` -> first form, `female` -> second, otherwise a non-empty third
/// form, falling back to the first.
fn select_gender<'a>(subject: &str, forms: &[&'a str]) -> Option<&'a str> {
    let male = *forms.first()?;
    let form = match Gender::parse(subject) {
        Gender::Male => male,
        Gender::Female => forms.get(1).copied().unwrap_or(male),
        Gender::Other => forms
            .get(2)
            .copied()
            .filter(|form| !form.is_empty())
            .unwrap_or(male),
    };
    Some(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use weft_common::test_utils::property_testing::{args_strategy, plain_text_strategy};

    #[test]
    fn test_positional_substitution() {
        assert_eq!(expand("Hello, $1!", &["Ada"]), "Hello, Ada!");
        assert_eq!(expand("$2 then $1", &["a", "b"]), "b then a");
        assert_eq!(expand("$10", &["x"; 10]), "x");
    }

    #[test]
    fn test_missing_positional_is_kept() {
        assert_eq!(expand("$1 and $2", &["one"]), "one and $2");
        assert_eq!(expand("$0", &["zero"]), "$0");
        assert_eq!(expand("$99999999999999999999999", &["a"]), "$99999999999999999999999");
        assert_eq!(expand("costs $ 5", &[]), "costs $ 5");
    }

    #[test]
    fn test_plural_zero_picks_last_form() {
        assert_eq!(expand("{{PLURAL:0|one|many}}", &[]), "many");
        assert_eq!(expand("{{PLURAL:0|one|two|many}}", &[]), "many");
    }

    #[test]
    fn test_plural_clamps_to_last_form() {
        for n in ["3", "4", "100"] {
            assert_eq!(expand(&format!("{{{{PLURAL:{n}|one|two}}}}"), &[]), "two");
        }
        assert_eq!(expand("{{PLURAL:1|one|two|many}}", &[]), "one");
        assert_eq!(expand("{{PLURAL:2|one|two|many}}", &[]), "two");
    }

    #[test]
    fn test_plural_with_nested_positional() {
        let template = "$1 {{PLURAL:$1|reply|replies}}";
        assert_eq!(expand(template, &["1"]), "1 reply");
        assert_eq!(expand(template, &["7"]), "7 replies");
        assert_eq!(expand(template, &["0"]), "0 replies");
    }

    #[test]
    fn test_plural_edge_subjects() {
        assert_eq!(expand("{{plural:2|a|b}}", &[]), "b");
        assert_eq!(expand("{{PLURAL:|a|b}}", &[]), "b");
        assert_eq!(expand("{{PLURAL:1.9|a|b}}", &[]), "a");
        assert_eq!(expand("{{PLURAL:-4|a|b}}", &[]), "a");
        assert_eq!(expand("{{PLURAL:lots|a|b}}", &[]), "{{PLURAL:lots|a|b}}");
        assert_eq!(expand("{{PLURAL:3}}", &[]), "{{PLURAL:3}}");
    }

    #[test]
    fn test_gender_selection() {
        assert_eq!(expand("{{GENDER:male|he|she|they}}", &[]), "he");
        assert_eq!(expand("{{GENDER:female|he|she|they}}", &[]), "she");
        assert_eq!(expand("{{GENDER:neutral|he|she|they}}", &[]), "they");
        assert_eq!(expand("{{gender:$1|he|she}}", &["robot"]), "he");
        assert_eq!(expand("{{GENDER:robot|he|she|}}", &[]), "he");
        assert_eq!(expand("{{GENDER:female|he}}", &[]), "he");
    }

    #[test]
    fn test_unknown_operator_keeps_expanded_token() {
        assert_eq!(expand("{{SHOUT:$1}}", &["hi"]), "{{SHOUT:hi}}");
        assert_eq!(expand("{{no colon $1}}", &["x"]), "{{no colon x}}");
    }

    #[test]
    fn test_expression_span_is_shortest_and_single_line() {
        assert_eq!(
            expand("{{PLURAL:1|a|b}} and {{PLURAL:2|a|b}}", &[]),
            "a and b"
        );
        assert_eq!(expand("{{PLURAL:1\n|a|b}}", &[]), "{{PLURAL:1\n|a|b}}");
        assert_eq!(expand("{{}}", &[]), "{{}}");
    }

    #[test]
    fn test_substituted_arguments_are_not_rescanned() {
        assert_eq!(expand("$1", &["$2"]), "$2");
        assert_eq!(expand("$1 $2", &["{{PLURAL:0|a|b}}", "x"]), "{{PLURAL:0|a|b}} x");
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::parse("male"), Gender::Male);
        assert_eq!(Gender::parse("female"), Gender::Female);
        assert_eq!(Gender::parse("Male"), Gender::Other);
    }

    proptest! {
        #[test]
        fn test_plain_text_is_unchanged(text in plain_text_strategy(), args in args_strategy()) {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            prop_assert_eq!(expand(&text, &args), text);
        }

        #[test]
        fn test_out_of_range_positional_is_preserved(args in args_strategy()) {
            let token = format!("${}", args.len() + 1);
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            prop_assert_eq!(expand(&token, &args), token.clone());
        }

        #[test]
        fn test_plural_never_exceeds_last_form(n in 1u32..10_000) {
            let template = format!("{{{{PLURAL:{n}|one|two|many}}}}");
            let expected = match n { 1 => "one", 2 => "two", _ => "many" };
            prop_assert_eq!(expand(&template, &[]), expected);
        }
    }
}
