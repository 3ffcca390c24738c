//! Natural ("human") ordering for file names.
//!
//! Runs of ASCII digits compare by numeric value, everything else compares
//! case-insensitively, so `"2 - intro"` sorts before `"10 - wrapup"`.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Total natural order: names that only differ in case or leading zeros fall
/// back to plain byte order so sorting stays deterministic.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_cmp_base(a, b).then_with(|| a.cmp(b))
}

fn natural_cmp_base(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let ra = digit_run(&mut a);
                let rb = digit_run(&mut b);
                let ord = compare_numeric(&ra, &rb);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(ca), Some(cb)) => {
                a.next();
                b.next();
                let ord = ca.to_lowercase().cmp(cb.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn digit_run(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

// Compares arbitrarily long digit runs without overflowing an integer type.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        v.sort_by(|a, b| natural_cmp(a, b));
        v
    }

    #[test]
    fn numeric_runs_compare_by_value() {
        assert_eq!(
            sorted(&["2.mp4", "10.mp4", "1.mp4"]),
            vec!["1.mp4", "2.mp4", "10.mp4"]
        );
        assert_eq!(natural_cmp("2 - intro", "10 - wrapup"), Ordering::Less);
    }

    #[test]
    fn letters_compare_case_insensitively() {
        assert_eq!(
            sorted(&["beta.mp4", "Alpha.mp4", "gamma.mp4"]),
            vec!["Alpha.mp4", "beta.mp4", "gamma.mp4"]
        );
    }

    #[test]
    fn leading_zeros_do_not_change_the_value() {
        assert_eq!(natural_cmp_base("007 x", "7 x"), Ordering::Equal);
        assert_eq!(
            sorted(&["Lecture 010", "Lecture 9", "Lecture 0011"]),
            vec!["Lecture 9", "Lecture 010", "Lecture 0011"]
        );
    }

    #[test]
    fn very_long_digit_runs_do_not_overflow() {
        let big = "99999999999999999999999999999999 a";
        let bigger = "100000000000000000000000000000000 a";
        assert_eq!(natural_cmp(big, bigger), Ordering::Less);
    }

    #[test]
    fn ties_fall_back_to_byte_order() {
        assert_eq!(natural_cmp("A.mp4", "a.mp4"), Ordering::Less);
        assert_eq!(natural_cmp("a.mp4", "a.mp4"), Ordering::Equal);
    }

    #[test]
    fn prefix_sorts_first() {
        assert_eq!(natural_cmp("intro", "intro 2"), Ordering::Less);
    }
}
