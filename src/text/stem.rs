//! Porter suffix-stripping stemmer.
//!
//! Implements the rules of Porter (1980), "An algorithm for suffix stripping",
//! including the `bli` and `logi` revisions of the reference C release. Words are
//! lowercased first; words of two characters or fewer, and words containing
//! non-ASCII characters, are returned lowercased but otherwise unchanged.

/// Step 2 rules as `(suffix, replacement)`, grouped by penultimate letter.
const STEP2_RULES: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("bli", "ble"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
    ("logi", "log"),
];

const STEP3_RULES: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

/// Step 4 suffixes, longest first within each penultimate-letter group.
const STEP4_SUFFIXES: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

/// Reduce a single word to its Porter stem.
pub fn stem(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.len() <= 2 || !lower.is_ascii() {
        return lower;
    }
    let mut w = lower.into_bytes();
    step1a(&mut w);
    step1b(&mut w);
    step1c(&mut w);
    step2(&mut w);
    step3(&mut w);
    step4(&mut w);
    step5(&mut w);
    // Only ASCII bytes are ever written back.
    w.into_iter().map(char::from).collect()
}

/// Split normalized text on whitespace and stem each token.
pub fn tokenize_and_stem(text: &str) -> Vec<String> {
    text.split_whitespace().map(stem).collect()
}

fn is_consonant(w: &[u8], i: usize) -> bool {
    match w[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(w, i - 1),
        _ => true,
    }
}

/// Number of vowel-consonant sequences in `w`, the `m` of `[C](VC){m}[V]`.
fn measure(w: &[u8]) -> usize {
    (1..w.len())
        .filter(|&i| !is_consonant(w, i - 1) && is_consonant(w, i))
        .count()
}

fn has_vowel(w: &[u8]) -> bool {
    (0..w.len()).any(|i| !is_consonant(w, i))
}

fn ends_double_consonant(w: &[u8]) -> bool {
    let n = w.len();
    n >= 2 && w[n - 1] == w[n - 2] && is_consonant(w, n - 1)
}

/// Consonant-vowel-consonant ending where the last consonant is not w, x or y.
fn ends_cvc(w: &[u8]) -> bool {
    let n = w.len();
    n >= 3
        && is_consonant(w, n - 1)
        && !is_consonant(w, n - 2)
        && is_consonant(w, n - 3)
        && !matches!(w[n - 1], b'w' | b'x' | b'y')
}

fn stem_len(w: &[u8], suffix: &str) -> Option<usize> {
    w.ends_with(suffix.as_bytes())
        .then(|| w.len() - suffix.len())
}

fn replace_tail(w: &mut Vec<u8>, keep: usize, replacement: &str) {
    w.truncate(keep);
    w.extend_from_slice(replacement.as_bytes());
}

fn step1a(w: &mut Vec<u8>) {
    if w.ends_with(b"sses") || w.ends_with(b"ies") {
        w.truncate(w.len() - 2);
    } else if w.ends_with(b"s") && !w.ends_with(b"ss") {
        w.pop();
    }
}

fn step1b(w: &mut Vec<u8>) {
    if let Some(keep) = stem_len(w, "eed") {
        if measure(&w[..keep]) > 0 {
            w.pop();
        }
        return;
    }
    let keep = match stem_len(w, "ed").or_else(|| stem_len(w, "ing")) {
        Some(keep) if has_vowel(&w[..keep]) => keep,
        _ => return,
    };
    w.truncate(keep);
    if w.ends_with(b"at") || w.ends_with(b"bl") || w.ends_with(b"iz") {
        w.push(b'e');
    } else if ends_double_consonant(w) {
        if !matches!(w.last(), Some(b'l' | b's' | b'z')) {
            w.pop();
        }
    } else if measure(w) == 1 && ends_cvc(w) {
        w.push(b'e');
    }
}

fn step1c(w: &mut [u8]) {
    let n = w.len();
    if w.ends_with(b"y") && has_vowel(&w[..n - 1]) {
        w[n - 1] = b'i';
    }
}

/// Apply the first rule whose suffix matches, if its stem has `m > 0`.
fn apply_first_rule(w: &mut Vec<u8>, rules: &[(&str, &str)]) {
    let word: &[u8] = w;
    let matched = rules
        .iter()
        .find_map(|(suffix, replacement)| stem_len(word, suffix).map(|keep| (keep, *replacement)));
    if let Some((keep, replacement)) = matched
        && measure(&w[..keep]) > 0
    {
        replace_tail(w, keep, replacement);
    }
}

fn step2(w: &mut Vec<u8>) {
    apply_first_rule(w, STEP2_RULES);
}

fn step3(w: &mut Vec<u8>) {
    apply_first_rule(w, STEP3_RULES);
}

fn step4(w: &mut Vec<u8>) {
    let word: &[u8] = w;
    let matched = STEP4_SUFFIXES.iter().find_map(|suffix| {
        let keep = stem_len(word, suffix)?;
        if *suffix == "ion" && !matches!(keep.checked_sub(1).map(|i| word[i]), Some(b's' | b't')) {
            return None;
        }
        Some(keep)
    });
    if let Some(keep) = matched
        && measure(&w[..keep]) > 1
    {
        w.truncate(keep);
    }
}

fn step5(w: &mut Vec<u8>) {
    if w.ends_with(b"e") {
        let stem = &w[..w.len() - 1];
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            w.pop();
        }
    }
    if w.ends_with(b"ll") && measure(w) > 1 {
        w.pop();
    }
}
