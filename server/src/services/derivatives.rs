//! Morphological derivatives for search terms.
//!
//! DESIGN
//! ======
//! Rule-based English inflection of a term's last word. Irregular words are
//! looked up in a table of form groups (any member yields the others);
//! everything else gets a plural, a present participle and a past form.
//! Derivatives never repeat the input or each other (case-insensitive).

#[cfg(test)]
#[path = "derivatives_test.rs"]
mod tests;

use std::collections::HashSet;

const MIN_WORD_LEN: usize = 3;

/// Groups of inflections of one lemma, lemma first.
const IRREGULAR: &[&[&str]] = &[
    &["run", "runs", "running", "ran"],
    &["go", "goes", "going", "went", "gone"],
    &["be", "is", "are", "was", "were", "been", "being"],
    &["have", "has", "having", "had"],
    &["do", "does", "doing", "did", "done"],
    &["die", "dies", "dying", "died"],
    &["lie", "lies", "lying", "lay", "lain"],
    &["give", "gives", "giving", "gave", "given"],
    &["forgive", "forgives", "forgiving", "forgave", "forgiven"],
    &["take", "takes", "taking", "took", "taken"],
    &["come", "comes", "coming", "came"],
    &["see", "sees", "seeing", "saw", "seen"],
    &["speak", "speaks", "speaking", "spoke", "spoken"],
    &["know", "knows", "knowing", "knew", "known"],
    &["rise", "rises", "rising", "rose", "risen"],
    &["fall", "falls", "falling", "fell", "fallen"],
    &["bring", "brings", "bringing", "brought"],
    &["teach", "teaches", "teaching", "taught"],
    &["seek", "seeks", "seeking", "sought"],
    &["fight", "fights", "fighting", "fought"],
    &["find", "finds", "finding", "found"],
    &["lose", "loses", "losing", "lost"],
    &["pay", "pays", "paying", "paid"],
    &["say", "says", "saying", "said"],
    &["eat", "eats", "eating", "ate", "eaten"],
    &["drink", "drinks", "drinking", "drank", "drunk"],
    &["begin", "begins", "beginning", "began", "begun"],
    &["sing", "sings", "singing", "sang", "sung"],
    &["write", "writes", "writing", "wrote", "written"],
    &["drive", "drives", "driving", "drove", "driven"],
    &["hear", "hears", "hearing", "heard"],
    &["feel", "feels", "feeling", "felt"],
    &["keep", "keeps", "keeping", "kept"],
    &["leave", "leaves", "leaving", "left"],
    &["sleep", "sleeps", "sleeping", "slept"],
    &["weep", "weeps", "weeping", "wept"],
    &["hold", "holds", "holding", "held"],
    &["stand", "stands", "standing", "stood"],
    &["tell", "tells", "telling", "told"],
    &["think", "thinks", "thinking", "thought"],
    &["build", "builds", "building", "built"],
    &["send", "sends", "sending", "sent"],
    &["make", "makes", "making", "made"],
    &["child", "children"],
    &["man", "men"],
    &["woman", "women"],
    &["person", "people"],
    &["mouse", "mice"],
    &["tooth", "teeth"],
    &["foot", "feet"],
    &["life", "lives"],
    &["wife", "wives"],
    &["knife", "knives"],
    &["leaf", "leaves"],
];

/// Inflected variants of `term`. Multi-word terms inflect only the last
/// word and keep their prefix.
#[must_use]
pub fn generate_derivatives(term: &str) -> Vec<String> {
    let term = term.trim();
    if term.chars().any(|c| c.is_ascii_digit()) {
        return Vec::new();
    }
    let (prefix, word) = term
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(("", term), |(idx, c)| term.split_at(idx + c.len_utf8()));
    if word.chars().count() < MIN_WORD_LEN || !word.chars().all(char::is_alphabetic) {
        return Vec::new();
    }

    let lower = word.to_lowercase();
    let forms = irregular_forms(&lower).unwrap_or_else(|| regular_forms(&lower));

    let mut seen = HashSet::from([term.to_lowercase()]);
    forms
        .into_iter()
        .map(|form| format!("{prefix}{}", match_case(&form, word)))
        .filter(|candidate| seen.insert(candidate.to_lowercase()))
        .collect()
}

fn irregular_forms(lower: &str) -> Option<Vec<String>> {
    IRREGULAR
        .iter()
        .find(|group| group.contains(&lower))
        .map(|group| {
            group
                .iter()
                .filter(|form| **form != lower)
                .map(|form| (*form).to_string())
                .collect()
        })
}

fn regular_forms(w: &str) -> Vec<String> {
    if w.ends_with("ing") {
        return vec![format!("{w}s")];
    }
    if w.ends_with("ed") || is_plural(w) {
        return Vec::new();
    }
    vec![plural(w), participle(w), past(w)]
}

fn is_plural(w: &str) -> bool {
    w.ends_with('s') && !(w.ends_with("ss") || w.ends_with("us") || w.ends_with("is"))
}

fn plural(w: &str) -> String {
    if ["s", "x", "z", "ch", "sh"].iter().any(|end| w.ends_with(end)) {
        format!("{w}es")
    } else if let Some(stem) = consonant_y_stem(w) {
        format!("{stem}ies")
    } else {
        format!("{w}s")
    }
}

fn participle(w: &str) -> String {
    if let Some(stem) = w.strip_suffix("ie") {
        format!("{stem}ying")
    } else if let Some(stem) = silent_e_stem(w) {
        format!("{stem}ing")
    } else if let Some(last) = doubled_final(w) {
        format!("{w}{last}ing")
    } else {
        format!("{w}ing")
    }
}

fn past(w: &str) -> String {
    if w.ends_with('e') {
        format!("{w}d")
    } else if let Some(stem) = consonant_y_stem(w) {
        format!("{stem}ied")
    } else if let Some(last) = doubled_final(w) {
        format!("{w}{last}ed")
    } else {
        format!("{w}ed")
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// `cry` -> `cr`; `pray` -> `None`.
fn consonant_y_stem(w: &str) -> Option<&str> {
    let stem = w.strip_suffix('y')?;
    let before = stem.chars().last()?;
    (!is_vowel(before)).then_some(stem)
}

/// `hope` -> `hop`; `see`, `free` keep their `e`.
fn silent_e_stem(w: &str) -> Option<&str> {
    let stem = w.strip_suffix('e')?;
    let before = stem.chars().last()?;
    (!matches!(before, 'e' | 'o' | 'y')).then_some(stem)
}

/// Final consonant to double for single-syllable consonant-vowel-consonant
/// words (`stop` -> `p`).
fn doubled_final(w: &str) -> Option<char> {
    let chars: Vec<char> = w.chars().collect();
    let [.., a, b, c] = chars.as_slice() else {
        return None;
    };
    let cvc = !is_vowel(*a) && is_vowel(*b) && !is_vowel(*c) && !matches!(c, 'w' | 'x' | 'y');
    (cvc && vowel_groups(&chars) == 1).then_some(*c)
}

fn vowel_groups(chars: &[char]) -> usize {
    let mut groups = 0;
    let mut in_group = false;
    for &c in chars {
        let vowel = is_vowel(c);
        if vowel && !in_group {
            groups += 1;
        }
        in_group = vowel;
    }
    groups
}

/// Apply the capitalization pattern of `like` to a lowercase `form`.
fn match_case(form: &str, like: &str) -> String {
    let mut chars = like.chars();
    let first_upper = chars.next().is_some_and(char::is_uppercase);
    if first_upper && chars.clone().count() > 0 && chars.all(char::is_uppercase) {
        return form.to_uppercase();
    }
    if first_upper {
        let mut out = form.chars();
        return match out.next() {
            Some(first) => first.to_uppercase().chain(out).collect(),
            None => String::new(),
        };
    }
    form.to_string()
}
