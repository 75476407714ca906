use super::*;

fn forms(term: &str) -> Vec<String> {
    generate_derivatives(term)
}

#[test]
fn irregular_group_yields_other_members() {
    assert_eq!(forms("run"), vec!["runs", "running", "ran"]);
    assert_eq!(forms("went"), vec!["go", "goes", "going", "gone"]);
    assert_eq!(forms("children"), vec!["child"]);
}

#[test]
fn regular_verb_forms() {
    assert_eq!(forms("pray"), vec!["prays", "praying", "prayed"]);
    assert_eq!(forms("heal"), vec!["heals", "healing", "healed"]);
    assert_eq!(forms("visit"), vec!["visits", "visiting", "visited"]);
}

#[test]
fn silent_e_is_dropped_before_ing() {
    assert_eq!(forms("hope"), vec!["hopes", "hoping", "hoped"]);
    assert_eq!(forms("free"), vec!["frees", "freeing", "freed"]);
}

#[test]
fn short_cvc_doubles_final_consonant() {
    assert_eq!(forms("stop"), vec!["stops", "stopping", "stopped"]);
    assert_eq!(forms("sin"), vec!["sins", "sinning", "sinned"]);
}

#[test]
fn consonant_y_and_sibilant_endings() {
    assert_eq!(forms("cry"), vec!["cries", "crying", "cried"]);
    assert_eq!(forms("church"), vec!["churches", "churching", "churched"]);
    assert_eq!(forms("cross"), vec!["crosses", "crossing", "crossed"]);
}

#[test]
fn already_inflected_words() {
    assert_eq!(forms("healing"), vec!["healings"]);
    assert!(forms("prayed").is_empty());
    assert!(forms("miracles").is_empty());
}

#[test]
fn multi_word_terms_inflect_last_word() {
    assert_eq!(forms("car accident"), vec!["car accidents", "car accidenting", "car accidented"]);
    assert_eq!(forms("bone marrow"), vec!["bone marrows", "bone marrowing", "bone marrowed"]);
}

#[test]
fn multibyte_whitespace_separates_words() {
    assert_eq!(forms("faith\u{a0}healing"), vec!["faith\u{a0}healings"]);
    assert_eq!(forms("faith\u{3000}hope"), vec!["faith\u{3000}hopes", "faith\u{3000}hoping", "faith\u{3000}hoped"]);
}

#[test]
fn capitalization_follows_input() {
    assert_eq!(forms("Faith"), vec!["Faiths", "Faithing", "Faithed"]);
    assert_eq!(forms("RUN"), vec!["RUNS", "RUNNING", "RAN"]);
}

#[test]
fn short_or_numeric_terms_have_none() {
    assert!(forms("go").is_empty());
    assert!(forms("to be").is_empty());
    assert!(forms("covid19").is_empty());
    assert!(forms("psalm 23").is_empty());
    assert!(forms("   ").is_empty());
}

#[test]
fn never_returns_input_or_duplicates() {
    for term in ["run", "leaves", "lay", "Faith", "cross"] {
        let out = forms(term);
        let mut keys: Vec<String> = out.iter().map(|f| f.to_lowercase()).collect();
        assert!(!keys.contains(&term.to_lowercase()), "{term} echoed");
        let before = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), before, "{term} produced duplicates");
    }
}
