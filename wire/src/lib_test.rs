use super::*;
use serde_json::json;

// =============================================================
// Settings
// =============================================================

#[test]
fn settings_default_to_few_verses_fast() {
    assert_eq!(ResultCount::default(), ResultCount::Few);
    assert_eq!(ContentType::default(), ContentType::Verses);
    assert_eq!(ModelType::default(), ModelType::Fast);
}

#[test]
fn settings_parse_from_query_strings() {
    assert_eq!("many".parse::<ResultCount>().unwrap(), ResultCount::Many);
    assert_eq!("all".parse::<ContentType>().unwrap(), ContentType::All);
    assert_eq!("advanced".parse::<ModelType>().unwrap(), ModelType::Advanced);
}

#[test]
fn settings_reject_unknown_values_with_param_name() {
    let err = "lots".parse::<ResultCount>().unwrap_err();
    assert_eq!(err.to_string(), "invalid result_count: lots");
    let err = "Fast".parse::<ModelType>().unwrap_err();
    assert_eq!(err.param, "model_type");
}

#[test]
fn settings_serialize_lowercase() {
    assert_eq!(serde_json::to_value(ContentType::Passages).unwrap(), json!("passages"));
    assert_eq!(ResultCount::One.as_str(), "one");
}

// =============================================================
// Passages
// =============================================================

#[test]
fn passage_verse_deserializes_from_verse_fields() {
    let p: Passage = serde_json::from_value(json!({"book": "John", "chapter": 3, "verse": 16})).unwrap();
    assert_eq!(p, Passage::Verse { book: "John".into(), chapter: 3, verse: 16 });
    assert_eq!(p.label(), "John 3:16");
}

#[test]
fn passage_range_deserializes_from_range_fields() {
    let p: Passage = serde_json::from_value(json!({
        "book": "Jonah", "start_chapter": 2, "start_verse": 1, "end_chapter": 3, "end_verse": 4
    }))
    .unwrap();
    assert_eq!(p.book(), "Jonah");
    assert_eq!(p.label(), "Jonah 2:1-3:4");
}

#[test]
fn passage_range_within_one_chapter_has_short_label() {
    let p = Passage::VerseRange {
        book: "Esther".into(),
        start_chapter: 2,
        start_verse: 1,
        end_chapter: 2,
        end_verse: 18,
    };
    assert_eq!(p.to_string(), "Esther 2:1-18");
}

#[test]
fn passage_serializes_only_its_own_fields() {
    let p = Passage::Verse { book: "Romans".into(), chapter: 13, verse: 9 };
    assert_eq!(serde_json::to_value(&p).unwrap(), json!({"book": "Romans", "chapter": 13, "verse": 9}));
}

#[test]
fn passage_response_defaults_missing_secondary() {
    let r: PassageResponse =
        serde_json::from_value(json!({"passages": [{"book": "Mark", "chapter": 10, "verse": 19}]})).unwrap();
    assert_eq!(r.passages.len(), 1);
    assert!(r.secondary_passages.is_empty());
}

// =============================================================
// Testimonies + terms
// =============================================================

#[test]
fn testimony_response_uses_camel_case_keys() {
    let r = TestimonySearchResponse {
        search_terms: vec!["faith".into()],
        results: vec![TestimonyHit { filename: "a.docx".into(), link: String::new(), hit_count: 3 }],
    };
    let v = serde_json::to_value(&r).unwrap();
    assert_eq!(v["searchTerms"], json!(["faith"]));
    assert_eq!(v["results"][0]["hitCount"], json!(3));
}

#[test]
fn testimony_record_omits_unset_error() {
    let ok = Testimony { filename: "a.docx".into(), content: "joy".into(), ..Testimony::default() };
    let line = serde_json::to_value(&ok).unwrap();
    assert_eq!(line, json!({"filename": "a.docx", "content": "joy", "link": "", "all_links": []}));

    let failed = Testimony { error: Some("bad zip".into()), ..Testimony::default() };
    assert_eq!(serde_json::to_value(&failed).unwrap()["error"], json!("bad zip"));
}

#[test]
fn testimony_record_tolerates_missing_fields() {
    let t: Testimony = serde_json::from_value(json!({"filename": "b.docx"})).unwrap();
    assert_eq!(t, Testimony { filename: "b.docx".into(), ..Testimony::default() });
}

#[test]
fn suggest_result_tolerates_missing_lists() {
    let r: TermSuggestResult = serde_json::from_value(json!({"queryTerms": [{"term": "joy"}]})).unwrap();
    assert_eq!(r.query_terms, vec![EnrichedTerm::new("joy", vec![])]);
    assert!(r.suggestions.is_empty());
    assert!(!r.is_empty());
    assert!(TermSuggestResult::default().is_empty());
}

#[test]
fn split_terms_trims_and_drops_empty_segments() {
    assert_eq!(split_terms("joy, peace,, hope"), vec!["joy", "peace", "hope"]);
    assert_eq!(split_terms("  ,  , "), Vec::<String>::new());
    assert_eq!(split_terms("car accident"), vec!["car accident"]);
}

#[test]
fn term_key_folds_case() {
    assert_eq!(term_key("Faith"), term_key("fAITH"));
}
