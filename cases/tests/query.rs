use iurisdata_cases::query::filter_cases;
use iurisdata_cases::query::parse_hearing_time;
use iurisdata_cases::types::CaseFields;
use iurisdata_cases::types::CaseRecord;
use pretty_assertions::assert_eq;

fn case(id: &str, date_time: &str, f: impl FnOnce(&mut CaseFields)) -> CaseRecord {
    let mut fields = CaseFields {
        date_time: date_time.to_string(),
        ..Default::default()
    };
    f(&mut fields);
    CaseRecord {
        id: id.to_string(),
        fields,
        created_at: "2024-01-01T00:00:00.000Z".to_string(),
    }
}

fn sample() -> Vec<CaseRecord> {
    vec![
        case("a", "2024-01-10T09:00", |f| {
            f.nurej = "1111".into();
            f.crime = "Estafa".into();
            f.lawyer = "Dra. Ana Quispe".into();
        }),
        case("b", "2024-03-05T14:00", |f| {
            f.nurej = "2222".into();
            f.parties = "Ministerio Público vs. LÓPEZ".into();
        }),
        case("c", "2023-12-24T08:15", |f| {
            f.case_number = "FIS-LPZ-77/2023".into();
            f.city = "Estafa City".into();
        }),
        case("d", "2024-03-05T14:00", |f| {
            f.crime = "Robo agravado".into();
        }),
    ]
}

fn ids(cases: &[CaseRecord]) -> Vec<&str> {
    cases.iter().map(|c| c.id.as_str()).collect()
}

#[test]
fn most_recent_hearing_comes_first() {
    let cases = vec![
        case("old", "2024-01-10T09:00", |f| f.nurej = "1111".into()),
        case("new", "2024-03-05T14:00", |f| f.nurej = "2222".into()),
    ];
    let view = filter_cases(&cases, "");
    assert_eq!(view[0].fields.nurej, "2222");
}

#[test]
fn empty_term_keeps_everything_sorted_descending() {
    let cases = sample();
    let view = filter_cases(&cases, "");
    assert_eq!(view.len(), cases.len());
    for pair in view.windows(2) {
        let a = parse_hearing_time(&pair[0].fields.date_time);
        let b = parse_hearing_time(&pair[1].fields.date_time);
        assert!(a >= b, "{:?} before {:?}", pair[0].id, pair[1].id);
    }
    // ties keep store order
    assert_eq!(ids(&view), vec!["b", "d", "a", "c"]);
}

#[test]
fn matching_is_case_insensitive_across_five_fields() {
    let cases = sample();
    assert_eq!(ids(&filter_cases(&cases, "estafa")), vec!["a"]);
    assert_eq!(ids(&filter_cases(&cases, "QUISPE")), vec!["a"]);
    assert_eq!(ids(&filter_cases(&cases, "lópez")), vec!["b"]);
    assert_eq!(ids(&filter_cases(&cases, "lpz-77")), vec!["c"]);
    assert_eq!(ids(&filter_cases(&cases, "ROBO")), vec!["d"]);
    assert!(filter_cases(&cases, "no such text").is_empty());
}

#[test]
fn every_result_contains_the_term() {
    let cases = sample();
    for term in ["1", "a", "2024", "vs", "z"] {
        let needle = term.to_lowercase();
        for c in filter_cases(&cases, term) {
            let f = &c.fields;
            assert!(
                [&f.nurej, &f.case_number, &f.crime, &f.lawyer, &f.parties]
                    .iter()
                    .any(|v| v.to_lowercase().contains(&needle)),
                "{} matched {term:?} without containing it",
                c.id
            );
        }
    }
}
