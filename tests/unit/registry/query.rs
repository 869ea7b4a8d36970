use super::*;

fn meta(id: &str, name: &str, category: Category, difficulty: Difficulty) -> AnimationMetadata {
    AnimationMetadata::new(id, name, "", category, difficulty)
}

fn ids(list: &[AnimationMetadata]) -> Vec<&str> {
    list.iter().map(|m| m.id.as_str()).collect()
}

#[test]
fn difficulty_sorts_ordinally_not_alphabetically() {
    let mut list = vec![
        meta("h", "H", Category::Waves, Difficulty::Hard),
        meta("e", "E", Category::Waves, Difficulty::Easy),
        meta("m", "M", Category::Waves, Difficulty::Medium),
    ];
    sort_metadata(&mut list, SortOptions::new(SortBy::Difficulty, SortOrder::Asc));
    assert_eq!(ids(&list), ["e", "m", "h"]);
    sort_metadata(&mut list, SortOptions::new(SortBy::Difficulty, SortOrder::Desc));
    assert_eq!(ids(&list), ["h", "m", "e"]);
}

#[test]
fn sort_is_stable_for_equal_keys() {
    let mut list = vec![
        meta("a", "A", Category::Text, Difficulty::Easy),
        meta("b", "B", Category::Particles, Difficulty::Easy),
        meta("c", "C", Category::Text, Difficulty::Easy),
        meta("d", "D", Category::Particles, Difficulty::Easy),
    ];
    sort_metadata(&mut list, SortOptions::new(SortBy::Category, SortOrder::Asc));
    assert_eq!(ids(&list), ["b", "d", "a", "c"]);
    sort_metadata(&mut list, SortOptions::new(SortBy::Difficulty, SortOrder::Desc));
    assert_eq!(ids(&list), ["b", "d", "a", "c"]);
}

#[test]
fn name_sort_ignores_case() {
    let mut list = vec![
        meta("1", "beta", Category::Text, Difficulty::Easy),
        meta("2", "Alpha", Category::Text, Difficulty::Easy),
        meta("3", "Gamma", Category::Text, Difficulty::Easy),
    ];
    sort_metadata(&mut list, SortOptions::default());
    assert_eq!(ids(&list), ["2", "1", "3"]);
}

#[test]
fn date_sort_leaves_undated_entries_in_place() {
    let mut list = vec![
        meta("late", "L", Category::Text, Difficulty::Easy).with_dates("2024-05-01", "2024-06-01"),
        meta("none", "N", Category::Text, Difficulty::Easy),
        meta("early", "E", Category::Text, Difficulty::Easy).with_dates("2023-01-01", "2024-07-01"),
    ];
    sort_metadata(&mut list, SortOptions::new(SortBy::CreatedAt, SortOrder::Asc));
    assert_eq!(ids(&list), ["early", "none", "late"]);
    sort_metadata(&mut list, SortOptions::new(SortBy::UpdatedAt, SortOrder::Desc));
    assert_eq!(ids(&list), ["early", "none", "late"]);
    sort_metadata(&mut list, SortOptions::new(SortBy::UpdatedAt, SortOrder::Asc));
    assert_eq!(ids(&list), ["late", "none", "early"]);
}

#[test]
fn filter_combines_fields_with_and_and_tags_with_or() {
    let a = meta("a", "Aurora", Category::Waves, Difficulty::Easy).with_tags(&["calm", "color"]);
    let b = meta("b", "Bars", Category::Glitch, Difficulty::Hard).with_tags(&["loud"]);

    let by_tags = FilterCriteria {
        tags: vec!["LOUD".to_owned(), "calm".to_owned()],
        ..FilterCriteria::default()
    };
    assert!(by_tags.matches(&a) && by_tags.matches(&b));

    let narrowed = FilterCriteria {
        category: Some(Category::Waves),
        ..by_tags.clone()
    };
    assert!(narrowed.matches(&a) && !narrowed.matches(&b));

    let searched = FilterCriteria {
        search: Some("  AUR ".to_owned()),
        difficulty: Some(Difficulty::Hard),
        ..FilterCriteria::default()
    };
    assert!(!searched.matches(&a) && !searched.matches(&b));

    assert!(FilterCriteria::default().matches(&a));
}

#[test]
fn sort_options_deserialize_from_camel_case() {
    let opts: SortOptions =
        serde_json::from_str(r#"{"by":"createdAt","order":"desc"}"#).unwrap();
    assert_eq!(opts, SortOptions::new(SortBy::CreatedAt, SortOrder::Desc));
}
