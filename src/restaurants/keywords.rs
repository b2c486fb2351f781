//! Preference tag -> provider search keywords.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

const FOOD_KEYWORDS: &[(&str, &[&str])] = &[
    ("spicy", &["매운", "떡볶이", "김치찌개", "마라탕", "불닭"]),
    ("mild", &["순한", "된장찌개", "미역국", "백반", "정식"]),
    ("korean", &["한식", "김치", "불고기", "갈비", "비빔밥"]),
    ("western", &["양식", "파스타", "피자", "스테이크", "햄버거"]),
    ("rice", &["밥", "덮밥", "볶음밥", "비빔밥", "정식"]),
    ("noodle", &["면", "라면", "냉면", "파스타", "우동"]),
    ("meat", &["고기", "삼겹살", "갈비", "치킨", "스테이크"]),
    ("seafood", &["해산물", "회", "조개", "새우", "게"]),
    ("hot", &["뜨거운", "찌개", "국물", "탕", "전골"]),
    ("cold", &["차가운", "냉면", "회", "샐러드", "아이스크림"]),
    ("salty", &["짠", "젓갈", "김치", "라면", "치킨"]),
    ("sweet", &["단", "디저트", "케이크", "아이스크림", "과일"]),
    ("traditional", &["전통", "한정식", "백반", "정통", "옛날"]),
    ("modern", &["모던", "퓨전", "신메뉴", "트렌드", "새로운"]),
    ("alone", &["혼밥", "1인분", "간단한", "가벼운", "테이크아웃"]),
    ("group", &["단체", "회식", "모임", "가족", "여럿이"]),
];

lazy_static! {
    static ref TAGS: HashMap<&'static str, &'static [&'static str]> =
        FOOD_KEYWORDS.iter().copied().collect();
}

/// Keywords for one tag, if the tag is known.
pub fn keywords_for(tag: &str) -> Option<&'static [&'static str]> {
    TAGS.get(tag).copied()
}

/// Keywords of every known tag in `answers`, deduplicated in first-seen order.
/// Unknown tags are ignored.
pub fn expand<S: AsRef<str>>(answers: &[S]) -> Vec<&'static str> {
    let mut seen = HashSet::new();
    answers
        .iter()
        .filter_map(|a| keywords_for(a.as_ref()))
        .flat_map(|kws| kws.iter().copied())
        .filter(|kw| seen.insert(*kw))
        .collect()
}
