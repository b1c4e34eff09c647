//! Keyword lookup tables used by the field scorers.
//!
//! Every table is plain data: adding a category or a keyword never touches
//! scoring code. Values are lower-cased before lookup, so keywords must be
//! lower-case too. CJK keywords match anywhere in the text; ASCII keywords
//! must stand on word boundaries, so "park" does not match "parking".

use serde::{Deserialize, Serialize};

/// A named set of keywords. Text belongs to the group when it contains any
/// of the keywords (see [`contains_keyword`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordGroup {
    pub name: String,
    pub keywords: Vec<String>,
}

impl KeywordGroup {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
        }
    }

    /// `text` is expected to be lower-cased already.
    pub fn matches(&self, text: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| contains_keyword(text, keyword))
    }
}

/// Substring test for CJK keywords, whole-word test for ASCII ones.
pub fn contains_keyword(text: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    if !keyword.is_ascii() {
        return text.contains(keyword);
    }
    text.match_indices(keyword).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + keyword.len()..].chars().next();
        !before.is_some_and(|c| c.is_ascii_alphanumeric())
            && !after.is_some_and(|c| c.is_ascii_alphanumeric())
    })
}

/// True when some group in `groups` claims both values.
pub fn share_group(groups: &[KeywordGroup], a: &str, b: &str) -> bool {
    groups.iter().any(|group| group.matches(a) && group.matches(b))
}

/// Name of the first group claiming `text`.
pub fn first_group<'a>(groups: &'a [KeywordGroup], text: &str) -> Option<&'a str> {
    groups
        .iter()
        .find(|group| group.matches(text))
        .map(|group| group.name.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTables {
    pub activity_categories: Vec<KeywordGroup>,
    pub areas: Vec<KeywordGroup>,
    pub places: Vec<KeywordGroup>,
    /// Ordered; the first period found in a time description wins.
    pub periods: Vec<KeywordGroup>,
    /// Ordered; the first class found wins. The class named
    /// [`WEEKEND`](Self::WEEKEND) is the weekend class.
    pub day_classes: Vec<KeywordGroup>,
    pub description_keywords: Vec<String>,
}

impl KeywordTables {
    pub const WEEKEND: &'static str = "weekend";

    pub fn builtin() -> Self {
        Self {
            activity_categories: vec![
                KeywordGroup::new(
                    "sports",
                    &[
                        "羽毛球", "篮球", "足球", "乒乓球", "网球", "游泳", "跑步", "健身", "瑜伽",
                        "badminton", "basketball", "football", "soccer", "ping pong",
                        "tennis", "swimming", "running", "fitness", "yoga",
                    ],
                ),
                KeywordGroup::new(
                    "entertainment",
                    &[
                        "电影", "ktv", "游戏", "桌游", "剧本杀", "密室", "movie", "film",
                        "karaoke", "game", "escape room", "murder mystery",
                    ],
                ),
                KeywordGroup::new(
                    "study",
                    &[
                        "学习", "读书", "讲座", "培训", "课程", "study", "reading", "lecture",
                        "training", "course",
                    ],
                ),
                KeywordGroup::new(
                    "dining",
                    &[
                        "吃饭", "聚餐", "火锅", "烧烤", "咖啡", "下午茶", "dinner", "lunch",
                        "hotpot", "barbecue", "bbq", "coffee", "afternoon tea",
                    ],
                ),
            ],
            areas: vec![
                KeywordGroup::new(
                    "city-center",
                    &["市中心", "中心", "商业区", "cbd", "downtown", "city center"],
                ),
                KeywordGroup::new(
                    "campus",
                    &[
                        "大学城", "学校", "校园", "大学", "学院", "campus", "university",
                        "college", "school",
                    ],
                ),
                KeywordGroup::new(
                    "sports-venue",
                    &[
                        "体育中心", "体育馆", "体育场", "运动场", "球场", "sports center",
                        "stadium", "arena",
                    ],
                ),
                KeywordGroup::new(
                    "shopping",
                    &["购物中心", "商场", "购物广场", "mall", "shopping"],
                ),
                KeywordGroup::new(
                    "park",
                    &["公园", "绿地", "广场", "花园", "park", "garden", "plaza"],
                ),
                KeywordGroup::new(
                    "transit-hub",
                    &[
                        "火车站", "地铁站", "机场", "汽车站", "高铁站", "station", "airport",
                    ],
                ),
                KeywordGroup::new(
                    "residential",
                    &["小区", "社区", "住宅", "居民区", "neighborhood", "residential"],
                ),
            ],
            places: vec![
                KeywordGroup::new("交通大学", &["交通大学", "交大", "sjtu"]),
                KeywordGroup::new("复旦大学", &["复旦大学", "复旦", "fudan"]),
                KeywordGroup::new("同济大学", &["同济大学", "同济", "tongji"]),
                KeywordGroup::new("华东师范大学", &["华东师范大学", "华师大", "ecnu"]),
                KeywordGroup::new("上海大学", &["上海大学", "上大", "shu"]),
                KeywordGroup::new("gymnasium", &["体育馆", "体育场", "运动场", "gymnasium"]),
                KeywordGroup::new(
                    "badminton-court",
                    &["羽毛球场", "羽毛球馆", "羽毛球", "badminton"],
                ),
                KeywordGroup::new(
                    "basketball-court",
                    &["篮球场", "篮球馆", "篮球", "basketball"],
                ),
                KeywordGroup::new(
                    "football-field",
                    &["足球场", "足球馆", "足球", "football", "soccer"],
                ),
                KeywordGroup::new(
                    "pool",
                    &["游泳馆", "游泳池", "游泳", "swimming", "pool"],
                ),
                KeywordGroup::new("gym", &["健身房", "健身中心", "健身", "gym", "fitness"]),
            ],
            periods: vec![
                KeywordGroup::new("morning", &["早上", "上午", "早晨", "早", "morning"]),
                KeywordGroup::new("afternoon", &["下午", "午后", "afternoon"]),
                KeywordGroup::new("evening", &["晚上", "夜晚", "夜", "evening", "night"]),
            ],
            day_classes: vec![
                KeywordGroup::new(
                    Self::WEEKEND,
                    &[
                        "周末", "周六", "周日", "星期六", "星期日", "weekend", "weekends",
                        "saturday", "sunday",
                    ],
                ),
                KeywordGroup::new(
                    "weekday",
                    &[
                        "工作日", "周一", "周二", "周三", "周四", "周五", "星期一到星期五",
                        "weekday", "weekdays", "workday", "monday", "tuesday", "wednesday", "thursday",
                        "friday",
                    ],
                ),
            ],
            description_keywords: [
                "新手", "初学者", "高手", "专业", "休闲", "娱乐", "锻炼", "减肥", "交友",
                "beginner", "novice", "expert", "professional", "casual", "fun",
                "exercise", "fitness", "weight loss", "socializing", "make friends",
            ]
            .iter()
            .map(|keyword| keyword.to_string())
            .collect(),
        }
    }
}
