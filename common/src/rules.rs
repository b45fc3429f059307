//! 分類ルール定義
//!
//! ルールは (マッチャー列, ラベル) の優先順リスト。先頭から照合し最初に一致したラベルを採用する。
//! より具体的・重大な分類を先に置く（Performance → Functionality、Critical → Minor）。

use crate::error::Result;
use crate::types::{Category, Impact};
use regex::Regex;

/// Performance: 部分一致キーワード
pub const PERFORMANCE_KEYWORDS: &[&str] = &[
    "slow",
    "crash",
    "timeout",
    "load time",
    "memory leak",
    "latency",
    "100 users",
    "under load",
];

/// Logical/Business Logic: 数値・計算式・閾値系
pub const BUSINESS_LOGIC_PATTERNS: &[&str] = &[
    "logic",
    "calculation",
    "formula",
    "90%",
    "100%",
    "wrong count",
    "chargemix",
    "incorrect picture",
    "planned chargemix",
    "liquid metal wt",
    "decimal place",
    "tapping min",
    "tapping max",
    "min max value",
    "should be between",
];

/// UX: 動作はするが使い勝手に問題があるもの
pub const UX_PATTERNS: &[&str] = &[
    "should not show",
    "better to",
    "counter-intuitive",
    "confusing",
    "too many click",
    "not similar",
    "format are not",
    "validation.*remark",
    "error remark.*display",
    "clarity",
    "filter before",
    "casting type filter",
    "before grade",
    "repeated grade",
    "fix size",
    "default.*size",
    "expand but do not",
    "no workaround",
    "every validation",
];

/// UI: 見た目・表記
pub const UI_PATTERNS: &[&str] = &[
    "fade",
    "spelling",
    "typo",
    "blurry",
    "misalign",
    "overlap",
    "color",
    "colour",
    "font",
    "icon",
    "logo",
    "pixel",
    "button.*size",
    "box size",
    "format.*date",
    "date.*format",
    "whatsapp",
    "whatapp",
    "spacing",
    "visual",
];

/// S1 – Critical: クラッシュ・利用不能
pub const CRITICAL_PATTERNS: &[&str] = &[
    "crash",
    "cannot login",
    "app.*crash",
    "system.*unusable",
    "blocker",
];

/// S2 – Major: 主要機能の失敗
pub const MAJOR_PATTERNS: &[&str] = &[
    "failed to create",
    "failed to",
    "error not a valid",
    "not a valid json",
    "wrong count",
    "incorrect picture",
    "please retry",
    "tapping min max",
    "error occured",
    "error.*remark.*not show",
    "logic recheck",
    "90%",
];

/// S4 – Low/Cosmetic: 誤字・余白・書式
pub const COSMETIC_PATTERNS: &[&str] = &[
    "fade",
    "spelling",
    "typo",
    "whatapp",
    "whatsapp",
    "2 pixels",
    "cosmetic",
    "blurry",
    "should not show.*-",
    "better to use",
    r#"use "|""#,
    "decimal place",
    "format.*not similar",
    "not similar.*format",
    "box size.*not fix",
    "repeated grade",
];

/// テキスト照合器（対象は小文字化済み）
#[derive(Debug, Clone)]
pub enum Matcher {
    /// 部分一致
    Keyword(String),
    /// 正規表現検索
    Pattern(Regex),
}

impl Matcher {
    pub fn keyword(keyword: &str) -> Self {
        Matcher::Keyword(keyword.to_string())
    }

    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(Matcher::Pattern(Regex::new(pattern)?))
    }

    pub fn is_match(&self, lowered: &str) -> bool {
        match self {
            Matcher::Keyword(k) => lowered.contains(k.as_str()),
            Matcher::Pattern(re) => re.is_match(lowered),
        }
    }
}

/// 1つのラベルに対応するマッチャー群
#[derive(Debug, Clone)]
pub struct Rule<L> {
    pub label: L,
    pub matchers: Vec<Matcher>,
}

impl<L: Copy> Rule<L> {
    pub fn keywords(label: L, keywords: &[&str]) -> Self {
        Self {
            label,
            matchers: keywords.iter().map(|k| Matcher::keyword(k)).collect(),
        }
    }

    pub fn patterns(label: L, patterns: &[&str]) -> Result<Self> {
        let matchers = patterns
            .iter()
            .map(|p| Matcher::pattern(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { label, matchers })
    }

    /// 一致したマッチャーを返す
    pub fn find_match(&self, lowered: &str) -> Option<&Matcher> {
        self.matchers.iter().find(|m| m.is_match(lowered))
    }
}

/// 優先順ルールリスト＋デフォルト
#[derive(Debug, Clone)]
pub struct RuleSet<L> {
    pub rules: Vec<Rule<L>>,
    pub fallback: L,
}

impl<L: Copy> RuleSet<L> {
    /// 最初に一致したルールのラベル（なければ fallback）
    pub fn resolve(&self, lowered: &str) -> L {
        self.rules
            .iter()
            .find(|rule| rule.find_match(lowered).is_some())
            .map(|rule| rule.label)
            .unwrap_or(self.fallback)
    }
}

/// 分類ルール一式。起動時に1回構築し、以後は不変
#[derive(Debug, Clone)]
pub struct ClassificationRules {
    pub category: RuleSet<Category>,
    pub impact: RuleSet<Impact>,
}

impl ClassificationRules {
    /// QAタクソノミーの標準ルール
    pub fn standard() -> Result<Self> {
        let category = RuleSet {
            rules: vec![
                Rule::keywords(Category::Performance, PERFORMANCE_KEYWORDS),
                Rule::patterns(Category::BusinessLogic, BUSINESS_LOGIC_PATTERNS)?,
                Rule::patterns(Category::Ux, UX_PATTERNS)?,
                Rule::patterns(Category::Ui, UI_PATTERNS)?,
            ],
            fallback: Category::Functionality,
        };

        let impact = RuleSet {
            rules: vec![
                Rule::patterns(Impact::Critical, CRITICAL_PATTERNS)?,
                Rule::patterns(Impact::Major, MAJOR_PATTERNS)?,
                Rule::patterns(Impact::Cosmetic, COSMETIC_PATTERNS)?,
            ],
            fallback: Impact::Minor,
        };

        Ok(Self { category, impact })
    }
}
