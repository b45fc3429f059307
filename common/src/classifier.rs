//! 観察テキストの分類
//!
//! エラー分類とエラー影響度を、同じテキストに対して独立に判定する。
//! どのルールにも一致しない場合は Functionality / S3 – Minor。

use crate::error::Result;
use crate::rules::ClassificationRules;
use crate::types::{Category, Classification, Impact};

/// ルールベース分類器
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: ClassificationRules,
}

impl Classifier {
    pub fn new(rules: ClassificationRules) -> Self {
        Self { rules }
    }

    /// 標準ルールで構築
    pub fn standard() -> Result<Self> {
        Ok(Self::new(ClassificationRules::standard()?))
    }

    /// 分類と影響度を判定
    pub fn classify(&self, observation: &str) -> Classification {
        let lowered = observation.to_lowercase();
        Classification {
            category: self.rules.category.resolve(&lowered),
            impact: self.rules.impact.resolve(&lowered),
        }
    }

    pub fn category(&self, observation: &str) -> Category {
        self.rules.category.resolve(&observation.to_lowercase())
    }

    pub fn impact(&self, observation: &str) -> Impact {
        self.rules.impact.resolve(&observation.to_lowercase())
    }
}
