//! データセットスクリプトのパーサー
//!
//! data.js に埋め込まれた `const REPORT_DATA = [...];` などの定数から
//! JSON部分を取り出してパースする。

use crate::error::{Error, Result};
use crate::types::ObservationRecord;
use regex::Regex;
use serde::de::DeserializeOwned;

/// ヘッダー定数名
pub const HEADERS_CONST: &str = "REPORT_HEADERS";
/// レコード定数名
pub const DATA_CONST: &str = "REPORT_DATA";

/// `const NAME = <JSON>;` の JSON 値をパース
///
/// 定数宣言の直後から1つ分のJSON値だけを読み取るため、
/// 文字列中の `];` などに影響されない。
///
/// # Arguments
/// * `content` - スクリプト全体
/// * `name` - 定数名
///
/// # Returns
/// * `Ok(T)` - パース成功
/// * `Err(Error::Parse)` - 定数が見つからないかJSONが壊れている
pub fn parse_constant<T: DeserializeOwned>(content: &str, name: &str) -> Result<T> {
    let declaration = Regex::new(&format!(r"\bconst\s+{}\s*=\s*", regex::escape(name)))?;
    let start = declaration
        .find(content)
        .map(|m| m.end())
        .ok_or_else(|| Error::Parse(format!("{}が見つかりません", name)))?;

    let mut stream = serde_json::Deserializer::from_str(&content[start..]).into_iter::<T>();
    match stream.next() {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(Error::Parse(format!("{} JSONパースエラー: {}", name, e))),
        None => Err(Error::Parse(format!("{}の値がありません", name))),
    }
}

/// REPORT_DATA を読み込む
pub fn parse_report_data(content: &str) -> Result<Vec<ObservationRecord>> {
    parse_constant(content, DATA_CONST)
}
