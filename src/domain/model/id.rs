use serde::{Deserialize, Serialize};
use std::fmt;

const PREFIX: &str = "BK";

/// 書籍ID（`BK001` 形式）。保存ファイル上の文字列をそのまま保持する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    /// 連番からIDを作る。3桁ゼロ埋め（1000以上はそのまま桁が増える）。
    pub fn from_number(n: u32) -> Self {
        Self(format!("{PREFIX}{n:03}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `BK` 以降の数値部分。数値として解釈できなければNone。
    pub fn number(&self) -> Option<u32> {
        self.0.strip_prefix(PREFIX)?.parse().ok()
    }

    /// 既存IDの最大番号 + 1 を返す。空なら `BK001`。
    pub fn next_after<'a>(ids: impl IntoIterator<Item = &'a BookId>) -> Self {
        let max = ids.into_iter().filter_map(BookId::number).max().unwrap_or(0);
        Self::from_number(max.saturating_add(1))
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BookId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
