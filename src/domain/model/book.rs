use serde::{Deserialize, Serialize};

use super::id::BookId;

/// 蔵書レコード。Catalogが所有し、Catalogを通じて操作する。
///
/// フィールド名は既存データファイル（`book_id`, `is_available`）と互換。
/// 貸出可能な本の `borrower` は `null` として書き出す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "book_id")]
    id: BookId,
    title: String,
    author: String,
    category: String,
    #[serde(rename = "is_available")]
    available: bool,
    #[serde(default)]
    borrower: Option<String>,
}

impl Book {
    pub(crate) fn new(id: BookId, title: String, author: String, category: String) -> Self {
        Self {
            id,
            title,
            author,
            category,
            available: true,
            borrower: None,
        }
    }

    pub fn id(&self) -> &BookId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// 借り手名。空文字は未設定と同じ扱い。
    pub fn borrower(&self) -> Option<&str> {
        self.borrower.as_deref().filter(|b| !b.is_empty())
    }

    // --- 内部操作（Catalog経由でのみ呼ばれる） ---

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub(crate) fn set_author(&mut self, author: String) {
        self.author = author;
    }

    pub(crate) fn set_category(&mut self, category: String) {
        self.category = category;
    }

    pub(crate) fn lend_to(&mut self, borrower: String) {
        self.available = false;
        self.borrower = Some(borrower);
    }

    pub(crate) fn take_back(&mut self) {
        self.available = true;
        self.borrower = None;
    }
}
