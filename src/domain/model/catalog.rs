use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::book::Book;
use super::id::BookId;
use crate::domain::error::DomainError;

/// 書籍追加リクエスト
pub struct AddBookRequest {
    pub title: String,
    pub author: String,
    pub category: String,
}

/// 書籍更新リクエスト（None・空文字のフィールドは変更しない）
#[derive(Default)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
}

/// 検索対象フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    Category,
    Id,
}

impl SearchField {
    fn value_of<'a>(&self, book: &'a Book) -> &'a str {
        match self {
            SearchField::Title => book.title(),
            SearchField::Author => book.author(),
            SearchField::Category => book.category(),
            SearchField::Id => book.id().as_str(),
        }
    }
}

impl FromStr for SearchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Ok(SearchField::Title),
            "author" => Ok(SearchField::Author),
            "category" => Ok(SearchField::Category),
            "id" | "book_id" => Ok(SearchField::Id),
            other => Err(format!(
                "Unknown search field: '{other}'. Use: title, author, category, id"
            )),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchField::Title => "title",
            SearchField::Author => "author",
            SearchField::Category => "category",
            SearchField::Id => "id",
        };
        f.write_str(name)
    }
}

/// 蔵書目録 — 集約ルート。全レコード操作はここを経由する。
/// 保存ファイル上はレコードの配列そのもの。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加順の全レコード
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id() == id)
    }

    /// 次に割り当てるID。目録は変更しない。
    pub fn next_id(&self) -> BookId {
        BookId::next_after(self.books.iter().map(Book::id))
    }

    /// 書籍追加。前後の空白を除去し、タイトル・著者が空なら拒否する。
    pub fn add_book(&mut self, req: AddBookRequest) -> Result<&Book, DomainError> {
        let title = req.title.trim();
        let author = req.author.trim();
        if title.is_empty() {
            return Err(DomainError::EmptyField("title"));
        }
        if author.is_empty() {
            return Err(DomainError::EmptyField("author"));
        }

        let book = Book::new(
            self.next_id(),
            title.to_string(),
            author.to_string(),
            req.category.trim().to_string(),
        );
        self.books.push(book);
        let last = self.books.len() - 1;
        Ok(&self.books[last])
    }

    /// IDが完全一致するレコードを削除し、削除したレコードを返す。
    pub fn remove_book(&mut self, id: &BookId) -> Result<Book, DomainError> {
        let pos = self.position_of(id)?;
        Ok(self.books.remove(pos))
    }

    /// 書籍更新。指定されたフィールドのみ上書きする。
    pub fn update_book(
        &mut self,
        id: &BookId,
        req: UpdateBookRequest,
    ) -> Result<&Book, DomainError> {
        let book = self.get_mut(id)?;

        if let Some(title) = req.title.filter(|t| !is_blank(t)) {
            book.set_title(title);
        }
        if let Some(author) = req.author.filter(|a| !is_blank(a)) {
            book.set_author(author);
        }
        if let Some(category) = req.category.filter(|c| !is_blank(c)) {
            book.set_category(category);
        }

        Ok(book)
    }

    /// 大文字小文字を無視した部分一致検索。目録順で返す。
    pub fn search(&self, field: SearchField, query: &str) -> Vec<&Book> {
        let query = query.to_lowercase();
        self.books
            .iter()
            .filter(|b| field.value_of(b).to_lowercase().contains(&query))
            .collect()
    }

    /// 貸出。貸出中なら現在の借り手を含むエラーを返す。
    /// 借り手名のない貸出中レコードは貸出可能として扱う。
    pub fn borrow_book(&mut self, id: &BookId, borrower: &str) -> Result<&Book, DomainError> {
        if is_blank(borrower) {
            return Err(DomainError::EmptyField("borrower"));
        }
        let book = self.get_mut(id)?;
        if !book.is_available() {
            if let Some(current) = book.borrower() {
                return Err(DomainError::AlreadyBorrowed {
                    id: id.clone(),
                    borrower: current.to_string(),
                });
            }
        }
        book.lend_to(borrower.to_string());
        Ok(book)
    }

    /// 返却。借り手名は大文字小文字を無視して照合する。
    pub fn return_book(&mut self, id: &BookId, borrower: &str) -> Result<&Book, DomainError> {
        let book = self.get_mut(id)?;
        let current = match book.borrower() {
            Some(name) if !book.is_available() => name,
            _ => return Err(DomainError::NotBorrowed(id.clone())),
        };
        if current.to_lowercase() != borrower.to_lowercase() {
            return Err(DomainError::WrongBorrower(id.clone()));
        }
        book.take_back();
        Ok(book)
    }

    // --- Private helpers ---

    fn position_of(&self, id: &BookId) -> Result<usize, DomainError> {
        self.books
            .iter()
            .position(|b| b.id() == id)
            .ok_or_else(|| DomainError::BookNotFound(id.clone()))
    }

    fn get_mut(&mut self, id: &BookId) -> Result<&mut Book, DomainError> {
        let pos = self.position_of(id)?;
        Ok(&mut self.books[pos])
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
