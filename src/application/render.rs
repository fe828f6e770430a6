//! Text rendering of book records, shared by the MCP tools and the menu.

use crate::domain::model::book::Book;

const RULE_WIDTH: usize = 50;

/// 1レコードを罫線で囲んだテキストブロックに変換する。
pub fn render_book(book: &Book) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let status = match book.borrower() {
        Some(name) if !book.is_available() => format!("Borrowed by {name}"),
        _ if !book.is_available() => "Borrowed".to_string(),
        _ => "Available".to_string(),
    };

    format!(
        "{rule}\n\
         Book ID: {}\n\
         Title: {}\n\
         Author: {}\n\
         Category: {}\n\
         Status: {status}\n\
         {rule}\n",
        book.id(),
        book.title(),
        book.author(),
        book.category(),
    )
}

/// 複数レコードを空行区切りで連結する。
pub fn render_books<'a>(books: impl IntoIterator<Item = &'a Book>) -> String {
    books
        .into_iter()
        .map(render_book)
        .collect::<Vec<_>>()
        .join("\n")
}
