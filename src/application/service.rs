use crate::domain::error::DomainError;
use crate::domain::model::book::Book;
use crate::domain::model::catalog::{AddBookRequest, Catalog, SearchField, UpdateBookRequest};
use crate::domain::model::id::BookId;
use crate::domain::repository::CatalogRepository;

use super::error::AppError;

/// 蔵書目録に対するユースケース。
/// 起動時に一度だけloadし、以降はメモリ上の目録を操作して変更ごとにsaveする。
/// saveに失敗した場合、メモリ上の目録は呼び出し前のまま残る。
pub struct LibraryService<R: CatalogRepository> {
    repo: R,
    catalog: Catalog,
}

impl<R: CatalogRepository> LibraryService<R> {
    /// 保存済みの目録を読み込んでサービスを作る。
    pub fn open(repo: R) -> Result<Self, AppError> {
        let catalog = repo.load().map_err(|e| AppError::Storage(Box::new(e)))?;
        Ok(Self { repo, catalog })
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// 次に割り当てられるID。
    pub fn next_id(&self) -> BookId {
        self.catalog.next_id()
    }

    /// 書籍を追加する。
    pub fn add_book(&mut self, req: AddBookRequest) -> Result<Book, AppError> {
        let book = self.commit(|c| c.add_book(req).cloned())?;
        tracing::info!(book_id = %book.id(), title = book.title(), "book added");
        Ok(book)
    }

    /// 書籍を削除する。
    pub fn delete_book(&mut self, id: &BookId) -> Result<Book, AppError> {
        let book = self.commit(|c| c.remove_book(id))?;
        tracing::info!(book_id = %id, "book deleted");
        Ok(book)
    }

    /// 書籍を更新する。
    pub fn modify_book(&mut self, id: &BookId, req: UpdateBookRequest) -> Result<Book, AppError> {
        let book = self.commit(|c| c.update_book(id, req).cloned())?;
        tracing::info!(book_id = %id, "book modified");
        Ok(book)
    }

    pub fn get_book(&self, id: &BookId) -> Result<&Book, AppError> {
        self.catalog
            .get(id)
            .ok_or_else(|| DomainError::BookNotFound(id.clone()).into())
    }

    pub fn search(&self, field: SearchField, query: &str) -> Vec<&Book> {
        self.catalog.search(field, query)
    }

    pub fn list_all(&self) -> &[Book] {
        self.catalog.books()
    }

    /// 書籍を貸し出す。
    pub fn borrow_book(&mut self, id: &BookId, borrower: &str) -> Result<Book, AppError> {
        let book = self.commit(|c| c.borrow_book(id, borrower).cloned())?;
        tracing::info!(book_id = %id, borrower, "book borrowed");
        Ok(book)
    }

    /// 書籍を返却する。
    pub fn return_book(&mut self, id: &BookId, borrower: &str) -> Result<Book, AppError> {
        let book = self.commit(|c| c.return_book(id, borrower).cloned())?;
        tracing::info!(book_id = %id, borrower, "book returned");
        Ok(book)
    }

    // --- private ---

    /// 作業用コピーに変更を適用し、保存に成功した場合のみ確定する。
    fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut Catalog) -> Result<T, DomainError>,
    ) -> Result<T, AppError> {
        let mut draft = self.catalog.clone();
        let out = op(&mut draft)?;
        self.repo.save(&draft).map_err(|e| {
            tracing::warn!(error = %e, "failed to persist catalog");
            AppError::Storage(Box::new(e))
        })?;
        self.catalog = draft;
        Ok(out)
    }
}
