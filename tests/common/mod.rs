//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use library_mcp::application::service::LibraryService;
use library_mcp::domain::model::catalog::{AddBookRequest, Catalog};
use library_mcp::domain::model::id::BookId;
use library_mcp::domain::repository::CatalogRepository;

// =============================================================================
// InMemoryRepo — テスト用リポジトリ
// =============================================================================

#[derive(Debug, thiserror::Error)]
#[error("in-memory store error")]
pub struct InMemoryError;

/// ファイルI/O不要のインメモリリポジトリ。`fail_saves` で保存失敗を再現できる。
pub struct InMemoryRepo {
    store: RefCell<Option<String>>,
    saves: Cell<usize>,
    fail_saves: Cell<bool>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            store: RefCell::new(None),
            saves: Cell::new(0),
            fail_saves: Cell::new(false),
        }
    }

    pub fn with_catalog(catalog: &Catalog) -> Self {
        let repo = Self::new();
        repo.save(catalog).unwrap();
        repo.saves.set(0);
        repo
    }

    pub fn failing(catalog: &Catalog) -> Self {
        let repo = Self::with_catalog(catalog);
        repo.fail_saves.set(true);
        repo
    }

    /// 最後に保存された目録
    pub fn stored(&self) -> Option<Catalog> {
        self.store
            .borrow()
            .as_ref()
            .map(|json| serde_json::from_str(json).unwrap())
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl CatalogRepository for InMemoryRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Catalog, Self::Error> {
        Ok(self.stored().unwrap_or_default())
    }

    fn save(&self, catalog: &Catalog) -> Result<(), Self::Error> {
        if self.fail_saves.get() {
            return Err(InMemoryError);
        }
        let json = serde_json::to_string(catalog).unwrap();
        *self.store.borrow_mut() = Some(json);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

// =============================================================================
// TestCatalog — テスト用目録作成ヘルパー
// =============================================================================

pub struct TestCatalog;

impl TestCatalog {
    /// 標準的なテスト用目録:
    /// ```text
    /// BK001 Warfare         / Sun Tzu        / History  (borrowed by Alice)
    /// BK002 The Great War   / Peter Hart     / History
    /// BK003 Dune            / Frank Herbert  / Sci-Fi
    /// BK004 Pride and Prejudice / Jane Austen / Classic
    /// ```
    pub fn standard() -> Catalog {
        let mut catalog = Catalog::new();
        for (title, author, category) in [
            ("Warfare", "Sun Tzu", "History"),
            ("The Great War", "Peter Hart", "History"),
            ("Dune", "Frank Herbert", "Sci-Fi"),
            ("Pride and Prejudice", "Jane Austen", "Classic"),
        ] {
            catalog
                .add_book(AddBookRequest {
                    title: title.into(),
                    author: author.into(),
                    category: category.into(),
                })
                .unwrap();
        }
        catalog.borrow_book(&BookId::from("BK001"), "Alice").unwrap();
        catalog
    }

    /// InMemoryRepoに目録を保存してLibraryServiceを返す。
    pub fn service_with(catalog: &Catalog) -> LibraryService<InMemoryRepo> {
        LibraryService::open(InMemoryRepo::with_catalog(catalog)).unwrap()
    }
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}
