//! Property-based tests — invariant verification with proptest.

mod common;

use common::TestCatalog;
use proptest::prelude::*;

use library_mcp::domain::model::catalog::{AddBookRequest, Catalog, SearchField, UpdateBookRequest};
use library_mcp::domain::model::id::BookId;

#[derive(Debug, Clone)]
enum Op {
    Add,
    /// 既存レコードのうち index % len 番目を削除
    Delete(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Add),
        1 => any::<usize>().prop_map(Op::Delete),
    ]
}

fn add(catalog: &mut Catalog, title: &str) -> BookId {
    catalog
        .add_book(AddBookRequest {
            title: title.into(),
            author: "Author".into(),
            category: "Category".into(),
        })
        .unwrap()
        .id()
        .clone()
}

// =============================================================================
// ID generation
// =============================================================================

proptest! {
    /// 追加・削除をどう混ぜても、発行されるIDは一意かつ単調増加。
    #[test]
    fn generated_ids_strictly_increase(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut catalog = Catalog::new();
        let mut issued: Vec<u32> = Vec::new();

        for op in ops {
            match op {
                Op::Add => {
                    let id = add(&mut catalog, "Book");
                    issued.push(id.number().unwrap());
                }
                Op::Delete(i) => {
                    // 末尾（最大番号）は残す。最大番号が消えるとその番号は再発行される
                    if catalog.len() > 1 {
                        let idx = i % (catalog.len() - 1);
                        let id = catalog.books()[idx].id().clone();
                        catalog.remove_book(&id).unwrap();
                    }
                }
            }
        }

        prop_assert!(issued.windows(2).all(|w| w[0] < w[1]));
    }

    /// IDは常に "BK" + 3桁以上の数字。
    #[test]
    fn id_format(n in 1u32..100_000) {
        let id = BookId::from_number(n);
        prop_assert!(id.as_str().starts_with("BK"));
        prop_assert!(id.as_str().len() >= 5);
        prop_assert_eq!(id.number(), Some(n));
    }

    /// next_id は既存の最大番号 + 1。
    #[test]
    fn next_id_is_max_plus_one(nums in prop::collection::btree_set(1u32..5000, 0..20)) {
        let ids: Vec<BookId> = nums.iter().copied().map(BookId::from_number).collect();
        let expected = nums.iter().max().copied().unwrap_or(0) + 1;
        prop_assert_eq!(BookId::next_after(&ids).number(), Some(expected));
    }
}

// =============================================================================
// Catalog invariants
// =============================================================================

proptest! {
    /// 追加→削除でレコード数が元に戻る。
    #[test]
    fn add_remove_preserves_count(title in "[A-Za-z ]{0,20}[A-Za-z]") {
        let mut catalog = TestCatalog::standard();
        let before = catalog.len();

        let id = add(&mut catalog, &title);
        prop_assert_eq!(catalog.len(), before + 1);

        catalog.remove_book(&id).unwrap();
        prop_assert_eq!(catalog.len(), before);
    }

    /// 検索は大文字小文字を区別しない。
    #[test]
    fn search_ignores_case(query in "[a-z]{1,4}") {
        let catalog = TestCatalog::standard();
        let lower = catalog.search(SearchField::Title, &query).len();
        let upper = catalog.search(SearchField::Title, &query.to_uppercase()).len();
        prop_assert_eq!(lower, upper);
    }

    /// 空クエリは全件に一致する。
    #[test]
    fn empty_query_matches_all(field in prop_oneof![
        Just(SearchField::Title),
        Just(SearchField::Author),
        Just(SearchField::Category),
        Just(SearchField::Id),
    ]) {
        let catalog = TestCatalog::standard();
        prop_assert_eq!(catalog.search(field, "").len(), catalog.len());
    }

    /// 更新はID・貸出状態を変えない。
    #[test]
    fn update_never_touches_id_or_status(
        title in "[A-Za-z]{0,10}",
        author in "[A-Za-z]{0,10}",
    ) {
        let mut catalog = TestCatalog::standard();
        let id = BookId::from("BK001");
        let before = catalog.get(&id).unwrap().clone();

        let book = catalog.update_book(&id, UpdateBookRequest {
            title: Some(title.clone()),
            author: Some(author.clone()),
            category: None,
        }).unwrap();

        prop_assert_eq!(book.id(), before.id());
        prop_assert_eq!(book.is_available(), before.is_available());
        prop_assert_eq!(book.borrower(), before.borrower());
        let expected_title = if title.is_empty() { before.title() } else { title.as_str() };
        prop_assert_eq!(book.title(), expected_title);
        let expected_author = if author.is_empty() { before.author() } else { author.as_str() };
        prop_assert_eq!(book.author(), expected_author);
    }

    /// 貸出→返却（借り手名の大文字小文字違い）で元の状態に戻る。
    #[test]
    fn borrow_return_roundtrip(name in "[A-Za-z]{1,12}") {
        let mut catalog = TestCatalog::standard();
        let id = BookId::from("BK003");
        let before = catalog.clone();

        catalog.borrow_book(&id, &name).unwrap();
        prop_assert!(!catalog.get(&id).unwrap().is_available());

        catalog.return_book(&id, &name.to_uppercase()).unwrap();
        prop_assert_eq!(catalog, before);
    }

    /// JSON保存形式の往復で目録が完全に一致する。
    #[test]
    fn json_roundtrip(borrower in prop::option::of("[A-Za-z]{1,8}")) {
        let mut catalog = TestCatalog::standard();
        if let Some(name) = &borrower {
            catalog.borrow_book(&BookId::from("BK004"), name).unwrap();
        }
        let json = serde_json::to_string(&catalog).unwrap();
        let back: Catalog = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, catalog);
    }
}
