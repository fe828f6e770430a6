//! Interactive text menu (`--menu`).
//!
//! stdin/stdout <-> application::LibraryService, one action per loop.
//! End of input is treated as Exit.

use std::io::{BufRead, Write};

use crate::application::render::{render_book, render_books};
use crate::application::service::LibraryService;
use crate::domain::model::catalog::{AddBookRequest, SearchField, UpdateBookRequest};
use crate::domain::model::id::BookId;
use crate::domain::repository::CatalogRepository;

const MENU: &str = "\
==================================================
LIBRARY MANAGEMENT SYSTEM
==================================================
1. Add New Book
2. Delete Book
3. Modify Book
4. Search Books
5. Display All Books
6. Borrow Book
7. Return Book
8. Exit
==================================================
";

/// メニューループ本体。入出力を差し替えてテストできる。
pub struct Menu<'a, R: CatalogRepository, I, O> {
    service: &'a mut LibraryService<R>,
    input: I,
    output: O,
}

impl<'a, R, I, O> Menu<'a, R, I, O>
where
    R: CatalogRepository,
    I: BufRead,
    O: Write,
{
    pub fn new(service: &'a mut LibraryService<R>, input: I, output: O) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Exitが選ばれるか入力が尽きるまでループする。
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            write!(self.output, "\n{MENU}")?;
            let Some(choice) = self.prompt("\nEnter your choice (1-8): ")? else {
                break;
            };

            let keep_going = match choice.trim() {
                "1" => self.add_book()?,
                "2" => self.delete_book()?,
                "3" => self.modify_book()?,
                "4" => self.search_books()?,
                "5" => self.display_all()?,
                "6" => self.borrow_book()?,
                "7" => self.return_book()?,
                "8" => false,
                _ => {
                    writeln!(
                        self.output,
                        "Invalid choice! Please enter a number between 1-8."
                    )?;
                    true
                }
            };
            if !keep_going {
                break;
            }
        }

        writeln!(
            self.output,
            "\nThank you for using the Library Management System!"
        )?;
        self.output.flush()?;
        Ok(())
    }

    // --- actions (false = 入力終端) ---

    fn add_book(&mut self) -> anyhow::Result<bool> {
        writeln!(self.output, "\n--- Add New Book ---")?;
        let Some(title) = self.prompt("Enter book title: ")? else {
            return Ok(false);
        };
        let Some(author) = self.prompt("Enter author name: ")? else {
            return Ok(false);
        };
        let Some(category) = self.prompt("Enter category: ")? else {
            return Ok(false);
        };

        let result = self.service.add_book(AddBookRequest {
            title,
            author,
            category,
        });
        match result {
            Ok(book) => writeln!(
                self.output,
                "Book added successfully! Book ID: {}",
                book.id()
            )?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(true)
    }

    fn delete_book(&mut self) -> anyhow::Result<bool> {
        writeln!(self.output, "\n--- Delete Book ---")?;
        let Some(id) = self.prompt("Enter Book ID to delete: ")? else {
            return Ok(false);
        };

        match self.service.delete_book(&BookId::from(id)) {
            Ok(_) => writeln!(self.output, "Book deleted successfully!")?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(true)
    }

    fn modify_book(&mut self) -> anyhow::Result<bool> {
        writeln!(self.output, "\n--- Modify Book ---")?;
        let Some(id) = self.prompt("Enter Book ID to modify: ")? else {
            return Ok(false);
        };
        let id = BookId::from(id);

        let current = match self.service.get_book(&id) {
            Ok(book) => book.clone(),
            Err(e) => {
                writeln!(self.output, "Error: {e}")?;
                return Ok(true);
            }
        };

        writeln!(self.output, "\nCurrent book details:")?;
        write!(self.output, "{}", render_book(&current))?;
        writeln!(
            self.output,
            "\nEnter new values (press Enter to keep current value):"
        )?;

        let Some(title) = self.prompt(&format!("New Title [{}]: ", current.title()))? else {
            return Ok(false);
        };
        let Some(author) = self.prompt(&format!("New Author [{}]: ", current.author()))? else {
            return Ok(false);
        };
        let Some(category) =
            self.prompt(&format!("New Category [{}]: ", current.category()))?
        else {
            return Ok(false);
        };

        let req = UpdateBookRequest {
            title: Some(title),
            author: Some(author),
            category: Some(category),
        };
        match self.service.modify_book(&id, req) {
            Ok(_) => writeln!(self.output, "Book modified successfully!")?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(true)
    }

    fn search_books(&mut self) -> anyhow::Result<bool> {
        writeln!(self.output, "\n--- Search Books ---")?;
        writeln!(self.output, "1. Search by Title")?;
        writeln!(self.output, "2. Search by Author")?;
        writeln!(self.output, "3. Search by Category")?;
        writeln!(self.output, "4. Search by Book ID")?;

        let Some(kind) = self.prompt("\nChoose search type (1-4): ")? else {
            return Ok(false);
        };
        let Some(query) = self.prompt("Enter search term: ")? else {
            return Ok(false);
        };

        let field = match kind.trim() {
            "1" => SearchField::Title,
            "2" => SearchField::Author,
            "3" => SearchField::Category,
            "4" => SearchField::Id,
            _ => {
                writeln!(self.output, "Invalid search type!")?;
                return Ok(true);
            }
        };

        let results = self.service.search(field, &query);
        if results.is_empty() {
            writeln!(self.output, "No books found!")?;
        } else {
            writeln!(self.output, "\nFound {} book(s):", results.len())?;
            write!(self.output, "{}", render_books(results))?;
        }
        Ok(true)
    }

    fn display_all(&mut self) -> anyhow::Result<bool> {
        writeln!(self.output, "\n--- All Books in Library ---")?;
        let books = self.service.list_all();
        if books.is_empty() {
            writeln!(self.output, "No books in library!")?;
        } else {
            write!(self.output, "{}", render_books(books))?;
        }
        Ok(true)
    }

    fn borrow_book(&mut self) -> anyhow::Result<bool> {
        writeln!(self.output, "\n--- Borrow Book ---")?;
        let Some(id) = self.prompt("Enter Book ID: ")? else {
            return Ok(false);
        };
        let Some(name) = self.prompt("Enter your name: ")? else {
            return Ok(false);
        };

        match self.service.borrow_book(&BookId::from(id), &name) {
            Ok(_) => writeln!(self.output, "Book borrowed successfully!")?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(true)
    }

    fn return_book(&mut self) -> anyhow::Result<bool> {
        writeln!(self.output, "\n--- Return Book ---")?;
        let Some(id) = self.prompt("Enter Book ID: ")? else {
            return Ok(false);
        };
        let Some(name) = self.prompt("Enter your name: ")? else {
            return Ok(false);
        };

        match self.service.return_book(&BookId::from(id), &name) {
            Ok(_) => writeln!(self.output, "Book returned successfully!")?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(true)
    }

    /// プロンプトを出して1行読む。改行は除去。入力終端ならNone。
    fn prompt(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).to_string();
        Ok(Some(trimmed))
    }
}

/// 標準入出力でメニューを実行する。
pub fn run<R: CatalogRepository>(service: &mut LibraryService<R>) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Menu::new(service, stdin.lock(), stdout.lock()).run()
}
