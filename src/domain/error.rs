use super::model::id::BookId;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("book not found: {0}")]
    BookNotFound(BookId),

    #[error("book {id} is already borrowed by {borrower}")]
    AlreadyBorrowed { id: BookId, borrower: String },

    #[error("book {0} was not borrowed by you")]
    WrongBorrower(BookId),

    #[error("book {0} is not borrowed")]
    NotBorrowed(BookId),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}
