//! MCP Server for library-mcp
//!
//! MCP Protocol (stdio) <-> application::LibraryService
//!
//! 8 tools: add_book, delete_book, modify_book, show_book, search_books,
//! list_books, borrow_book, return_book

use std::sync::{Arc, Mutex, MutexGuard};

use rmcp::{
    handler::server::{tool::ToolCallContext, tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::application::error::AppError;
use crate::application::render::{render_book, render_books};
use crate::application::service::LibraryService;
use crate::domain::model::catalog::{AddBookRequest, SearchField, UpdateBookRequest};
use crate::domain::model::id::BookId;
use crate::infra::json_store::JsonCatalogRepository;

type Service = LibraryService<JsonCatalogRepository>;

// =============================================================================
// Public entry point
// =============================================================================

/// MCP Serverを起動する。目録は呼び出し側でload済み。
pub async fn run(service: Service) -> anyhow::Result<()> {
    let server = LibraryMcpServer::new(service);
    tracing::info!("serving library tools on stdio");
    let running = server.serve(stdio()).await?;
    running.waiting().await?;
    Ok(())
}

// =============================================================================
// MCP Server
// =============================================================================

#[derive(Clone)]
struct LibraryMcpServer {
    service: Arc<Mutex<Service>>,
    tool_router: ToolRouter<Self>,
}

impl LibraryMcpServer {
    fn new(service: Service) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
            tool_router: Self::tool_router(),
        }
    }

    fn service(&self) -> Result<MutexGuard<'_, Service>, McpError> {
        self.service
            .lock()
            .map_err(|_| McpError::internal_error("Lock poisoned", None))
    }

    /// ドメインエラーは利用者に見せる入力エラー、保存失敗は内部エラーとして返す。
    fn to_mcp_error(e: AppError) -> McpError {
        match e {
            AppError::Domain(_) => McpError::invalid_params(format!("{e}"), None),
            AppError::Storage(_) => McpError::internal_error(format!("{e}"), None),
        }
    }
}

// =============================================================================
// ServerHandler impl
// =============================================================================

impl ServerHandler for LibraryMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "library-mcp".to_string(),
                title: Some("Library MCP — Book Inventory".to_string()),
                description: Some(
                    "Single-user book inventory. Books have IDs like BK001 \
                     and are either available or borrowed by a named person."
                        .to_string(),
                ),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Manage a small library.\n\
                 \n\
                 Tools: `list_books` or `search_books` to find IDs → `show_book`, \
                 `modify_book`, `delete_book`, `borrow_book`, `return_book`. \
                 `add_book` for new entries."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_ctx = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_ctx).await
    }
}

// =============================================================================
// Request types
// =============================================================================

fn parse_search_field(s: &str) -> Result<SearchField, McpError> {
    s.parse().map_err(|msg: String| McpError::invalid_params(msg, None))
}

/// 前後の空白を除去し、空なら未指定として扱う。
fn normalize_text(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpAddBookRequest {
    #[schemars(description = "Book title (required)")]
    pub title: String,
    #[schemars(description = "Author name (required)")]
    pub author: String,
    #[schemars(description = "Category (e.g. 'Fiction', 'History'). Optional.")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookIdRequest {
    #[schemars(description = "Book ID (e.g. 'BK001'). Exact, case-sensitive.")]
    pub book_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpModifyBookRequest {
    #[schemars(description = "Book ID (e.g. 'BK001')")]
    pub book_id: String,
    #[schemars(description = "New title (omit or empty to keep current)")]
    pub title: Option<String>,
    #[schemars(description = "New author (omit or empty to keep current)")]
    pub author: Option<String>,
    #[schemars(description = "New category (omit or empty to keep current)")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpSearchRequest {
    #[schemars(description = "Field to search: title, author, category, or id")]
    pub field: String,
    #[schemars(description = "Search term (case-insensitive substring)")]
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpListRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpLoanRequest {
    #[schemars(description = "Book ID (e.g. 'BK001')")]
    pub book_id: String,
    #[schemars(description = "Borrower name. Return matches it case-insensitively.")]
    pub borrower: String,
}

// =============================================================================
// Tool implementations
// =============================================================================

#[tool_router]
impl LibraryMcpServer {
    #[tool(
        name = "add_book",
        description = "Add a new book. It gets the next ID (BK001, BK002, ...) and starts as available.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn add_book(
        &self,
        Parameters(req): Parameters<McpAddBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut svc = self.service()?;
        let book = svc
            .add_book(AddBookRequest {
                title: req.title,
                author: req.author,
                category: req.category.unwrap_or_default(),
            })
            .map_err(Self::to_mcp_error)?;

        Ok(text_result(format!(
            "Book added successfully! Book ID: {}",
            book.id()
        )))
    }

    #[tool(
        name = "delete_book",
        description = "Delete a book by ID (e.g. 'BK001').",
        annotations(
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn delete_book(
        &self,
        Parameters(req): Parameters<McpBookIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut svc = self.service()?;
        let book = svc
            .delete_book(&BookId::from(req.book_id))
            .map_err(Self::to_mcp_error)?;

        Ok(text_result(format!(
            "Book deleted successfully! {} ({})",
            book.id(),
            book.title()
        )))
    }

    #[tool(
        name = "modify_book",
        description = "Edit a book's title, author, or category. Omitted or empty fields keep their current value.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn modify_book(
        &self,
        Parameters(req): Parameters<McpModifyBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut svc = self.service()?;
        let book = svc
            .modify_book(
                &BookId::from(req.book_id),
                UpdateBookRequest {
                    title: normalize_text(req.title),
                    author: normalize_text(req.author),
                    category: normalize_text(req.category),
                },
            )
            .map_err(Self::to_mcp_error)?;

        Ok(text_result(format!(
            "Book modified successfully!\n\n{}",
            render_book(&book)
        )))
    }

    #[tool(
        name = "show_book",
        description = "Show one book's details by ID.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn show_book(
        &self,
        Parameters(req): Parameters<McpBookIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        let svc = self.service()?;
        let book = svc
            .get_book(&BookId::from(req.book_id))
            .map_err(Self::to_mcp_error)?;
        Ok(text_result(render_book(book)))
    }

    #[tool(
        name = "search_books",
        description = "Search books by title, author, category, or id. Case-insensitive substring match.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn search_books(
        &self,
        Parameters(req): Parameters<McpSearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let field = parse_search_field(&req.field)?;
        let svc = self.service()?;
        let results = svc.search(field, &req.query);

        if results.is_empty() {
            return Ok(text_result("No books found!"));
        }
        Ok(text_result(format!(
            "Found {} book(s):\n\n{}",
            results.len(),
            render_books(results)
        )))
    }

    #[tool(
        name = "list_books",
        description = "List all books in the library with their status.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn list_books(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpListRequest>,
    ) -> Result<CallToolResult, McpError> {
        let svc = self.service()?;
        let books = svc.list_all();

        if books.is_empty() {
            return Ok(text_result("No books in library!"));
        }
        Ok(text_result(format!(
            "# All Books ({})\n\n{}",
            books.len(),
            render_books(books)
        )))
    }

    #[tool(
        name = "borrow_book",
        description = "Lend an available book to a borrower. Fails if it is already borrowed.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn borrow_book(
        &self,
        Parameters(req): Parameters<McpLoanRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut svc = self.service()?;
        let book = svc
            .borrow_book(&BookId::from(req.book_id), req.borrower.trim())
            .map_err(Self::to_mcp_error)?;

        Ok(text_result(format!(
            "Book borrowed successfully! {} → {}",
            book.id(),
            book.borrower().unwrap_or_default()
        )))
    }

    #[tool(
        name = "return_book",
        description = "Return a borrowed book. The borrower name must match the one on record (case-insensitive).",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn return_book(
        &self,
        Parameters(req): Parameters<McpLoanRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut svc = self.service()?;
        let book = svc
            .return_book(&BookId::from(req.book_id), req.borrower.trim())
            .map_err(Self::to_mcp_error)?;

        Ok(text_result(format!(
            "Book returned successfully! {} ({})",
            book.id(),
            book.title()
        )))
    }
}

// =============================================================================
// Tests
// =============================================================================
