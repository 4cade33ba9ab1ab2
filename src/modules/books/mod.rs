pub mod cache;
pub mod conditional;
pub mod fingerprint;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod state;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;

use folio_kernel::{InitCtx, Module};

use state::CatalogState;

/// Books module: the catalog's sole resource type.
pub struct BooksModule {
    state: CatalogState,
}

impl BooksModule {
    pub fn new(state: CatalogState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::routes(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/books": {
                    "get": {
                        "summary": "List books with filtering and pagination",
                        "tags": ["Books"],
                        "parameters": [
                            {"name": "authors", "in": "query", "schema": {"type": "string"}, "description": "Comma-separated author names"},
                            {"name": "genres", "in": "query", "schema": {"type": "string"}, "description": "Comma-separated genre names"},
                            {"name": "published_year", "in": "query", "schema": {"type": "integer"}},
                            {"name": "page", "in": "query", "schema": {"type": "integer", "minimum": 1}}
                        ],
                        "responses": {
                            "200": {
                                "description": "One page of books with navigation links",
                                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/BookList"}}}
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/BookPayload"}}}
                        },
                        "responses": {
                            "201": {
                                "description": "Created book with its link; fingerprint in the ETag header",
                                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Book"}}}
                            },
                            "400": {
                                "description": "A book with the same name already exists",
                                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Message"}}}
                            },
                            "422": {
                                "description": "Missing or invalid required fields",
                                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Message"}}}
                            }
                        }
                    }
                },
                "/book/{book_id}": {
                    "get": {
                        "summary": "Fetch a single book",
                        "tags": ["Books"],
                        "parameters": [
                            {"name": "book_id", "in": "path", "required": true, "schema": {"type": "string"}},
                            {"name": "If-None-Match", "in": "header", "schema": {"type": "string"}}
                        ],
                        "responses": {
                            "200": {
                                "description": "The book; fingerprint in the ETag header",
                                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Book"}}}
                            },
                            "304": {"description": "Client representation is current"},
                            "400": {
                                "description": "No such book",
                                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Message"}}}
                            }
                        }
                    },
                    "put": {
                        "summary": "Replace a book",
                        "tags": ["Books"],
                        "parameters": [
                            {"name": "book_id", "in": "path", "required": true, "schema": {"type": "string"}},
                            {"name": "If-Match", "in": "header", "schema": {"type": "string"}}
                        ],
                        "requestBody": {
                            "required": true,
                            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/BookPayload"}}}
                        },
                        "responses": {
                            "200": {
                                "description": "Updated book; new fingerprint in the ETag header",
                                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Book"}}}
                            },
                            "400": {
                                "description": "No such book",
                                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Message"}}}
                            },
                            "412": {"description": "If-Match token does not match the stored fingerprint"}
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [
                            {"name": "book_id", "in": "path", "required": true, "schema": {"type": "string"}},
                            {"name": "If-Match", "in": "header", "schema": {"type": "string"}}
                        ],
                        "responses": {
                            "200": {
                                "description": "Deletion confirmation",
                                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Message"}}}
                            },
                            "400": {
                                "description": "No such book",
                                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Message"}}}
                            },
                            "412": {"description": "If-Match token does not match the stored fingerprint"}
                        }
                    }
                },
                "/authors": {
                    "get": {
                        "summary": "List all registered authors",
                        "tags": ["Facets"],
                        "responses": {
                            "200": {
                                "description": "Sorted author names",
                                "content": {"application/json": {"schema": {"type": "array", "items": {"type": "string"}}}}
                            }
                        }
                    }
                },
                "/genres": {
                    "get": {
                        "summary": "List all registered genres",
                        "tags": ["Facets"],
                        "responses": {
                            "200": {
                                "description": "Sorted genre names",
                                "content": {"application/json": {"schema": {"type": "array", "items": {"type": "string"}}}}
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "author": {"type": "string"},
                            "published_year": {"type": "string"},
                            "genres": {"type": "array", "items": {"type": "string"}},
                            "description": {"type": "string"},
                            "link": {"type": "string", "format": "uri"}
                        },
                        "required": ["name", "author", "published_year", "genres", "description", "link"]
                    },
                    "BookPayload": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "author": {"type": "string"},
                            "published_year": {"description": "Calendar year as integer or string"},
                            "genres": {"type": "array", "items": {"type": "string"}, "minItems": 1},
                            "description": {"type": "string"}
                        },
                        "required": ["name", "author", "published_year", "genres", "description"]
                    },
                    "BookSummary": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "author": {"type": "string"},
                            "link": {"type": "string", "format": "uri"}
                        },
                        "required": ["name", "author", "link"]
                    },
                    "BookList": {
                        "type": "object",
                        "properties": {
                            "total_results": {"type": "integer"},
                            "prev_page": {"type": "string", "format": "uri"},
                            "next_page": {"type": "string", "format": "uri"},
                            "books": {"type": "array", "items": {"$ref": "#/components/schemas/BookSummary"}}
                        },
                        "required": ["total_results", "books"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(state: CatalogState) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(state))
}
