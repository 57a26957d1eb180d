//! MCP (Model Context Protocol) server implementation.
//!
//! Implements the JSON-RPC 2.0 protocol over stdio, exposing Zotero library
//! tools for AI agent integration. Each tool call yields one text block.

use crate::api::ZoteroApi;
use crate::error::{Result, ZoteroError};
use crate::tools;
use crate::types::{QueryMode, SearchParams};
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};

/// Largest `limit` accepted by the search tool.
const MAX_SEARCH_LIMIT: u64 = 100;

/// Run the MCP server over stdin/stdout.
pub async fn run_server<A: ZoteroApi>(api: A) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    tracing::info!("MCP server listening on stdio");

    for line in stdin.lock().lines() {
        let line = line.map_err(|e| ZoteroError::Config(format!("stdin error: {}", e)))?;
        if line.trim().is_empty() {
            continue;
        }

        let Some(response) = handle_message(&api, &line).await else {
            continue;
        };

        writeln!(stdout.lock(), "{}", response)
            .map_err(|e| ZoteroError::Config(format!("stdout error: {}", e)))?;
        stdout
            .lock()
            .flush()
            .map_err(|e| ZoteroError::Config(format!("stdout flush error: {}", e)))?;
    }

    tracing::info!("stdin closed, MCP server exiting");
    Ok(())
}

/// Handle one line of input. Notifications produce no response.
pub async fn handle_message<A: ZoteroApi>(api: &A, line: &str) -> Option<Value> {
    let request: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            return Some(json!({
                "jsonrpc": "2.0",
                "id": null,
                "error": { "code": -32700, "message": format!("Parse error: {}", e) }
            }));
        }
    };

    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request["method"].as_str().unwrap_or("");
    tracing::debug!(method, %id, "request");

    let response = match method {
        "initialize" => handle_initialize(&id),
        "ping" => json!({ "jsonrpc": "2.0", "id": id, "result": {} }),
        "tools/list" => handle_tools_list(&id),
        "tools/call" => handle_tool_call(api, &id, &request["params"]).await,
        "resources/list" => handle_resources_list(&id),
        "resources/read" => handle_resource_read(&id, &request["params"]),
        m if m.starts_with("notifications/") => return None,
        _ => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32601, "message": format!("Method not found: {}", method) }
        }),
    };

    Some(response)
}

fn handle_initialize(id: &Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": {
            "protocolVersion": "2024-11-05",
            "capabilities": {
                "tools": {},
                "resources": {}
            },
            "serverInfo": {
                "name": "zotero-mcp",
                "version": env!("CARGO_PKG_VERSION")
            }
        }
    })
}

fn handle_tools_list(id: &Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": {
            "tools": tool_definitions()
        }
    })
}

fn handle_resources_list(id: &Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": {
            "resources": [
                {
                    "uri": "zotero://search-syntax",
                    "name": "Zotero Search Syntax",
                    "description": "Query modes and tag filter syntax for zotero_search_items",
                    "mimeType": "text/plain"
                }
            ]
        }
    })
}

fn handle_resource_read(id: &Value, params: &Value) -> Value {
    let uri = params["uri"].as_str().unwrap_or("");
    let content = match uri {
        "zotero://search-syntax" => SEARCH_SYNTAX_REFERENCE,
        _ => {
            return json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32602, "message": format!("Unknown resource: {}", uri) }
            });
        }
    };

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": {
            "contents": [{
                "uri": uri,
                "mimeType": "text/plain",
                "text": content
            }]
        }
    })
}

async fn handle_tool_call<A: ZoteroApi>(api: &A, id: &Value, params: &Value) -> Value {
    let tool_name = params["name"].as_str().unwrap_or("");
    let args = &params["arguments"];

    match call_tool(api, tool_name, args).await {
        Ok(content) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "content": [{ "type": "text", "text": content }]
            }
        }),
        Err(e) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "content": [{ "type": "text", "text": format!("⚠️ {}", e) }],
                "isError": true
            }
        }),
    }
}

/// Dispatch a tool call.
///
/// Only argument problems and unknown tools are errors here; library
/// failures are already rendered as text by [`tools`].
async fn call_tool<A: ZoteroApi>(api: &A, tool_name: &str, args: &Value) -> Result<String> {
    match tool_name {
        "zotero_item_metadata" => Ok(tools::item_metadata(api, required_str(args, "item_key")?).await),
        "zotero_item_fulltext" => Ok(tools::item_fulltext(api, required_str(args, "item_key")?).await),
        "zotero_search_items" => Ok(tools::search_items(api, &search_params(args)?).await),
        "zotero_collections" => Ok(tools::list_collections(api).await),
        "zotero_add_tags" => {
            let item_key = required_str(args, "item_key")?;
            let tags = string_list(args, "tags")?;
            Ok(tools::add_tags(api, item_key, &tags).await)
        }
        "zotero_restore_from_trash" => {
            Ok(tools::restore_from_trash(api, required_str(args, "item_key")?).await)
        }
        _ => Err(ZoteroError::InvalidArgs(format!("Unknown tool: {}", tool_name))),
    }
}

fn required_str<'a>(args: &'a Value, name: &str) -> Result<&'a str> {
    args[name]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ZoteroError::InvalidArgs(format!("'{}' parameter required", name)))
}

fn string_list(args: &Value, name: &str) -> Result<Vec<String>> {
    match &args[name] {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(values) => Ok(values
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect()),
        _ => Err(ZoteroError::InvalidArgs(format!(
            "'{}' must be a string or an array of strings",
            name
        ))),
    }
}

fn search_params(args: &Value) -> Result<SearchParams> {
    let query = args["query"]
        .as_str()
        .ok_or_else(|| ZoteroError::InvalidArgs("'query' parameter required".into()))?;

    let mut params = SearchParams::new(query);

    if let Some(raw) = args["qmode"].as_str() {
        params.mode = QueryMode::from_str_loose(raw).ok_or_else(|| {
            ZoteroError::InvalidArgs(format!(
                "'qmode' must be titleCreatorYear or everything, got '{}'",
                raw
            ))
        })?;
    }
    if let Some(tag) = args["tag"].as_str().filter(|t| !t.is_empty()) {
        params.tag = Some(tag.to_string());
    }
    if let Some(limit) = args["limit"].as_u64() {
        params.limit = limit.clamp(1, MAX_SEARCH_LIMIT) as u32;
    }

    Ok(params)
}

// --- Tool definitions ---

fn tool_definitions() -> Value {
    json!([
        {
            "name": "zotero_item_metadata",
            "description": "Get metadata information about a specific Zotero item, given the item key.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "item_key": { "type": "string", "description": "Zotero item key (e.g., 'ABCD1234')" }
                },
                "required": ["item_key"]
            },
            "annotations": {
                "readOnlyHint": true,
                "destructiveHint": false,
                "idempotentHint": true,
                "openWorldHint": false
            }
        },
        {
            "name": "zotero_item_fulltext",
            "description": "Get the full text content of a Zotero item, given the item key of a parent item or specific attachment.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "item_key": { "type": "string", "description": "Key of a parent item or of an attachment" }
                },
                "required": ["item_key"]
            },
            "annotations": {
                "readOnlyHint": true,
                "destructiveHint": false,
                "idempotentHint": true,
                "openWorldHint": false
            }
        },
        {
            "name": "zotero_search_items",
            "description": "Search for items in your Zotero library, given a query string, query mode (titleCreatorYear or everything), and optional tag search (supports boolean searches). Returned results can be looked up with zotero_item_fulltext or zotero_item_metadata.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Quick search text" },
                    "qmode": { "type": "string", "enum": ["titleCreatorYear", "everything"], "default": "titleCreatorYear" },
                    "tag": { "type": "string", "description": "Tag filter, e.g. 'ml || nlp' or '-read'" },
                    "limit": { "type": "integer", "description": "Max results (default 10)", "default": 10 }
                },
                "required": ["query"]
            },
            "annotations": {
                "readOnlyHint": true,
                "destructiveHint": false,
                "idempotentHint": true,
                "openWorldHint": false
            }
        },
        {
            "name": "zotero_collections",
            "description": "List the collections in your Zotero library as a tree, with item counts and collection keys.",
            "inputSchema": {
                "type": "object",
                "properties": {}
            },
            "annotations": {
                "readOnlyHint": true,
                "destructiveHint": false,
                "idempotentHint": true,
                "openWorldHint": false
            }
        },
        {
            "name": "zotero_add_tags",
            "description": "Add one or more tags to a Zotero item. Existing tags are kept; tags already present are skipped.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "item_key": { "type": "string", "description": "Zotero item key" },
                    "tags": { "type": "array", "items": { "type": "string" }, "description": "Tags to add" }
                },
                "required": ["item_key", "tags"]
            },
            "annotations": {
                "readOnlyHint": false,
                "destructiveHint": false,
                "idempotentHint": true,
                "openWorldHint": false
            }
        },
        {
            "name": "zotero_restore_from_trash",
            "description": "Restore a Zotero item from the trash, given its item key.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "item_key": { "type": "string", "description": "Zotero item key" }
                },
                "required": ["item_key"]
            },
            "annotations": {
                "readOnlyHint": false,
                "destructiveHint": false,
                "idempotentHint": true,
                "openWorldHint": false
            }
        }
    ])
}

// --- Reference content ---

const SEARCH_SYNTAX_REFERENCE: &str = r#"Zotero Search Syntax
====================

Query modes (qmode):
  titleCreatorYear  - Match titles, creator names and years (default)
  everything        - Match all fields, including indexed full text

Tag filters (tag):
  ml                - Items tagged "ml"
  ml || nlp         - Items tagged "ml" OR "nlp"
  -read             - Items NOT tagged "read"

Results list item keys; pass a key to zotero_item_metadata or
zotero_item_fulltext for the full record.
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeLibrary;

    fn call(name: &str, arguments: Value) -> String {
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        })
        .to_string()
    }

    fn text(response: &Value) -> &str {
        response["result"]["content"][0]["text"].as_str().unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let api = FakeLibrary::new();
        let response = handle_message(&api, r#"{"jsonrpc":"2.0","id":0,"method":"initialize"}"#)
            .await
            .unwrap();
        assert_eq!(response["id"], 0);
        assert_eq!(response["result"]["serverInfo"]["name"], "zotero-mcp");
    }

    #[tokio::test]
    async fn test_notifications_have_no_response() {
        let api = FakeLibrary::new();
        let line = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;
        assert!(handle_message(&api, line).await.is_none());
    }

    #[tokio::test]
    async fn test_parse_error() {
        let api = FakeLibrary::new();
        let response = handle_message(&api, "{not json").await.unwrap();
        assert_eq!(response["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let api = FakeLibrary::new();
        let response = handle_message(&api, r#"{"jsonrpc":"2.0","id":"a","method":"bogus"}"#)
            .await
            .unwrap();
        assert_eq!(response["error"]["code"], -32601);
        assert_eq!(response["id"], "a");
    }

    #[tokio::test]
    async fn test_tools_list_names() {
        let api = FakeLibrary::new();
        let response = handle_message(&api, r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
            .await
            .unwrap();
        let names: Vec<&str> = response["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "zotero_item_metadata",
                "zotero_item_fulltext",
                "zotero_search_items",
                "zotero_collections",
                "zotero_add_tags",
                "zotero_restore_from_trash",
            ]
        );
    }

    #[tokio::test]
    async fn test_item_metadata_tool() {
        let api = FakeLibrary::new().with_item(json!({"key": "K1", "data": {
            "itemType": "book", "title": "A Book"
        }}));
        let response = handle_message(&api, &call("zotero_item_metadata", json!({"item_key": "K1"})))
            .await
            .unwrap();
        assert!(text(&response).starts_with("## A Book\nItem Key: `K1`"));
        assert!(response["result"]["isError"].is_null());
    }

    #[tokio::test]
    async fn test_library_failure_is_plain_text() {
        let api = FakeLibrary::new().failing("offline");
        let response = handle_message(&api, &call("zotero_item_metadata", json!({"item_key": "K1"})))
            .await
            .unwrap();
        assert!(text(&response).starts_with("⚠️ Error retrieving item metadata:"));
        assert!(response["result"]["isError"].is_null());
    }

    #[tokio::test]
    async fn test_missing_argument() {
        let api = FakeLibrary::new();
        let response = handle_message(&api, &call("zotero_item_fulltext", json!({})))
            .await
            .unwrap();
        assert_eq!(response["result"]["isError"], true);
        assert!(text(&response).contains("'item_key' parameter required"));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let api = FakeLibrary::new();
        let response = handle_message(&api, &call("zotero_delete_everything", json!({})))
            .await
            .unwrap();
        assert_eq!(response["result"]["isError"], true);
        assert!(text(&response).contains("Unknown tool: zotero_delete_everything"));
    }

    #[tokio::test]
    async fn test_search_tool_arguments() {
        let api = FakeLibrary::new();
        let response = handle_message(
            &api,
            &call(
                "zotero_search_items",
                json!({"query": "graph", "qmode": "everything", "tag": "ml", "limit": 500}),
            ),
        )
        .await
        .unwrap();

        assert_eq!(text(&response), "No items found matching your query.");
        let searches = api.searches.borrow();
        assert_eq!(searches[0].query, "graph");
        assert_eq!(searches[0].mode, QueryMode::Everything);
        assert_eq!(searches[0].tag.as_deref(), Some("ml"));
        assert_eq!(searches[0].limit, 100);
    }

    #[tokio::test]
    async fn test_search_tool_bad_qmode() {
        let api = FakeLibrary::new();
        let response = handle_message(
            &api,
            &call("zotero_search_items", json!({"query": "x", "qmode": "fulltext"})),
        )
        .await
        .unwrap();
        assert_eq!(response["result"]["isError"], true);
        assert!(api.searches.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_add_tags_accepts_single_string() {
        let api = FakeLibrary::new().with_item(json!({"key": "K1", "version": 3, "data": {"itemType": "book"}}));
        let response = handle_message(
            &api,
            &call("zotero_add_tags", json!({"item_key": "K1", "tags": "to-read"})),
        )
        .await
        .unwrap();
        assert_eq!(text(&response), "Added 1 tag to item `K1`: `to-read`");
    }

    #[tokio::test]
    async fn test_resource_read() {
        let api = FakeLibrary::new();
        let line = r#"{"jsonrpc":"2.0","id":5,"method":"resources/read","params":{"uri":"zotero://search-syntax"}}"#;
        let response = handle_message(&api, line).await.unwrap();
        assert!(response["result"]["contents"][0]["text"]
            .as_str()
            .unwrap()
            .contains("titleCreatorYear"));

        let line = r#"{"jsonrpc":"2.0","id":6,"method":"resources/read","params":{"uri":"zotero://nope"}}"#;
        let response = handle_message(&api, line).await.unwrap();
        assert_eq!(response["error"]["code"], -32602);
    }
}
