//! CLI binary for the Zotero MCP server.
//!
//! Usage: zotero-mcp search "attention is all you need" --limit 5

#[cfg(feature = "cli")]
mod cli {
    use clap::{Parser, Subcommand};
    use tracing_subscriber::EnvFilter;
    use zotero_mcp::format::{self, fields};
    use zotero_mcp::{
        tools, Collection, Item, ItemData, QueryMode, SearchParams, ZoteroClient, ZoteroConfig,
        ZoteroError,
    };

    #[derive(Parser)]
    #[command(name = "zotero-mcp", about = "Zotero library tools and MCP server", version)]
    struct Cli {
        /// Library ID (overrides ZOTERO_LIBRARY_ID env var)
        #[arg(long, global = true)]
        library_id: Option<String>,

        /// Library type: user or group (overrides ZOTERO_LIBRARY_TYPE)
        #[arg(long, global = true)]
        library_type: Option<String>,

        /// API key (overrides ZOTERO_API_KEY env var)
        #[arg(long, global = true)]
        api_key: Option<String>,

        /// Use the local Zotero desktop API instead of the Web API
        #[arg(long, global = true)]
        local: bool,

        /// Log debug output to stderr
        #[arg(short, long, global = true)]
        verbose: bool,

        /// Output format
        #[arg(long, global = true, default_value = "markdown")]
        output: OutputFormat,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Clone, Copy, clap::ValueEnum)]
    enum OutputFormat {
        Markdown,
        Table,
        Json,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Start MCP server (stdio)
        Serve,
        /// Show metadata for an item
        Item {
            /// Item key
            key: String,
        },
        /// Show an item with the text of its best attachment
        Fulltext {
            /// Item or attachment key
            key: String,
        },
        /// Search the library
        Search {
            /// Quick search text
            query: String,
            /// Query mode (titleCreatorYear or everything)
            #[arg(short, long, default_value = "titleCreatorYear")]
            qmode: String,
            /// Tag filter (e.g. "ml || nlp", "-read")
            #[arg(short, long)]
            tag: Option<String>,
            /// Maximum results to return
            #[arg(short, long, default_value = "10")]
            limit: u32,
        },
        /// List collections
        Collections,
        /// Add tags to an item
        Tag {
            /// Item key
            key: String,
            /// Tags to add
            #[arg(required = true)]
            tags: Vec<String>,
        },
        /// Restore an item from the trash
        Restore {
            /// Item key
            key: String,
        },
    }

    fn init_logging(verbose: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if verbose {
            EnvFilter::new("zotero_mcp=debug")
        } else {
            EnvFilter::new("warn")
        };

        // stdout carries the MCP protocol, so logs go to stderr.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    fn make_config(cli: &Cli) -> zotero_mcp::error::Result<ZoteroConfig> {
        ZoteroConfig::from_lookup(|name| {
            let flag = match name {
                "ZOTERO_LIBRARY_ID" => cli.library_id.clone(),
                "ZOTERO_LIBRARY_TYPE" => cli.library_type.clone(),
                "ZOTERO_API_KEY" => cli.api_key.clone(),
                "ZOTERO_LOCAL" => cli.local.then(|| "true".to_string()),
                _ => None,
            };
            flag.or_else(|| std::env::var(name).ok())
        })
    }

    fn truncate(text: &str, max: usize) -> String {
        if text.chars().count() > max {
            let head: String = text.chars().take(max - 3).collect();
            format!("{}...", head)
        } else {
            text.to_string()
        }
    }

    fn print_items_table(items: &[Item]) {
        use comfy_table::{ContentArrangement, Table};

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Key", "Type", "Date", "Authors", "Title"]);

        for item in items {
            let (date, authors, title) = match &item.data {
                ItemData::Regular(data) => (
                    data.date.clone().unwrap_or_default(),
                    fields::creator_summary(&data.creators),
                    data.title.clone().unwrap_or_else(|| "Untitled".to_string()),
                ),
                ItemData::Note(note) => (
                    String::new(),
                    String::new(),
                    fields::note_title(&fields::note_to_markdown(
                        note.note.as_deref().unwrap_or_default(),
                    )),
                ),
            };

            table.add_row(vec![
                item.key.clone(),
                item.item_type().to_string(),
                date,
                truncate(&authors, 40),
                truncate(&title, 60),
            ]);
        }

        println!("{table}");
    }

    fn print_collections_table(collections: &[Collection]) {
        use comfy_table::{ContentArrangement, Table};

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Key", "Name", "Parent", "Items"]);
        for collection in collections {
            table.add_row(vec![
                collection.key.clone(),
                collection.name.clone(),
                collection.parent_collection.clone().unwrap_or_default(),
                collection.num_items.to_string(),
            ]);
        }
        println!("{table}");
    }

    pub async fn run() -> zotero_mcp::error::Result<()> {
        let cli = Cli::parse();
        init_logging(cli.verbose);
        let client = ZoteroClient::new(make_config(&cli)?);
        tracing::debug!(library = %client.config().library_prefix(), local = client.config().local, "configured");

        match cli.command {
            Commands::Serve => {
                zotero_mcp::mcp::run_server(client).await?;
            }

            Commands::Item { key } => {
                let item = client
                    .item(&key)
                    .await?
                    .ok_or_else(|| ZoteroError::NotFound(tools::not_found(&key)))?;
                match cli.output {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&item)?),
                    OutputFormat::Markdown | OutputFormat::Table => {
                        println!("{}", format::render_item(&item))
                    }
                }
            }

            Commands::Fulltext { key } => {
                println!("{}", tools::item_fulltext(&client, &key).await);
            }

            Commands::Search {
                query,
                qmode,
                tag,
                limit,
            } => {
                let mode = QueryMode::from_str_loose(&qmode).ok_or_else(|| {
                    ZoteroError::InvalidArgs(format!(
                        "qmode must be titleCreatorYear or everything, got '{}'",
                        qmode
                    ))
                })?;
                let mut params = SearchParams::new(&query).mode(mode).limit(limit);
                if let Some(tag) = tag {
                    params = params.tag(tag);
                }

                let items = client.search(&params).await?;
                match cli.output {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&items)?),
                    OutputFormat::Table => {
                        println!("Found {} items:", items.len());
                        print_items_table(&items);
                    }
                    OutputFormat::Markdown => println!(
                        "{}",
                        format::render_search_results(&query, params.tag.as_deref(), &items)
                    ),
                }
            }

            Commands::Collections => {
                let collections = client.collections().await?;
                match cli.output {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&collections)?)
                    }
                    OutputFormat::Table => print_collections_table(&collections),
                    OutputFormat::Markdown => {
                        println!("{}", format::render_collections(&collections))
                    }
                }
            }

            Commands::Tag { key, tags } => {
                println!("{}", tools::add_tags(&client, &key, &tags).await);
            }

            Commands::Restore { key } => {
                println!("{}", tools::restore_from_trash(&client, &key).await);
            }
        }

        Ok(())
    }
}

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This binary requires the 'cli' feature. Build with: cargo build --features cli");
    std::process::exit(1);
}
