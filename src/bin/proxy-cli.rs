use clap::{Parser, Subcommand};
use reqwest::Method;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "proxy-cli")]
#[command(about = "Command-line client for the posts/comments proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with posts
    Posts {
        #[command(subcommand)]
        action: PostAction,
    },
    /// List comments for a post
    Comments {
        #[arg(long)]
        post_id: u64,
        #[arg(long)]
        start: Option<usize>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Check that the proxy is up
    Health,
}

#[derive(Subcommand)]
enum PostAction {
    /// List posts
    List {
        #[arg(long)]
        start: Option<usize>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one post
    Get { id: u64 },
    /// Create a post
    Create {
        #[arg(long)]
        user_id: u64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
    },
    /// Update fields of a post
    Update {
        id: u64,
        #[arg(long)]
        user_id: Option<u64>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
    },
    /// Delete a post
    Delete { id: u64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Health => client.get(format!("{}/health", base)),
        Commands::Comments { post_id, start, limit } => {
            let mut query = vec![("postId", post_id.to_string())];
            query.extend(page_query(start, limit));
            client.get(format!("{}/comments/", base)).query(&query)
        }
        Commands::Posts { action } => match action {
            PostAction::List { start, limit } => client
                .get(format!("{}/posts/", base))
                .query(&page_query(start, limit)),
            PostAction::Get { id } => client.get(format!("{}/posts/{}", base, id)),
            PostAction::Create { user_id, title, body } => client
                .post(format!("{}/posts/", base))
                .json(&json!({ "userId": user_id, "title": title, "body": body })),
            PostAction::Update { id, user_id, title, body } => {
                let mut payload = serde_json::Map::new();
                if let Some(user_id) = user_id {
                    payload.insert("userId".into(), json!(user_id));
                }
                if let Some(title) = title {
                    payload.insert("title".into(), json!(title));
                }
                if let Some(body) = body {
                    payload.insert("body".into(), json!(body));
                }
                client
                    .request(Method::PATCH, format!("{}/posts/{}", base, id))
                    .json(&Value::Object(payload))
            }
            PostAction::Delete { id } => client.delete(format!("{}/posts/{}", base, id)),
        },
    };

    let res = request.send().await?;
    print_response(res).await?;
    Ok(())
}

fn page_query(start: Option<usize>, limit: Option<usize>) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(start) = start {
        query.push(("start", start.to_string()));
    }
    if let Some(limit) = limit {
        query.push(("limit", limit.to_string()));
    }
    query
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
