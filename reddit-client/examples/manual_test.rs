use reddit_client::{RedditClient, RedditCredentials};
use std::io::{self, Write};

fn prompt(label: &str) -> Result<String, io::Error> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    println!("=== Reddit API Manual Test ===\n");

    println!("📋 Setup Instructions:");
    println!("1. Go to https://www.reddit.com/prefs/apps");
    println!("2. Create a new app (type: 'script')");
    println!("3. Use the client ID, secret, and your account credentials below\n");

    let client_id = prompt("Enter Reddit Client ID: ")?;
    if client_id.is_empty() {
        println!("❌ Client ID cannot be empty. Please create a Reddit app first.");
        return Ok(());
    }

    let client_secret = prompt("Enter Reddit Client Secret: ")?;
    if client_secret.is_empty() {
        println!("❌ Client Secret cannot be empty. Please create a Reddit app first.");
        return Ok(());
    }

    let username = prompt("Enter Reddit username: ")?;
    let password = prompt("Enter Reddit password: ")?;
    if username.is_empty() || password.is_empty() {
        println!("❌ Username and password are required for the script-app flow.");
        return Ok(());
    }

    let credentials = RedditCredentials {
        client_id,
        client_secret,
        username,
        password,
        user_agent: "pradon-bot manual test".to_string(),
    };

    let client = RedditClient::new(credentials)?;
    println!("✅ Reddit client created successfully\n");

    let mut subreddit = prompt("Subreddit to read [quotes]: ")?;
    if subreddit.is_empty() {
        subreddit = "quotes".to_string();
    }

    // The first request runs the password grant.
    println!("\n📰 Getting newest submissions from r/{}...", subreddit);
    match client.new_submissions(&subreddit, 5).await {
        Ok(items) => {
            println!("✅ Found {} submissions:", items.len());
            for (i, item) in items.iter().enumerate() {
                let fields = item.text_fields();
                let title = fields.first().copied().unwrap_or("");
                println!("   {}. [{}] {}", i + 1, item.fullname(), title);
            }
            println!();
        }
        Err(e) => {
            println!("❌ Failed to get submissions: {}\n", e);
            return Ok(());
        }
    }

    println!("💬 Getting newest comments from r/{}...", subreddit);
    match client.new_comments(&subreddit, 5).await {
        Ok(items) => {
            println!("✅ Found {} comments:", items.len());
            for (i, item) in items.iter().enumerate() {
                let fields = item.text_fields();
                let body = fields.first().copied().unwrap_or("");
                let preview: String = body.chars().take(80).collect();
                println!("   {}. [{}] {}", i + 1, item.fullname(), preview);
            }
            println!();
        }
        Err(e) => {
            println!("❌ Failed to get comments: {}\n", e);
        }
    }

    println!("📬 Getting inbox items...");
    match client.inbox_messages(5).await {
        Ok(items) => {
            println!("✅ Found {} inbox items:", items.len());
            for (i, item) in items.iter().enumerate() {
                println!("   {}. [{}] by {}", i + 1, item.fullname(), item.author());
            }
        }
        Err(e) => {
            println!("❌ Failed to get inbox: {}", e);
        }
    }

    println!("\n🎉 Manual test completed successfully!");
    Ok(())
}
