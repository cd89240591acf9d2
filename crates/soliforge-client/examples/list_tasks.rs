/*
[INPUT]:  SOLIFORGE_API_URL, SOLIFORGE_USERNAME, SOLIFORGE_PASSWORD
[OUTPUT]: First page of audit tasks printed to stdout
[POS]:    Examples - sign in and list tasks
[UPDATE]: When login or list endpoints change
*/

use soliforge_client::*;

/// Example: sign in and print the dashboard page
#[tokio::main]
async fn main() {
    println!("=== SoliForge Task List Example ===\n");

    let base_url = std::env::var("SOLIFORGE_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let username = std::env::var("SOLIFORGE_USERNAME").unwrap_or_default();
    let password = std::env::var("SOLIFORGE_PASSWORD").unwrap_or_default();

    let client = match SoliforgeClient::new(&base_url) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ HTTP client created for {}\n", client.base_url());

    println!("Signing in as {}...", username);
    if let Err(e) = client.login(&username, &password).await {
        println!("✗ Login failed: {}", e.detail());
        return;
    }
    println!("✓ Signed in\n");

    match client.list_tasks(&TaskListQuery::default()).await {
        Ok(page) => {
            println!("✓ {} task(s)", page.items.len());
            for task in page.items {
                println!("  {} {:<10} {}", task.short_id(), task.status.as_str(), task.name);
            }
        }
        Err(e) => println!("✗ Error: {}", e.detail()),
    }
}
