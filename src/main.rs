//! Council CMS - binary entry point
//! Delegates to the library for all app logic.

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    council_cms::run().await
}
