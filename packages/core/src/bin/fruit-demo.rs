//! Fruit CRUD Demo
//!
//! Console consumer of the record client, running the add / update / delete
//! flow of the fruit list against the in-memory backend.
//!
//! # Usage
//!
//! ```bash
//! # Add the default fruits
//! cargo run --bin fruit-demo
//!
//! # Add specific fruits
//! cargo run --bin fruit-demo -- Mango Papaya
//! ```
//!
//! # Environment Variables
//!
//! - `CLOUDNOTES_CONFIG`: Path to a JSON client config (defaults used if unset)
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use cloudnotes_core::{
    ClientConfig, Filter, Fruit, InMemoryBackend, RecordClient, RecordId, SortDescriptor,
    UserIdentity,
};
use url::Url;

const DEFAULT_FRUITS: [&str; 4] = ["Banana", "Apple", "", "Cherry"];

/// Fruit list state, as a list screen would hold it
struct FruitList {
    client: RecordClient,
    fruits: Vec<Fruit>,
}

impl FruitList {
    fn new(client: RecordClient) -> Self {
        Self {
            client,
            fruits: Vec::new(),
        }
    }

    async fn refresh(&mut self) {
        self.fruits = self
            .client
            .fetch_all(Filter::all().sorted_by(SortDescriptor::ascending("name")))
            .await;
    }

    async fn add(&mut self, name: &str) {
        if name.is_empty() {
            tracing::debug!("Ignoring empty fruit name");
            return;
        }

        // Image bytes are expected to be cached here already
        let image_url = Url::from_file_path(env::temp_dir().join(format!("{}.jpg", name))).ok();

        match self.client.save(Fruit::new(name, image_url)).await {
            Ok(fruit) => tracing::info!("Added '{}'", fruit.name()),
            Err(e) => tracing::warn!("Could not add '{}': {}", name, e),
        }
        self.refresh().await;
    }

    async fn update(&mut self, position: usize) {
        let Some(mut fruit) = self.fruits.get(position).cloned() else {
            return;
        };

        let name = format!("{}*", fruit.name());
        fruit.set_name(name);
        match self.client.save(fruit).await {
            Ok(fruit) => tracing::info!("Renamed to '{}'", fruit.name()),
            Err(e) => tracing::warn!("Could not update fruit: {}", e),
        }
        self.refresh().await;
    }

    async fn delete(&mut self, position: usize) {
        match self.client.delete(position, &self.fruits).await {
            Ok(_) => tracing::info!("Deleted fruit at position {}", position),
            Err(e) => tracing::warn!("Could not delete fruit: {}", e),
        }
        self.refresh().await;
    }

    fn print(&self) {
        for fruit in &self.fruits {
            let image = fruit
                .image_url()
                .map(|url| url.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("  {:<12} {}", fruit.name(), image);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match env::var("CLOUDNOTES_CONFIG") {
        Ok(path) => ClientConfig::load(&PathBuf::from(path))
            .await
            .map_err(anyhow::Error::msg)?,
        Err(_) => ClientConfig::default(),
    };
    config.validate().map_err(anyhow::Error::msg)?;

    tracing::info!("Container: {}", config.container_identifier);

    let backend = Arc::new(InMemoryBackend::from_config(&config));
    backend.set_current_user(
        RecordId::from_name("_demo-user"),
        UserIdentity::new(Some("Alex"), None),
    )?;
    let client = RecordClient::with_config(backend, &config);

    if let Err(e) = client.account_status().await {
        tracing::error!("{}", e);
        return Ok(());
    }

    if let Err(e) = client.request_permission().await {
        tracing::warn!("{}", e);
    }

    match client.discover_current_user_identity().await {
        Ok(name) => tracing::info!("Welcome, {}", name),
        Err(e) => tracing::warn!("{}", e),
    }

    let names: Vec<String> = match env::args().skip(1).collect::<Vec<_>>() {
        args if args.is_empty() => DEFAULT_FRUITS.iter().map(|s| s.to_string()).collect(),
        args => args,
    };

    let mut list = FruitList::new(client);
    for name in &names {
        list.add(name).await;
    }
    println!("Fruits:");
    list.print();

    list.update(0).await;
    list.delete(0).await;

    println!("After update and delete:");
    list.print();

    Ok(())
}
