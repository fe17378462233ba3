use catalog::CatalogOptions;
use catalog_adapter::{Controller, HttpSource, HttpSourceConfig};

fn main() {
    // Example: one fetch against the public endpoint (or the URL given as the first argument).
    let mut config = HttpSourceConfig::default();
    if let Some(endpoint) = std::env::args().nth(1) {
        config = config.with_endpoint(endpoint);
    }

    let source = match HttpSource::from_config(&config) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    let mut c = Controller::new(CatalogOptions::default(), source);
    let outcome = c.fetch(0);
    println!("{outcome:?} status={:?}", c.catalog().status());
    if let Some(error) = c.catalog().error() {
        println!("error: {error}");
    }
    for item in c.catalog().displayed_items() {
        println!(
            "  {:<40} {:<16} {}",
            item.title,
            item.user_name,
            item.price_label().unwrap_or_default()
        );
    }
}
