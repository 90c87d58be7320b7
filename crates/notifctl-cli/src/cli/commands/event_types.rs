//! `notifctl event-types`: one page of a filtered collection.

use anyhow::{Context, Result};
use comfy_table::{ContentArrangement, Table};
use notifctl_core::config::Config;
use notifctl_core::types::{EventType, Page, PageDescriptor};

use super::Collection;

pub async fn run(config: &Config, collection: &Collection, page: u64, json: bool) -> Result<()> {
    let client = super::connect(config)?;
    let bundles = super::fetch_bundles(&client).await?;
    let bundle = super::resolve_bundle(&bundles, &collection.bundle)?;
    let descriptor = collection.descriptor(config, bundle, page)?;

    let loaded = client
        .event_types(&descriptor, &bundle.display_name)
        .await
        .with_context(|| format!("load page {page} of '{}'", bundle.display_name))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&loaded.items)?);
    } else if loaded.items.is_empty() {
        println!("No event types match.");
    } else {
        println!("{}", event_type_table(&loaded.items));
    }
    eprintln!("{}", page_footer(&descriptor, &loaded));
    Ok(())
}

fn event_type_table(items: &[EventType]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(["Id", "Event type", "Application", "Description"]);
    for event in items {
        table.add_row([
            event.id.as_str(),
            event.display_name.as_str(),
            event.application_display_name.as_str(),
            event.description.as_deref().unwrap_or(""),
        ]);
    }
    table
}

fn page_footer(descriptor: &PageDescriptor, page: &Page<EventType>) -> String {
    format!(
        "page {} / {} (total {})",
        descriptor.index(),
        descriptor.last_page_index(page.total_count),
        page.total_count
    )
}

#[cfg(test)]
mod tests {
    use notifctl_core::types::EventTypeFilters;

    use super::*;

    #[test]
    fn test_page_footer_counts_pages() {
        let descriptor = PageDescriptor::new(2, 10, EventTypeFilters::for_bundle("b1"));
        let page = Page {
            items: Vec::new(),
            total_count: 25,
        };
        assert_eq!(page_footer(&descriptor, &page), "page 2 / 3 (total 25)");
    }

    #[test]
    fn test_event_type_table_has_rows() {
        let items = vec![EventType {
            id: "e1".to_string(),
            name: "new-recommendation".to_string(),
            display_name: "New recommendation".to_string(),
            application_display_name: "Advisor".to_string(),
            bundle_display_name: "Red Hat Enterprise Linux".to_string(),
            description: None,
        }];
        let rendered = event_type_table(&items).to_string();
        assert!(rendered.contains("New recommendation"));
        assert!(rendered.contains("Advisor"));
    }
}
