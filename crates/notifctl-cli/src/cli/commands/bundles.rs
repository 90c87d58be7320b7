//! `notifctl bundles`: bundle and application reference data.

use anyhow::Result;
use comfy_table::{ContentArrangement, Table};
use notifctl_core::config::Config;
use notifctl_core::types::Facet;

pub async fn run(config: &Config) -> Result<()> {
    let client = super::connect(config)?;
    let bundles = super::fetch_bundles(&client).await?;
    if bundles.is_empty() {
        println!("No bundles found.");
        return Ok(());
    }
    println!("{}", bundle_table(&bundles));
    Ok(())
}

fn bundle_table(bundles: &[Facet]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(["Name", "Display name", "Applications"]);
    for bundle in bundles {
        let applications: Vec<&str> = bundle
            .children
            .iter()
            .map(|app| app.name.as_str())
            .collect();
        table.add_row([
            bundle.name.as_str(),
            bundle.display_name.as_str(),
            applications.join(", ").as_str(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facet(name: &str, display_name: &str, children: Vec<Facet>) -> Facet {
        Facet {
            id: format!("{name}-id"),
            name: name.to_string(),
            display_name: display_name.to_string(),
            children,
        }
    }

    #[test]
    fn test_bundle_table_lists_applications() {
        let bundles = vec![facet(
            "rhel",
            "Red Hat Enterprise Linux",
            vec![
                facet("advisor", "Advisor", Vec::new()),
                facet("policies", "Policies", Vec::new()),
            ],
        )];
        let rendered = bundle_table(&bundles).to_string();
        assert!(rendered.contains("Display name"));
        assert!(rendered.contains("rhel"));
        assert!(rendered.contains("advisor, policies"));
    }
}
