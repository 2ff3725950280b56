//! `shopcart products ...` commands.

use std::io::Write;

use shopcart_core::{Product, ProductId};
use shopcart_store::{Catalog, DEFAULT_RELATED_LIMIT, SearchQuery, format_money};

use super::CommandError;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

fn write_row(product: &Product, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(
        out,
        "{:>4}  {:<28} {:>9}  {}",
        product.id.as_str(),
        product.title,
        format_money(product.price.amount_or_zero()),
        product.category,
    )
}

/// List every product.
pub fn list(catalog: &Catalog, out: &mut impl Write) -> CommandResult {
    for product in catalog.products() {
        write_row(product, out)?;
    }
    Ok(())
}

/// Show one product with related products.
pub fn show(catalog: &Catalog, id: &str, out: &mut impl Write) -> CommandResult {
    let id = ProductId::new(id);
    let product = catalog
        .get(&id)
        .ok_or_else(|| CommandError::UnknownProduct(id.clone()))?;

    writeln!(out, "{}", product.title)?;
    writeln!(out, "Price:    {}", format_money(product.price.amount_or_zero()))?;
    if !product.category.is_empty() {
        writeln!(out, "Category: {}", product.category)?;
    }
    if let Some(sku) = &product.sku {
        writeln!(out, "SKU:      {sku}")?;
    }
    if !product.tags.is_empty() {
        writeln!(out, "Tags:     {}", product.tags.join(", "))?;
    }
    if !product.description.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", product.description)?;
    }

    let related = catalog.related(&id, DEFAULT_RELATED_LIMIT);
    if !related.is_empty() {
        writeln!(out)?;
        writeln!(out, "Related:")?;
        for product in related {
            write_row(product, out)?;
        }
    }
    Ok(())
}

/// Search by term and category.
pub fn search(
    catalog: &Catalog,
    term: String,
    category: Option<String>,
    out: &mut impl Write,
) -> CommandResult {
    let query = SearchQuery { term, category };
    if !query.is_active() {
        writeln!(
            out,
            "Enter at least 2 characters or choose a category to search."
        )?;
        return Ok(());
    }

    let results = catalog.search(&query);
    if results.is_empty() {
        writeln!(out, "No products found matching your search.")?;
    }
    for product in results {
        write_row(product, out)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn output(f: impl FnOnce(&mut Vec<u8>) -> CommandResult) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_list() {
        let catalog = Catalog::demo();
        let text = output(|out| list(&catalog, out));
        assert_eq!(text.lines().count(), 8);
        assert!(text.contains("Small BookShelf"));
        assert!(text.contains("$960.00"));
    }

    #[test]
    fn test_show_with_related() {
        let catalog = Catalog::demo();
        let text = output(|out| show(&catalog, "4", out));
        assert!(text.starts_with("S-Series Comfort Chair\n"));
        assert!(text.contains("SKU:      CH-S-COMFORT"));
        assert!(text.contains("Related:"));
        assert!(!text.contains("Small BookShelf"));
    }

    #[test]
    fn test_search() {
        let catalog = Catalog::demo();
        let text = output(|out| search(&catalog, String::new(), Some("Furniture".into()), out));
        assert_eq!(text.lines().count(), 2);

        let text = output(|out| search(&catalog, "z".into(), None, out));
        assert!(text.starts_with("Enter at least 2 characters"));

        let text = output(|out| search(&catalog, "spaceship".into(), None, out));
        assert_eq!(text, "No products found matching your search.\n");
    }
}
