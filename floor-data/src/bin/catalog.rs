use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use floor_data::CatalogLoader;

/// Check a products file and a tax rates file and print what they contain.
///
/// The products file needs the columns ProductType, CostPerSquareFoot and
/// LaborCostPerSquareFoot. The tax rates file needs State, StateName and
/// TaxRate (a percentage, e.g. 6.25).
#[derive(Parser, Debug)]
#[command(name = "floor-catalog")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the products file
    #[arg(short, long, default_value = "Data/Products.txt")]
    products: PathBuf,

    /// Path to the tax rates file
    #[arg(short, long, default_value = "Data/Taxes.txt")]
    states: PathBuf,

    /// Field delimiter used by both files
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if !args.delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character");
    }
    let loader = CatalogLoader::new(args.delimiter as u8);

    let catalog = loader.load(&args.products, &args.states).with_context(|| {
        format!(
            "Failed to load reference data from '{}' and '{}'",
            args.products.display(),
            args.states.display()
        )
    })?;

    println!("Products ({}):", catalog.products().len());
    for product in catalog.products() {
        println!(
            "  {:<12} material {:>8}  labor {:>8}",
            product.product_type, product.cost_per_square_foot, product.labor_cost_per_square_foot
        );
    }

    println!("States ({}):", catalog.states().len());
    for state in catalog.states() {
        println!("  {:<4} {:<20} {:>6}%", state.abbreviation, state.name, state.tax_rate);
    }

    if catalog.products().is_empty() || catalog.states().is_empty() {
        bail!("reference data is incomplete: orders need at least one product and one state");
    }

    Ok(())
}
