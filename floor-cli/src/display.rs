//! Plain-text rendering of orders and reference data for the terminal.

use std::fmt::Write;

use chrono::NaiveDate;
use floor_core::{Order, Product, State};
use rust_decimal::Decimal;

pub fn us_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

fn money(amount: Decimal) -> String {
    format!("${amount:.2}")
}

/// Multi-line view of one order, as shown before a confirmation.
pub fn order_details(order: &Order) -> String {
    let mut out = String::new();
    // Writing into a String never fails.
    let _ = writeln!(out, "Order #{}  ({})", order.order_number, us_date(order.order_date));
    let _ = writeln!(out, "  Customer:        {}", order.customer_name);
    let _ = writeln!(out, "  State:           {} ({}%)", order.state, order.tax_rate);
    let _ = writeln!(out, "  Product:         {}", order.product_type);
    let _ = writeln!(out, "  Area:            {} sq ft", order.area);
    let _ = writeln!(
        out,
        "  Rates:           {} material, {} labor per sq ft",
        money(order.cost_per_square_foot),
        money(order.labor_cost_per_square_foot)
    );
    let _ = writeln!(out, "  Material cost:   {}", money(order.material_cost));
    let _ = writeln!(out, "  Labor cost:      {}", money(order.labor_cost));
    let _ = writeln!(out, "  Tax:             {}", money(order.tax));
    let _ = writeln!(out, "  Total:           {}", money(order.total));
    out
}

pub fn order_table(orders: &[Order]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:<24} {:<5} {:<10} {:>10} {:>12}",
        "Number", "Customer", "State", "Product", "Area", "Total"
    );
    for order in orders {
        let _ = writeln!(
            out,
            "{:>6}  {:<24} {:<5} {:<10} {:>10} {:>12}",
            order.order_number,
            order.customer_name,
            order.state,
            order.product_type,
            order.area,
            money(order.total)
        );
    }
    out
}

pub fn product_table(products: &[&Product]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12} {:>10} {:>10}", "Product", "Material", "Labor");
    for product in products {
        let _ = writeln!(
            out,
            "{:<12} {:>10} {:>10}",
            product.product_type,
            money(product.cost_per_square_foot),
            money(product.labor_cost_per_square_foot)
        );
    }
    out
}

pub fn state_table(states: &[&State]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<5} {:<20} {:>8}", "State", "Name", "Tax rate");
    for state in states {
        let _ = writeln!(
            out,
            "{:<5} {:<20} {:>7}%",
            state.abbreviation, state.name, state.tax_rate
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn order() -> Order {
        Order {
            order_number: 1,
            order_date: NaiveDate::from_ymd_opt(2013, 6, 1).unwrap(),
            customer_name: "Ada Lovelace".to_string(),
            state: "CA".to_string(),
            tax_rate: dec!(25.00),
            product_type: "Tile".to_string(),
            area: dec!(249.00),
            cost_per_square_foot: dec!(3.50),
            labor_cost_per_square_foot: dec!(4.15),
            material_cost: dec!(871.50),
            labor_cost: dec!(1033.35),
            tax: dec!(476.21),
            total: dec!(2381.06),
        }
    }

    #[test]
    fn dates_are_shown_month_first() {
        assert_eq!(us_date(NaiveDate::from_ymd_opt(2013, 6, 1).unwrap()), "06/01/2013");
    }

    #[test]
    fn money_has_two_places() {
        assert_eq!(money(dec!(5)), "$5.00");
        assert_eq!(money(dec!(2381.06)), "$2381.06");
    }

    #[test]
    fn details_show_every_derived_field() {
        let text = order_details(&order());

        assert!(text.starts_with("Order #1  (06/01/2013)\n"));
        for expected in ["$871.50", "$1033.35", "$476.21", "$2381.06", "Ada Lovelace"] {
            assert!(text.contains(expected), "missing {expected} in:\n{text}");
        }
    }

    #[test]
    fn table_has_header_and_one_line_per_order() {
        let mut second = order();
        second.order_number = 2;

        let text = order_table(&[order(), second]);

        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().nth(2).unwrap().trim_start().starts_with('2'));
    }
}
