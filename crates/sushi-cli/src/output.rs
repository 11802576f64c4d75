//! Output formatting module

use chrono::Local;
use serde::Serialize;
use sushi_app::app::{OrderQuote, ShiftReport};
use sushi_app::config::Config;
use sushi_domain::model::{Customer, MenuItem, Order};
use sushi_domain::service::classify_station;
use sushi_types::{OutputFormat, Result};

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    println!("{}", content);
    Ok(())
}

pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

pub fn output_quote(format: OutputFormat, config: &Config, quote: &OrderQuote) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(quote);
    }

    println!("\nQuote");
    println!("=====");
    if let Some(ref customer) = quote.customer {
        println!("Customer:   {} ({})", customer.name, customer.phone);
    }
    print_lines(config, &quote.lines);

    println!("{}", "-".repeat(56));
    println!("Subtotal:   {}", config.format_amount(quote.subtotal));
    match quote.destination() {
        Some(_) => println!(
            "Delivery:   {} ({}, {:.1} km)",
            config.format_amount(quote.delivery.fee),
            quote.delivery.zone_name,
            quote.delivery.distance_km
        ),
        None => println!("Delivery:   {} (pickup)", config.format_amount(quote.delivery.fee)),
    }
    println!("Total:      {}", config.format_amount(quote.total));

    let eta = &quote.eta;
    println!("\n--- Kitchen ---");
    println!(
        "Load (min):  cold {} + {} / hot {} + {}",
        eta.queue_load.cold, eta.cart_load.cold, eta.queue_load.hot, eta.cart_load.hot
    );
    println!("Stations:    cold {} / hot {}", eta.capacity.cold, eta.capacity.hot);
    println!("Per station: cold {} min / hot {} min", eta.cold_minutes, eta.hot_minutes);
    println!("---------------");
    let bottleneck = eta
        .bottleneck
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| "minimum".to_string());
    println!(
        "ETA:         {} min ({}), ready at {}",
        eta.minutes,
        bottleneck,
        quote.ready_at.with_timezone(&Local).format("%H:%M")
    );

    Ok(())
}

fn print_lines(config: &Config, lines: &[sushi_domain::model::OrderLine]) {
    println!("{:<4} {:<32} {:>8} {:>10}", "Qty", "Item", "Minutes", "Amount");
    for line in lines {
        let minutes = line
            .cooking_time_minutes
            .map(|m| format!("{:.0}", m))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<4} {:<32} {:>8} {:>10}",
            line.quantity,
            truncate(&line.name, 32),
            minutes,
            config.format_amount(line.line_total())
        );
    }
}

pub fn output_order(format: OutputFormat, config: &Config, order: &Order) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(order);
    }

    println!("\nOrder #{}", order.number);
    println!("=========");
    println!("Status:     {}", order.status);
    println!("Customer:   {}", order.customer_name);
    if let Some(ref phone) = order.phone {
        println!("Phone:      {}", phone);
    }
    if let Some(ref address) = order.address {
        println!("Address:    {}", address);
    }
    println!("Payment:    {}", order.payment_method);
    println!();
    print_lines(config, &order.lines);
    println!("{}", "-".repeat(56));
    println!("Subtotal:   {}", config.format_amount(order.subtotal));
    println!(
        "Delivery:   {} ({})",
        config.format_amount(order.delivery.fee),
        order.delivery.zone_name
    );
    println!("Total:      {}", config.format_amount(order.total));
    println!(
        "ETA:        {} min, ready at {}",
        order.eta_minutes,
        order.ready_at.with_timezone(&Local).format("%H:%M")
    );
    if let Some(delivered) = order.delivered_at {
        println!("Delivered:  {}", delivered.with_timezone(&Local).format("%H:%M"));
    }

    Ok(())
}

pub fn output_orders(format: OutputFormat, config: &Config, orders: &[&Order], limit: usize) -> Result<()> {
    if format == OutputFormat::Json {
        let shown: Vec<_> = orders.iter().take(limit).collect();
        return print_json(&shown);
    }

    println!("Orders");
    println!("======");
    if orders.is_empty() {
        println!("No orders found.");
        return Ok(());
    }

    println!(
        "{:>5} {:<10} {:<20} {:>10} {:<16} {:>6}",
        "#", "Status", "Customer", "Total", "Zone", "Ready"
    );
    println!("{}", "-".repeat(72));
    for order in orders.iter().take(limit) {
        println!(
            "{:>5} {:<10} {:<20} {:>10} {:<16} {:>6}",
            order.number,
            order.status.label(),
            truncate(&order.customer_name, 20),
            config.format_amount(order.total),
            truncate(&order.delivery.zone_name, 16),
            order.ready_at.with_timezone(&Local).format("%H:%M")
        );
    }

    if orders.len() > limit {
        println!();
        println!("... and {} more orders", orders.len() - limit);
    }

    Ok(())
}

pub fn output_menu(format: OutputFormat, config: &Config, items: &[&MenuItem]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(items);
    }

    println!("Menu");
    println!("====");
    if items.is_empty() {
        println!("No items found.");
        return Ok(());
    }

    println!(
        "{:<10} {:<30} {:<12} {:>10} {:>6} {:<8} {:<5}",
        "ID", "Name", "Category", "Price", "Min", "Station", "Avail"
    );
    println!("{}", "-".repeat(87));
    for item in items {
        let minutes = item
            .cooking_time_minutes
            .map(|m| format!("{:.0}", m))
            .unwrap_or_else(|| "-".to_string());
        // guessed stations are marked with '*'
        let station = match item.station {
            Some(station) => station.label().to_string(),
            None => format!("{}*", classify_station(&item.name).label()),
        };
        println!(
            "{:<10} {:<30} {:<12} {:>10} {:>6} {:<8} {:<5}",
            truncate(&item.id, 10),
            truncate(&item.name, 30),
            truncate(&item.category, 12),
            config.format_amount(item.price),
            minutes,
            station,
            if item.available { "yes" } else { "no" }
        );
    }

    Ok(())
}

pub fn output_shift(format: OutputFormat, config: &Config, report: &ShiftReport) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(report);
    }

    let shift = &report.shift;
    let summary = &report.summary;

    println!("\nCash Shift");
    println!("==========");
    println!("Id:             {}", shift.id);
    println!("Opened by:      {}", shift.opened_by);
    println!(
        "Opened at:      {}",
        shift.opened_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    );
    match shift.closed_at {
        Some(closed) => println!("Closed at:      {}", closed.with_timezone(&Local).format("%Y-%m-%d %H:%M")),
        None => println!("Status:         open"),
    }
    println!();
    println!("Opening cash:   {}", config.format_amount(summary.opening_cash));
    for (method, amount) in &summary.sales_by_method {
        println!("Sales {:<9} {}", format!("{}:", method), config.format_amount(*amount));
    }
    println!(
        "Total sales:    {} ({} sales)",
        config.format_amount(summary.total_sales),
        summary.sale_count
    );
    println!("Income:         {}", config.format_amount(summary.total_income));
    println!("Expenses:       {}", config.format_amount(summary.total_expense));
    println!("Expected cash:  {}", config.format_amount(summary.expected_cash));
    if let Some(counted) = summary.counted_cash {
        println!("Counted cash:   {}", config.format_amount(counted));
    }
    if let Some(difference) = summary.difference {
        println!("Difference:     {}", config.format_amount(difference));
    }

    Ok(())
}

pub fn output_customers(format: OutputFormat, customers: &[&Customer]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(customers);
    }

    println!("Customers");
    println!("=========");
    if customers.is_empty() {
        println!("No customers found.");
        return Ok(());
    }

    println!("{:<24} {:<14} {:<14} {:<30}", "Name", "Phone", "RUT", "Address");
    println!("{}", "-".repeat(84));
    for customer in customers {
        println!(
            "{:<24} {:<14} {:<14} {:<30}",
            truncate(&customer.name, 24),
            customer.phone,
            customer.rut.as_deref().unwrap_or("-"),
            truncate(customer.address.as_deref().unwrap_or("-"), 30)
        );
    }

    Ok(())
}
