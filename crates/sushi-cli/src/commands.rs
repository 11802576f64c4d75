//! Command handlers

use crate::cli::{Cli, Commands, CustomerCommand, MenuCommand, OrderArgs, OrderCommand, ShiftCommand};
use crate::output::{
    output_customers, output_menu, output_order, output_orders, output_quote, output_shift, print_json,
};
use chrono::{Local, Utc};
use std::path::PathBuf;
use sushi_app::app::{
    close_shift, import_menu, open_shift, record_movement, record_order_sale, shift_report, OrderRequest,
    OrderService, ShiftReport,
};
use sushi_app::config::Config;
use sushi_app::export::export_shift_report;
use sushi_app::repository::{open_menu_store, open_order_store, open_shift_store};
use sushi_domain::model::{CashMovement, Customer, MenuItem, Order};
use sushi_domain::repository::CashShiftRepository;
use sushi_domain::service::{normalize_phone, Rut};
use sushi_store::{CatalogEvent, CatalogSubscriber, OrderStore};
use sushi_types::{Coordinate, OutputFormat, Result, StoreError, ValidationError};

pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref store_dir) = cli.store_dir {
        config.store_dir = Some(store_dir.clone());
    }
    let format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Quote(args) => cmd_quote(&config, format, &args),
        Commands::Order(command) => cmd_order(&config, format, command),
        Commands::Menu(command) => cmd_menu(&config, format, command),
        Commands::Shift(command) => cmd_shift(&config, format, command),
        Commands::Customer(command) => cmd_customer(&config, format, command),
        Commands::Rut { value } => cmd_rut(format, &value),
        Commands::Config {
            show,
            set_origin,
            set_zones,
            set_capacity,
            set_output,
            reset,
        } => cmd_config(show, set_origin, set_zones, set_capacity, set_output, reset),
    }
}

fn order_request(args: &OrderArgs) -> OrderRequest {
    let destination = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
        _ => None,
    };
    OrderRequest {
        items: args.items.clone(),
        destination,
        customer_phone: args.phone.clone(),
        customer_name: args.name.clone(),
        address: args.address.clone(),
        payment_method: args.payment,
        pickup: args.pickup,
    }
}

fn find_order<'a>(orders: &'a OrderStore, number: u32) -> Result<&'a Order> {
    orders
        .get_by_number(number)
        .ok_or_else(|| StoreError::NotFound(format!("order #{}", number)).into())
}

fn cmd_quote(config: &Config, format: OutputFormat, args: &OrderArgs) -> Result<()> {
    let menu = open_menu_store(config)?;
    let orders = open_order_store(config)?;
    let service = OrderService::from_config(config)?;

    let quote = service.quote(&menu, &orders, &order_request(args), Local::now())?;
    output_quote(format, config, &quote)
}

fn cmd_order(config: &Config, format: OutputFormat, command: OrderCommand) -> Result<()> {
    let mut orders = open_order_store(config)?;

    match command {
        OrderCommand::Create(args) => {
            let menu = open_menu_store(config)?;
            let service = OrderService::from_config(config)?;
            let order = service.create(&menu, &mut orders, &order_request(&args), Local::now())?;

            // The sale lands in the drawer only while a shift is open
            let mut shifts = open_shift_store(config)?;
            if shifts.find_open()?.is_some() {
                record_order_sale(&mut shifts, &order, Utc::now())?;
            } else {
                tracing::warn!(number = order.number, "no open cash shift, sale not recorded");
            }

            output_order(format, config, &order)
        }
        OrderCommand::List { all, limit } => {
            let list = if all {
                orders.all_orders()
            } else {
                orders.active_orders()
            };
            output_orders(format, config, &list, limit)
        }
        OrderCommand::Advance { number } => {
            let id = find_order(&orders, number)?.id.clone();
            let order = orders.advance(&id)?;
            if format == OutputFormat::Json {
                return print_json(&order);
            }
            println!("Order #{} is now {}", order.number, order.status);
            Ok(())
        }
        OrderCommand::Status { number, set } => {
            let id = find_order(&orders, number)?.id.clone();
            let order = match set {
                Some(status) => orders.set_status(&id, status)?,
                None => find_order(&orders, number)?.clone(),
            };
            output_order(format, config, &order)
        }
    }
}

fn cmd_menu(config: &Config, format: OutputFormat, command: MenuCommand) -> Result<()> {
    let mut menu = open_menu_store(config)?;

    // Report committed changes on stderr
    let logger: CatalogSubscriber = Box::new(|event| {
        match event {
            CatalogEvent::Upserted { id } => tracing::info!(%id, "menu item saved"),
            CatalogEvent::Removed { id } => tracing::info!(%id, "menu item removed"),
            CatalogEvent::AvailabilityChanged { id, available } => {
                tracing::info!(%id, available = *available, "menu item availability changed")
            }
            CatalogEvent::Reloaded { item_count } => tracing::info!(item_count = *item_count, "menu reloaded"),
        }
        Ok(())
    });
    menu.subscribe(logger);

    match command {
        MenuCommand::List { available, category } => {
            let items: Vec<&MenuItem> = menu
                .all_items()
                .into_iter()
                .filter(|i| !available || i.available)
                .filter(|i| {
                    category
                        .as_ref()
                        .map(|c| i.category.eq_ignore_ascii_case(c))
                        .unwrap_or(true)
                })
                .collect();
            output_menu(format, config, &items)
        }
        MenuCommand::Add {
            id,
            name,
            category,
            price,
            minutes,
            station,
            description,
        } => {
            if price < 0 {
                return Err(ValidationError::InvalidAmount(format!("price cannot be negative: {}", price)).into());
            }
            let mut item = MenuItem::new(id, name, category, price);
            item.cooking_time_minutes = minutes;
            item.station = station;
            item.description = description;
            menu.upsert(item.clone())?;
            output_menu(format, config, &[&item])
        }
        MenuCommand::Remove { id } => {
            if menu.remove_item(&id)? {
                println!("Removed {}", id);
            } else {
                println!("No item {}", id);
            }
            Ok(())
        }
        MenuCommand::Toggle { id, available } => {
            let current = menu
                .get(&id)
                .ok_or_else(|| StoreError::NotFound(format!("menu item {}", id)))?
                .available;
            let target = available.unwrap_or(!current);
            menu.set_availability(&id, target)?;
            println!("{} is now {}", id, if target { "available" } else { "unavailable" });
            Ok(())
        }
        MenuCommand::Import { file } => {
            let summary = import_menu(&mut menu, &file)?;
            if format == OutputFormat::Json {
                return print_json(&summary);
            }
            println!(
                "Imported {} items: {} new, {} updated, {} unchanged",
                summary.total(),
                summary.inserted,
                summary.updated,
                summary.unchanged
            );
            Ok(())
        }
        MenuCommand::Reload => {
            if menu.reload_if_changed()? {
                println!("Menu reloaded: {} items", menu.count());
            } else {
                println!("Menu unchanged");
            }
            Ok(())
        }
    }
}

fn cmd_shift(config: &Config, format: OutputFormat, command: ShiftCommand) -> Result<()> {
    let mut shifts = open_shift_store(config)?;

    match command {
        ShiftCommand::Open { by, cash } => {
            let shift = open_shift(&mut shifts, &by, cash, Utc::now())?;
            output_shift(format, config, &ShiftReport::from(shift))
        }
        ShiftCommand::Record {
            kind,
            amount,
            method,
            description,
        } => {
            let movement = CashMovement::new(kind, amount, method, description, Utc::now())?;
            let shift = record_movement(&mut shifts, movement)?;
            output_shift(format, config, &ShiftReport::from(shift))
        }
        ShiftCommand::Close { counted } => {
            let report = close_shift(&mut shifts, counted, Utc::now())?;
            output_shift(format, config, &report)
        }
        ShiftCommand::Status { id } => {
            let report = shift_report(&shifts, id.as_deref())?;
            output_shift(format, config, &report)
        }
        ShiftCommand::Export { id, output } => {
            let report = shift_report(&shifts, id.as_deref())?;
            let output_path = output.unwrap_or_else(|| {
                let opened = report.shift.opened_at.with_timezone(&Local).format("%Y%m%d-%H%M");
                PathBuf::from(format!("turno-{}.xlsx", opened))
            });
            export_shift_report(&report, &output_path)?;
            println!("Exported to: {}", output_path.display());
            Ok(())
        }
    }
}

fn cmd_customer(config: &Config, format: OutputFormat, command: CustomerCommand) -> Result<()> {
    let mut orders = open_order_store(config)?;

    match command {
        CustomerCommand::Add {
            name,
            phone,
            rut,
            address,
            lat,
            lng,
            notes,
        } => {
            let phone = normalize_phone(&phone)?;
            let rut = rut.map(|r| Rut::parse(&r).map(|r| r.to_string())).transpose()?;
            let location = match (lat, lng) {
                (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
                _ => None,
            };

            // Same phone updates the existing record
            let mut customer = orders
                .customer_by_phone(&phone)
                .cloned()
                .unwrap_or_else(|| Customer::new(name.clone(), phone.clone()));
            customer.name = name;
            if rut.is_some() {
                customer.rut = rut;
            }
            if let Some(address) = address {
                customer.address = Some(address);
            }
            if location.is_some() {
                customer.location = location;
            }
            if notes.is_some() {
                customer.notes = notes;
            }

            orders.upsert_customer(customer.clone())?;
            output_customers(format, &[&customer])
        }
        CustomerCommand::List => output_customers(format, &orders.all_customers()),
    }
}

fn cmd_rut(format: OutputFormat, value: &str) -> Result<()> {
    let rut = Rut::parse(value)?;
    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "input": value,
            "valid": true,
            "formatted": rut.to_string(),
        }));
    }
    println!("{} is valid: {}", value, rut);
    Ok(())
}

fn cmd_config(
    show: bool,
    set_origin: Option<(f64, f64)>,
    set_zones: Option<PathBuf>,
    set_capacity: Option<PathBuf>,
    set_output: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some((lat, lng)) = set_origin {
        config.origin = Coordinate::new(lat, lng);
        modified = true;
    }

    if let Some(path) = set_zones {
        config.zones_path = Some(path);
        // Reject a table that would fail on the next quote
        config.zone_table()?;
        modified = true;
    }

    if let Some(path) = set_capacity {
        config.capacity_path = Some(path);
        config.capacity_table()?;
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
