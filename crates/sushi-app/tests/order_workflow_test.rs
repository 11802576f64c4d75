//! End-to-end order workflow over file-backed stores

use chrono::{Local, TimeZone};
use sushi_app::app::{open_shift, record_order_sale, shift_report, OrderRequest, OrderService, RequestedItem};
use sushi_app::repository::{open_menu_store_at, open_order_store_at, open_shift_store_at};
use sushi_domain::model::{CapacityTable, Customer, MenuItem, ShiftCapacity, ZoneTable};
use sushi_domain::service::{GeoZoneFeeCalculator, NO_LOCATION_ZONE};
use sushi_store::{MenuStore, OrderStore};
use sushi_types::{Coordinate, Error, OrderStatus, PaymentMethod, Station, ValidationError};
use tempfile::{tempdir, TempDir};

const ORIGIN: Coordinate = Coordinate {
    latitude: -33.4489,
    longitude: -70.6693,
};

struct Fixture {
    _dir: TempDir,
    menu: MenuStore,
    orders: OrderStore,
    service: OrderService,
}

fn fixture() -> Fixture {
    let dir = tempdir().unwrap();
    let mut menu = open_menu_store_at(dir.path().to_path_buf()).unwrap();
    menu.upsert(MenuItem::new("R1", "Roll Acevichado", "Rolls", 6_990).with_cooking_time(10.0))
        .unwrap();
    menu.upsert(MenuItem::new("T1", "Tempura Roll", "Rolls", 7_490).with_cooking_time(12.0))
        .unwrap();
    menu.upsert(
        MenuItem::new("G1", "Gyoza", "Entradas", 3_500)
            .with_cooking_time(20.0)
            .with_station(Station::Hot),
    )
    .unwrap();
    let orders = open_order_store_at(dir.path().to_path_buf()).unwrap();
    let service = OrderService::new(
        GeoZoneFeeCalculator::new(ORIGIN, ZoneTable::default()),
        CapacityTable::uniform(ShiftCapacity::new(2, 1)),
    );
    Fixture {
        _dir: dir,
        menu,
        orders,
        service,
    }
}

fn monday_evening() -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2024, 3, 11, 20, 0, 0).unwrap()
}

/// Roughly four kilometres north of the store
fn four_km_north() -> Coordinate {
    Coordinate::new(ORIGIN.latitude + 0.036, ORIGIN.longitude)
}

#[test]
fn quote_prices_lines_fee_and_eta() {
    let fx = fixture();
    let request = OrderRequest {
        items: vec![RequestedItem::new("R1", 2)],
        destination: Some(four_km_north()),
        ..OrderRequest::default()
    };

    let quote = fx.service.quote(&fx.menu, &fx.orders, &request, monday_evening()).unwrap();
    assert_eq!(quote.subtotal, 13_980);
    assert_eq!(quote.delivery.zone_name, "Zona 2");
    assert_eq!(quote.delivery.fee, 2_500);
    assert_eq!(quote.total, 16_480);
    assert!((quote.delivery.distance_km - 4.0).abs() < 0.1);
    // single cold line of 10 minutes stays under the floor
    assert_eq!(quote.eta_minutes(), 15);
    assert_eq!(quote.eta.bottleneck, None);
    assert_eq!(quote.ready_at, monday_evening().with_timezone(&chrono::Utc) + chrono::Duration::minutes(15));
}

#[test]
fn pickup_has_no_fee() {
    let fx = fixture();
    let request = OrderRequest {
        items: vec![RequestedItem::new("R1", 1)],
        destination: Some(four_km_north()),
        pickup: true,
        ..OrderRequest::default()
    };
    let quote = fx.service.quote(&fx.menu, &fx.orders, &request, monday_evening()).unwrap();
    assert_eq!(quote.delivery.fee, 0);
    assert_eq!(quote.delivery.zone_name, NO_LOCATION_ZONE);
    assert_eq!(quote.total, 6_990);
}

#[test]
fn queued_orders_push_the_eta() {
    let mut fx = fixture();
    let first = OrderRequest {
        items: vec![RequestedItem::new("G1", 2)],
        ..OrderRequest::default()
    };
    let order = fx.service.create(&fx.menu, &mut fx.orders, &first, monday_evening()).unwrap();
    assert_eq!(order.number, 1);
    assert_eq!(order.status, OrderStatus::Pending);

    // queue: 20 hot; cart: 12 hot (tempura) on one hot station
    let second = OrderRequest {
        items: vec![RequestedItem::new("T1", 1)],
        ..OrderRequest::default()
    };
    let quote = fx.service.quote(&fx.menu, &fx.orders, &second, monday_evening()).unwrap();
    assert_eq!(quote.eta.queue_load.hot, 20);
    assert_eq!(quote.eta.cart_load.hot, 12);
    assert_eq!(quote.eta_minutes(), 32);
    assert_eq!(quote.eta.bottleneck, Some(Station::Hot));

    // delivered orders leave the queue
    for _ in 0..3 {
        fx.orders.advance(&order.id).unwrap();
    }
    let quote = fx.service.quote(&fx.menu, &fx.orders, &second, monday_evening()).unwrap();
    assert_eq!(quote.eta_minutes(), 15);
}

#[test]
fn create_uses_saved_customer() {
    let mut fx = fixture();
    let home = four_km_north();
    fx.orders
        .upsert_customer(
            Customer::new("Camila".to_string(), "+56912345678".to_string())
                .with_address("Av. Perú 123".to_string(), Some(home)),
        )
        .unwrap();

    let request = OrderRequest {
        items: vec![RequestedItem::new("R1", 1)],
        customer_phone: Some("9 1234 5678".to_string()),
        payment_method: PaymentMethod::Card,
        ..OrderRequest::default()
    };
    let order = fx.service.create(&fx.menu, &mut fx.orders, &request, monday_evening()).unwrap();
    assert_eq!(order.customer_name, "Camila");
    assert_eq!(order.phone.as_deref(), Some("+56912345678"));
    assert_eq!(order.address.as_deref(), Some("Av. Perú 123"));
    assert_eq!(order.delivery.fee, 2_500);
    assert!(order.customer_id.is_some());
}

#[test]
fn create_rejects_invalid_requests() {
    let mut fx = fixture();
    fx.menu.set_availability("T1", false).unwrap();

    let cases = [
        (vec![], "empty"),
        (vec![RequestedItem::new("NOPE", 1)], "unknown"),
        (vec![RequestedItem::new("T1", 1)], "unavailable"),
    ];
    for (items, label) in cases {
        let request = OrderRequest {
            items,
            ..OrderRequest::default()
        };
        let err = fx
            .service
            .create(&fx.menu, &mut fx.orders, &request, monday_evening())
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "{}: {:?}", label, err);
    }
    assert_eq!(fx.orders.order_count(), 0);

    let request = OrderRequest {
        items: vec![RequestedItem::new("R1", 1)],
        customer_phone: Some("123".to_string()),
        ..OrderRequest::default()
    };
    let err = fx.service.quote(&fx.menu, &fx.orders, &request, monday_evening()).unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::InvalidPhone(_))));
}

#[test]
fn order_sale_lands_in_open_shift() {
    let mut fx = fixture();
    let dir = tempdir().unwrap();
    let mut shifts = open_shift_store_at(dir.path().to_path_buf()).unwrap();
    open_shift(&mut shifts, "Vale", 10_000, chrono::Utc::now()).unwrap();

    let request = OrderRequest {
        items: vec![RequestedItem::new("R1", 1)],
        ..OrderRequest::default()
    };
    let order = fx.service.create(&fx.menu, &mut fx.orders, &request, monday_evening()).unwrap();
    record_order_sale(&mut shifts, &order, chrono::Utc::now()).unwrap();

    let report = shift_report(&shifts, None).unwrap();
    assert_eq!(report.summary.sale_count, 1);
    assert_eq!(report.summary.expected_cash, 16_990);
    assert_eq!(report.shift.movements[0].order_id.as_deref(), Some(order.id.as_str()));
}

#[test]
fn free_pickup_order_skips_the_drawer() {
    let mut fx = fixture();
    fx.menu
        .upsert(MenuItem::new("S0", "Salsa soya extra", "Extras", 0))
        .unwrap();
    let dir = tempdir().unwrap();
    let mut shifts = open_shift_store_at(dir.path().to_path_buf()).unwrap();
    open_shift(&mut shifts, "Vale", 10_000, chrono::Utc::now()).unwrap();

    let request = OrderRequest {
        items: vec![RequestedItem::new("S0", 1)],
        pickup: true,
        ..OrderRequest::default()
    };
    let order = fx.service.create(&fx.menu, &mut fx.orders, &request, monday_evening()).unwrap();
    assert_eq!(order.total, 0);

    let shift = record_order_sale(&mut shifts, &order, chrono::Utc::now()).unwrap();
    assert!(shift.movements.is_empty());
    assert_eq!(fx.orders.order_count(), 1);

    let report = shift_report(&shifts, None).unwrap();
    assert_eq!(report.summary.sale_count, 0);
    assert_eq!(report.summary.expected_cash, 10_000);
}
