use std::cell::RefCell;
use std::rc::Rc;

use sushi_app::app::import_menu;
use sushi_app::repository::open_menu_store_at;
use sushi_store::{CatalogEvent, CatalogSubscriber};
use sushi_types::{Error, Station};
use tempfile::tempdir;

const MENU_CSV: &str = "\
id,name,category,price,cooking_time_minutes,station,available
R1,Roll Acevichado,Rolls,6990,10,,
H1,Gyoza frita,Entradas,3500,8,hot,
P1,Promo 40 piezas,Promos,19990,25,cold,false
";

#[test]
fn import_inserts_then_updates() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("menu.csv");
    std::fs::write(&csv_path, MENU_CSV).unwrap();

    let mut menu = open_menu_store_at(dir.path().join("store")).unwrap();
    let events: Rc<RefCell<Vec<CatalogEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let recorder: CatalogSubscriber = Box::new(move |event| {
        sink.borrow_mut().push(event.clone());
        Ok(())
    });
    menu.subscribe(recorder);

    let summary = import_menu(&mut menu, &csv_path).unwrap();
    assert_eq!(summary.inserted, 3);
    assert_eq!(summary.total(), 3);
    assert_eq!(menu.count(), 3);
    assert_eq!(menu.get("H1").unwrap().station, Some(Station::Hot));
    assert!(!menu.get("P1").unwrap().available);
    assert_eq!(events.borrow().len(), 3);

    // re-import with one price change
    std::fs::write(&csv_path, MENU_CSV.replace("6990", "7490")).unwrap();
    let summary = import_menu(&mut menu, &csv_path).unwrap();
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.unchanged, 2);
    assert_eq!(menu.get("R1").unwrap().price, 7_490);
    assert_eq!(events.borrow().len(), 4);
}

#[test]
fn bad_row_leaves_catalog_untouched() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("menu.csv");
    std::fs::write(&csv_path, "id,name,category,price\nR1,Roll,Rolls,6990\nR2,Roll 2,Rolls,caro\n").unwrap();

    let mut menu = open_menu_store_at(dir.path().join("store")).unwrap();
    let err = import_menu(&mut menu, &csv_path).unwrap_err();
    assert!(matches!(err, Error::Import(_)));
    assert_eq!(menu.count(), 0);
}
