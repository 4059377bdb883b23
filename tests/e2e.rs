use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn run(store: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_merch-shop"))
        .args(args)
        .env("MERCH_SHOP_STORE", store)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run binary");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code().unwrap_or(-1))
}

fn fixture(name: &str) -> String {
    format!("tests/fixtures/{name}")
}

const HEADER: &str =
    "Order ID,Date,Customer Name,Customer Email,Items,Subtotal,Setup Fee,Total,Status,Notes";

#[test]
fn checkout_places_order() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("orders.json");

    let (stdout, stderr, code) = run(&store, &["checkout", fixture("checkout.csv").as_str()]);

    assert_eq!(code, 0);
    assert!(stderr.is_empty(), "unexpected stderr: {stderr}");

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], HEADER);
    assert!(lines[1].starts_with(r#""1","#));
    assert!(lines[1].contains(r#""Jane","jane@example.com","Hoodies (2); Stickers (1)","70.46","1.25","71.71","pending","Please deliver by Friday""#));

    let (stdout, _, code) = run(&store, &["summary"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("total orders:     1"));
    assert!(stdout.contains("total revenue:    71.71"));
    assert!(stdout.contains("pending orders:   1"));
    assert!(stdout.contains("unique customers: 1"));
}

#[test]
fn errors_warn_but_do_not_block() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("orders.json");

    let (stdout, stderr, code) = run(&store, &["checkout", fixture("with_errors.csv").as_str()]);

    assert_eq!(code, 0);
    assert!(stderr.contains("unknown product 'Mugs'"));
    assert!(stderr.contains("unrecognized action 'refund'"));

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], HEADER);
    assert!(lines[1].contains(r#""T-shirts (2)","16.88","1.25","18.13","pending""#));
}

#[test]
fn incomplete_sizes_block_submission() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("orders.json");

    let (stdout, stderr, code) = run(&store, &["checkout", fixture("incomplete.csv").as_str()]);

    assert_eq!(code, 0);
    assert!(stderr.contains("sizes missing for Polo Shirt"));
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec![HEADER]);
    assert!(!store.exists());
}

#[test]
fn status_update_is_visible_in_filtered_export() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("orders.json");
    run(&store, &["checkout", fixture("checkout.csv").as_str()]);

    let (stdout, _, code) = run(&store, &["set-status", "1", "completed"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "order 1 is now completed");

    let (stdout, _, _) = run(&store, &["export", "pending"]);
    assert_eq!(stdout.lines().count(), 1);

    let (stdout, _, _) = run(&store, &["export", "completed"]);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains(r#""completed""#));

    let (stdout, _, _) = run(&store, &["orders"]);
    assert!(stdout.contains("Hoodies x2 [M, L]"));
    assert!(stdout.contains("notes: Please deliver by Friday"));
}

#[test]
fn unknown_order_status_update_fails() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("orders.json");

    let (_, stderr, code) = run(&store, &["set-status", "7", "completed"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("order 7 not found"));
}

#[test]
fn catalog_lists_products() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run(&dir.path().join("orders.json"), &["catalog"]);

    assert_eq!(code, 0);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "product,price,sized");
    assert_eq!(lines[1], "Hoodies,35.23,true");
    assert_eq!(lines[5], "Stickers,0.00,false");
}

#[test]
fn unknown_command_prints_usage() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run(&dir.path().join("orders.json"), &["refund"]);

    assert_eq!(code, 2);
    assert!(stderr.contains("unknown command 'refund'"));
    assert!(stderr.contains("usage: merch-shop"));
}
