use super::*;

fn catalog() -> ApiCatalog {
    ApiCatalog::embedded().expect("Embedded catalog should load")
}

#[test]
fn test_find_operation() {
    let catalog = catalog();

    let entry = find_operation(&catalog, "retrieve_loyalty_account").expect("Should be found");

    assert_eq!(entry.descriptor.service, "Loyalty");
}

#[test]
fn test_find_operation_suggests_close_matches() {
    let catalog = catalog();

    let result = find_operation(&catalog, "loyalty_account");

    match result {
        Err(Error::InvalidArguments(msg)) => {
            assert!(msg.contains("Did you mean"));
            assert!(msg.contains("retrieve_loyalty_account"));
        }
        other => panic!("Expected InvalidArguments, got {other:?}"),
    }
}

#[test]
fn test_find_operation_unknown() {
    let catalog = catalog();

    let result = find_operation(&catalog, "launch_rocket");

    assert!(matches!(
        result,
        Err(Error::Client(commerce_client::Error::UnknownOperation(_)))
    ));
}

#[test]
fn test_format_operation_pretty() {
    let catalog = catalog();
    let entry = find_operation(&catalog, "list_loyalty_promotions").unwrap();

    let output = format_operation(entry, "pretty").expect("Failed to format");

    assert!(output.contains("list_loyalty_promotions"));
    assert!(output.contains("/v2/loyalty/programs/{program_id}/promotions"));
    assert!(output.contains("program_id"));
    assert!(output.contains("status"));
    assert!(output.contains("cursor"));
    assert!(output.contains("limit"));
}

#[test]
fn test_format_operation_pretty_multipart() {
    let catalog = catalog();
    let entry = find_operation(&catalog, "create_catalog_image").unwrap();

    let output = format_operation(entry, "pretty").expect("Failed to format");

    assert!(output.contains("multipart form"));
    assert!(output.contains("image_file"));
}

#[test]
fn test_format_operation_json_round_trips_descriptor() {
    let catalog = catalog();
    let entry = find_operation(&catalog, "accumulate_loyalty_points").unwrap();

    let output = format_operation(entry, "json").expect("Failed to format");

    let parsed: CatalogEntry = serde_json::from_str(&output).unwrap();
    assert_eq!(&parsed, entry);
}

#[test]
fn test_format_operation_invalid_format() {
    let catalog = catalog();
    let entry = find_operation(&catalog, "retrieve_loyalty_account").unwrap();

    assert!(matches!(
        format_operation(entry, "xml"),
        Err(Error::InvalidArguments(_))
    ));
}

#[test]
fn test_example_call_for_get() {
    let catalog = catalog();
    let entry = find_operation(&catalog, "retrieve_loyalty_account").unwrap();

    assert_eq!(
        example_call(entry),
        "commerce call retrieve_loyalty_account --arg account_id=<account_id>"
    );
}

#[test]
fn test_example_call_for_post() {
    let catalog = catalog();
    let entry = find_operation(&catalog, "accumulate_loyalty_points").unwrap();

    let example = example_call(entry);

    assert!(example.starts_with(
        "commerce call accumulate_loyalty_points --arg account_id=<account_id>"
    ));
    assert!(example.contains("--idempotency-key auto"));
}
