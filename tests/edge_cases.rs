use permia::{Budget, CatalogBuilder, CatalogError, EnumerateError, PermiaError, Value};

#[test]
fn single_value_discriminator() {
    let catalog = CatalogBuilder::new()
        .discriminator("Action", ["only"])
        .compile()
        .unwrap();
    let perms = catalog.enumerate_all().unwrap();
    assert_eq!(perms.len(), 1);
    assert_eq!(perms[0].get("Action"), Some(&Value::Text("only".into())));
}

#[test]
fn missing_discriminator_fails_compile() {
    let result = CatalogBuilder::new().field("Opt", |f| f.boolean()).compile();
    assert!(matches!(
        result,
        Err(PermiaError::Catalog(CatalogError::NoDiscriminator))
    ));
}

#[test]
fn long_dependency_chain() {
    // f1 gated on the discriminator, f2 on f1, ... 12 fields deep. Only the
    // all-true branch carries every field.
    let mut builder = CatalogBuilder::new()
        .discriminator("Action", ["go", "stop"])
        .field("f0", |f| f.boolean().display("Action in (go)"));
    for i in 1..12 {
        let gate = format!("Action in (go, stop) AND f{} in (true)", i - 1);
        builder = builder.field(&format!("f{i}"), move |f| f.boolean().display(&gate));
    }
    let catalog = builder.compile().unwrap();

    let perms = catalog.enumerate_all().unwrap();
    // Per branch: choosing false at depth k omits everything deeper, so the
    // "go" branch yields 13 permutations and "stop" yields one.
    assert_eq!(perms.len(), 14);

    let deepest = perms
        .iter()
        .filter(|p| p.get("f11").is_some())
        .collect::<Vec<_>>();
    assert_eq!(deepest.len(), 1);
    assert_eq!(deepest[0].len(), 13);
}

#[test]
fn budget_of_zero_cancels_before_any_output() {
    let catalog = CatalogBuilder::new()
        .discriminator("Action", ["a", "b"])
        .compile()
        .unwrap();
    let (perms, stop) = catalog.enumerate_with(Budget::max_permutations(0)).drain();
    assert!(perms.is_empty());
    assert!(matches!(
        stop,
        Some(EnumerateError::Cancelled { emitted: 0 })
    ));
}

#[test]
fn hidden_gated_field_ignores_its_own_gate() {
    let catalog = CatalogBuilder::new()
        .discriminator("Action", ["a", "b"])
        .field("Index", |f| {
            f.choice(["main", "alt"]).hidden().display("Action in (a)")
        })
        .compile()
        .unwrap();
    assert_eq!(catalog.enumerate_all().unwrap().len(), 4);
}

#[test]
fn template_values_splice_in_place() {
    let catalog = CatalogBuilder::new()
        .discriminator("Action", ["deploy"])
        .template("regions", ["us-east", "eu"])
        .field("Region", |f| f.choice(["local", "{{regions}}"]))
        .compile()
        .unwrap();

    let region = catalog.field("Region").unwrap();
    assert_eq!(
        region.valid_values(),
        &["local".to_owned(), "us-east".to_owned(), "eu".to_owned()]
    );
    assert_eq!(catalog.enumerate_all().unwrap().len(), 3);
}

#[test]
fn default_value_does_not_constrain_enumeration() {
    let catalog = CatalogBuilder::new()
        .discriminator("Action", ["a"])
        .field("Region", |f| f.choice(["us", "eu"]).default_value("us"))
        .compile()
        .unwrap();
    assert_eq!(catalog.enumerate_all().unwrap().len(), 2);
    assert_eq!(catalog.field("Region").unwrap().default(), Some("us"));
}

#[test]
fn service_scoped_flag_is_carried_through() {
    let catalog = CatalogBuilder::new()
        .discriminator("Action", ["a"])
        .field("Secret", |f| f.boolean().service_scoped())
        .compile()
        .unwrap();
    assert!(catalog.field("Secret").unwrap().is_service_scoped());
    assert!(!catalog.field("Action").unwrap().is_service_scoped());
}

#[test]
fn duplicate_display_values_do_not_duplicate_branches() {
    let catalog = CatalogBuilder::new()
        .discriminator("Action", ["a", "b"])
        .field("Opt", |f| f.boolean().display("Action in (a, a)"))
        .compile()
        .unwrap();
    assert_eq!(catalog.enumerate_all().unwrap().len(), 3);
}

#[test]
fn catalog_display_summarizes_shape() {
    let catalog = CatalogBuilder::new()
        .discriminator("Action", ["a", "b"])
        .field("Flag", |f| f.boolean())
        .output("doc", |o| o.kind("document"))
        .compile()
        .unwrap();
    assert_eq!(catalog.to_string(), "Catalog(2 fields, 1 outputs, space 4)");
}

#[test]
fn catalog_is_shareable_across_threads() {
    let catalog = std::sync::Arc::new(
        CatalogBuilder::new()
            .discriminator("Action", ["a", "b", "c"])
            .field("Flag", |f| f.boolean())
            .compile()
            .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let catalog = std::sync::Arc::clone(&catalog);
            std::thread::spawn(move || catalog.enumerate_all().unwrap())
        })
        .collect();

    let baseline = catalog.enumerate_all().unwrap();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), baseline);
    }
}
