use permia::{CatalogBuilder, EvaluationError, Value};

fn release_catalog() -> permia::Catalog {
    CatalogBuilder::new()
        .discriminator("Action", ["create", "update", "delete"])
        .field("DryRun", |f| f.boolean().display("Action in (create, update)"))
        .field("Reason", |f| f.free_form())
        .output("manifest", |o| o.kind("document"))
        .output("changelog", |o| {
            o.kind("document").display("Action in (create, update)")
        })
        .output("tombstone", |o| o.kind("marker").display("Action in (delete)"))
        .compile()
        .unwrap()
}

#[test]
fn outputs_partition_across_discriminator_values() {
    let catalog = release_catalog();

    let create: Vec<_> = catalog
        .outputs_for_discriminator("create")
        .unwrap()
        .iter()
        .map(|o| o.name().to_owned())
        .collect();
    assert_eq!(create, ["manifest", "changelog"]);

    let delete: Vec<_> = catalog
        .outputs_for_discriminator("delete")
        .unwrap()
        .iter()
        .map(|o| o.name().to_owned())
        .collect();
    assert_eq!(delete, ["manifest", "tombstone"]);
}

#[test]
fn unknown_discriminator_value_matches_only_unconditional_outputs() {
    let catalog = release_catalog();
    let outputs = catalog.outputs_for_discriminator("archive").unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].name(), "manifest");
}

#[test]
fn per_permutation_resolution_covers_every_branch() {
    let catalog = release_catalog();
    for perm in catalog.enumerate_all().unwrap() {
        let assignment = catalog.assignment_for(&perm);
        let outputs = catalog.outputs_for_assignment(&assignment).unwrap();
        let expect_changelog = matches!(
            perm.get("Action"),
            Some(Value::Text(t)) if t == "create" || t == "update"
        );
        assert!(outputs.iter().any(|o| o.name() == "manifest"));
        assert_eq!(
            outputs.iter().any(|o| o.name() == "changelog"),
            expect_changelog
        );
    }
}

#[test]
fn partial_context_is_rejected_for_deep_predicates() {
    let catalog = CatalogBuilder::new()
        .discriminator("Action", ["create"])
        .field("DryRun", |f| f.boolean())
        .output("preview", |o| {
            o.display("Action in (create) AND DryRun in (true)")
        })
        .compile()
        .unwrap();

    let err = catalog.outputs_for_discriminator("create").unwrap_err();
    assert!(matches!(
        err,
        EvaluationError::PartialContext { owner, field }
            if owner == "preview" && field == "DryRun"
    ));
}

#[test]
fn deep_predicate_resolves_under_full_assignment() {
    let catalog = CatalogBuilder::new()
        .discriminator("Action", ["create"])
        .field("DryRun", |f| f.boolean())
        .output("preview", |o| {
            o.display("Action in (create) AND DryRun in (true)")
        })
        .compile()
        .unwrap();

    let dry = catalog
        .assignment_builder()
        .set("Action", "create")
        .set("DryRun", true)
        .build();
    assert_eq!(catalog.outputs_for_assignment(&dry).unwrap().len(), 1);

    let wet = catalog
        .assignment_builder()
        .set("Action", "create")
        .set("DryRun", false)
        .build();
    assert!(catalog.outputs_for_assignment(&wet).unwrap().is_empty());
}

#[test]
fn visibility_follows_the_discriminator() {
    let catalog = release_catalog();

    let create = catalog.assignment_builder().set("Action", "create").build();
    assert!(catalog.is_field_visible("DryRun", &create).unwrap());
    assert!(catalog.is_field_visible("Reason", &create).unwrap());

    let delete = catalog.assignment_builder().set("Action", "delete").build();
    assert!(!catalog.is_field_visible("DryRun", &delete).unwrap());
}

#[test]
fn output_accessors_expose_kind() {
    let catalog = release_catalog();
    let outputs = catalog.outputs();
    assert_eq!(outputs.len(), 3);
    assert_eq!(outputs[0].kind(), Some("document"));
    assert_eq!(outputs[2].kind(), Some("marker"));
}
