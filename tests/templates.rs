use std::collections::HashSet;

use store_builder_api::{builder, templates};

#[test]
fn registry_has_unique_ids_and_modern_default() {
    let all = templates::all();
    assert!(all.len() >= 15);
    let ids: HashSet<&str> = all.iter().map(|t| t.id).collect();
    assert_eq!(ids.len(), all.len());

    assert_eq!(templates::default_template().id, templates::DEFAULT_TEMPLATE_ID);
    assert_eq!(templates::DEFAULT_TEMPLATE_ID, "modern");
}

#[test]
fn every_home_layout_uses_known_widgets() {
    for template in templates::all() {
        assert!(template.pages.contains(&"home"), "{} has a home page", template.id);
        for kind in template.home_layout {
            assert!(builder::is_known_widget(kind), "{} uses {kind}", template.id);
        }
        let layout = builder::from_template(template);
        assert_eq!(layout.len(), template.home_layout.len());
        assert_eq!(builder::validate(&layout), Ok(()));
    }
}

#[test]
fn unknown_ids_resolve_to_default() {
    assert!(templates::find("does-not-exist").is_none());
    assert_eq!(templates::resolve("does-not-exist").id, "modern");
    assert_eq!(templates::resolve("luxe").id, "luxe");
}

#[test]
fn filter_by_category_and_feature() {
    let web3 = templates::filter(None, Some("wallet-connect"));
    assert!(web3.iter().any(|t| t.id == "web3-shop"));
    assert!(web3.iter().all(|t| t.has_feature("wallet-connect")));

    let general = templates::filter(Some("GENERAL"), None);
    assert!(general.iter().any(|t| t.id == "modern"));
    assert!(general.iter().all(|t| t.category == "general"));

    assert!(templates::filter(Some("no-such-category"), None).is_empty());
    assert_eq!(templates::filter(None, None).len(), templates::all().len());
}
