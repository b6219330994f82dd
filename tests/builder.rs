use serde_json::json;
use store_builder_api::{
    builder::{self, BuilderError},
    templates,
};

#[test]
fn palette_covers_every_widget_with_object_defaults() {
    let palette = builder::palette();
    assert_eq!(palette.len(), 15);
    for widget in &palette {
        assert!(builder::is_known_widget(widget.kind));
        assert!(widget.default_props.is_object(), "{} defaults", widget.kind);
    }
}

#[test]
fn add_merges_props_over_defaults() {
    let mut layout = Vec::new();
    let hero = builder::add(&mut layout, "hero", Some(json!({ "title": "Spring sale" })), None)
        .expect("add hero");
    assert_eq!(layout.len(), 1);
    assert_eq!(hero.props["title"], "Spring sale");
    assert_eq!(hero.props["cta_text"], "Shop now");
}

#[test]
fn add_rejects_unknown_types_and_bad_positions() {
    let mut layout = Vec::new();
    assert_eq!(
        builder::add(&mut layout, "carousel", None, None),
        Err(BuilderError::UnknownWidget("carousel".into()))
    );
    assert!(matches!(
        builder::add(&mut layout, "hero", None, Some(1)),
        Err(BuilderError::PositionOutOfRange { index: 1, len: 0 })
    ));
    assert!(matches!(
        builder::add(&mut layout, "hero", Some(json!("nope")), None),
        Err(BuilderError::InvalidProps(_))
    ));
    assert!(layout.is_empty());
}

#[test]
fn add_inserts_at_position() {
    let mut layout = Vec::new();
    builder::add(&mut layout, "header", None, None).expect("header");
    builder::add(&mut layout, "footer", None, None).expect("footer");
    builder::add(&mut layout, "hero", None, Some(1)).expect("hero");
    let kinds: Vec<&str> = layout.iter().map(|c| c.kind.as_str()).collect();
    assert_eq!(kinds, ["header", "hero", "footer"]);
}

#[test]
fn move_splices_component() {
    let mut layout = builder::from_template(templates::default_template());
    let first = layout[0].id.clone();
    let last_index = layout.len() - 1;

    builder::move_component(&mut layout, 0, last_index).expect("move");
    assert_eq!(layout[last_index].id, first);

    assert!(matches!(
        builder::move_component(&mut layout, 0, 99),
        Err(BuilderError::PositionOutOfRange { index: 99, .. })
    ));
}

#[test]
fn remove_and_update_by_id() {
    let mut layout = Vec::new();
    let text = builder::add(&mut layout, "text_block", None, None).expect("text");
    builder::add(&mut layout, "image", None, None).expect("image");

    builder::update_props(&mut layout, &text.id, json!({ "content": "Hello" })).expect("update");
    assert_eq!(layout[0].props["content"], "Hello");
    assert_eq!(layout[0].props["align"], "left");

    let removed = builder::remove(&mut layout, &text.id).expect("remove");
    assert_eq!(removed.kind, "text_block");
    assert_eq!(layout.len(), 1);
    assert_eq!(
        builder::remove(&mut layout, &text.id),
        Err(BuilderError::ComponentNotFound(text.id.clone()))
    );
}

#[test]
fn validate_catches_duplicates_and_unknown_types() {
    let mut layout = builder::from_template(templates::default_template());
    assert_eq!(builder::validate(&layout), Ok(()));

    let mut dup = layout[0].clone();
    dup.kind = "footer".into();
    layout.push(dup.clone());
    assert_eq!(builder::validate(&layout), Err(BuilderError::DuplicateId(dup.id)));

    layout.pop();
    layout[0].kind = "marquee".into();
    assert_eq!(
        builder::validate(&layout),
        Err(BuilderError::UnknownWidget("marquee".into()))
    );
}

#[test]
fn stored_layouts_round_trip_and_drop_garbage() {
    let layout = builder::from_template(templates::default_template());
    let mut stored = serde_json::to_value(&layout).expect("serialize");
    stored
        .as_array_mut()
        .expect("array")
        .push(json!({ "unexpected": 1 }));

    let decoded = builder::layout_from_json(&stored);
    assert_eq!(decoded, layout);
    assert!(builder::layout_from_json(&json!({})).is_empty());
}
