//! Page builder: a widget palette and the flat, user-ordered component list
//! a page is made of.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::templates::Template;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuilderError {
    #[error("unknown component type '{0}'")]
    UnknownWidget(String),

    #[error("duplicate component id '{0}'")]
    DuplicateId(String),

    #[error("component '{0}' not found")]
    ComponentNotFound(String),

    #[error("position {index} is out of range for {len} components")]
    PositionOutOfRange { index: usize, len: usize },

    #[error("props for component '{0}' must be a JSON object")]
    InvalidProps(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BuilderComponent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "empty_props")]
    pub props: Value,
}

fn empty_props() -> Value {
    Value::Object(Map::new())
}

pub type Layout = Vec<BuilderComponent>;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WidgetSpec {
    #[serde(rename = "type")]
    #[schema(value_type = String)]
    pub kind: &'static str,
    #[schema(value_type = String)]
    pub label: &'static str,
    #[schema(value_type = String)]
    pub category: &'static str,
    pub default_props: Value,
}

const WIDGETS: &[(&str, &str, &str)] = &[
    ("header", "Header", "layout"),
    ("hero", "Hero Banner", "layout"),
    ("banner", "Promo Banner", "marketing"),
    ("product_grid", "Product Grid", "commerce"),
    ("featured_products", "Featured Products", "commerce"),
    ("category_list", "Category List", "commerce"),
    ("cart_summary", "Cart Summary", "commerce"),
    ("text_block", "Text Block", "content"),
    ("image", "Image", "content"),
    ("testimonials", "Testimonials", "content"),
    ("newsletter", "Newsletter Signup", "marketing"),
    ("countdown", "Countdown Timer", "marketing"),
    ("contact_form", "Contact Form", "content"),
    ("wallet_connect", "Wallet Connect", "web3"),
    ("footer", "Footer", "layout"),
];

pub fn is_known_widget(kind: &str) -> bool {
    WIDGETS.iter().any(|(k, _, _)| *k == kind)
}

pub fn default_props(kind: &str) -> Option<Value> {
    let props = match kind {
        "header" => json!({ "show_search": true, "show_cart": true, "sticky": true }),
        "hero" => json!({
            "title": "Welcome to our store",
            "subtitle": "Discover our latest collection",
            "cta_text": "Shop now",
            "cta_link": "/products",
            "image": null
        }),
        "banner" => json!({ "text": "Free shipping on qualifying orders", "link": null }),
        "product_grid" => json!({ "title": "All products", "columns": 4, "limit": 12, "category": null }),
        "featured_products" => json!({ "title": "Featured", "limit": 4 }),
        "category_list" => json!({ "title": "Shop by category", "layout": "grid" }),
        "cart_summary" => json!({ "show_shipping_estimate": true }),
        "text_block" => json!({ "content": "", "align": "left" }),
        "image" => json!({ "src": null, "alt": "", "link": null }),
        "testimonials" => json!({ "title": "What customers say", "items": [] }),
        "newsletter" => json!({
            "title": "Join our newsletter",
            "placeholder": "you@example.com",
            "button_text": "Subscribe"
        }),
        "countdown" => json!({ "title": "Next drop", "ends_at": null }),
        "contact_form" => json!({ "title": "Contact us", "fields": ["name", "email", "message"] }),
        "wallet_connect" => json!({ "networks": ["ethereum"], "button_text": "Connect wallet" }),
        "footer" => json!({ "show_social": true, "links": [] }),
        _ => return None,
    };
    Some(props)
}

pub fn palette() -> Vec<WidgetSpec> {
    WIDGETS
        .iter()
        .map(|&(kind, label, category)| WidgetSpec {
            kind,
            label,
            category,
            default_props: default_props(kind).unwrap_or_else(empty_props),
        })
        .collect()
}

/// Build a component of the given type with `props` laid over its defaults.
pub fn new_component(kind: &str, props: Option<Value>) -> Result<BuilderComponent, BuilderError> {
    let mut merged = default_props(kind).ok_or_else(|| BuilderError::UnknownWidget(kind.to_string()))?;
    if let Some(props) = props {
        merge_props(&mut merged, props, kind)?;
    }
    Ok(BuilderComponent {
        id: Uuid::new_v4().to_string(),
        kind: kind.to_string(),
        props: merged,
    })
}

fn merge_props(target: &mut Value, patch: Value, id: &str) -> Result<(), BuilderError> {
    let Value::Object(patch) = patch else {
        return Err(BuilderError::InvalidProps(id.to_string()));
    };
    match target {
        Value::Object(target) => {
            target.extend(patch);
            Ok(())
        }
        _ => {
            *target = Value::Object(patch);
            Ok(())
        }
    }
}

/// Insert a new component at `position`, or append when absent.
pub fn add(
    layout: &mut Layout,
    kind: &str,
    props: Option<Value>,
    position: Option<usize>,
) -> Result<BuilderComponent, BuilderError> {
    let component = new_component(kind, props)?;
    match position {
        Some(index) if index > layout.len() => {
            return Err(BuilderError::PositionOutOfRange {
                index,
                len: layout.len(),
            });
        }
        Some(index) => layout.insert(index, component.clone()),
        None => layout.push(component.clone()),
    }
    Ok(component)
}

pub fn move_component(layout: &mut Layout, from: usize, to: usize) -> Result<(), BuilderError> {
    let len = layout.len();
    for index in [from, to] {
        if index >= len {
            return Err(BuilderError::PositionOutOfRange { index, len });
        }
    }
    let component = layout.remove(from);
    layout.insert(to, component);
    Ok(())
}

pub fn remove(layout: &mut Layout, id: &str) -> Result<BuilderComponent, BuilderError> {
    let index = position_of(layout, id)?;
    Ok(layout.remove(index))
}

pub fn update_props(layout: &mut Layout, id: &str, props: Value) -> Result<(), BuilderError> {
    let index = position_of(layout, id)?;
    merge_props(&mut layout[index].props, props, id)
}

fn position_of(layout: &Layout, id: &str) -> Result<usize, BuilderError> {
    layout
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| BuilderError::ComponentNotFound(id.to_string()))
}

pub fn validate(layout: &Layout) -> Result<(), BuilderError> {
    let mut seen = std::collections::HashSet::new();
    for component in layout {
        if !is_known_widget(&component.kind) {
            return Err(BuilderError::UnknownWidget(component.kind.clone()));
        }
        if !seen.insert(component.id.as_str()) {
            return Err(BuilderError::DuplicateId(component.id.clone()));
        }
        if !component.props.is_object() {
            return Err(BuilderError::InvalidProps(component.id.clone()));
        }
    }
    Ok(())
}

/// Starting home-page layout for a template.
pub fn from_template(template: &Template) -> Layout {
    template
        .home_layout
        .iter()
        .filter_map(|kind| new_component(kind, None).ok())
        .collect()
}

/// Decode a stored `components` column; malformed entries are dropped.
pub fn layout_from_json(value: &Value) -> Layout {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}
