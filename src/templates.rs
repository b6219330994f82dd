//! Static registry of storefront templates.
//!
//! A template is a visual skin: colors, fonts, the pages it ships with, the
//! feature tags shown in the picker and the widgets its home page starts
//! with. Stores reference templates by `id`; the storefront renderer resolves
//! the id against this registry and falls back to [`default_template`].

use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_TEMPLATE_ID: &str = "modern";

#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
pub struct ColorScheme {
    #[schema(value_type = String)]
    pub primary: &'static str,
    #[schema(value_type = String)]
    pub secondary: &'static str,
    #[schema(value_type = String)]
    pub accent: &'static str,
    #[schema(value_type = String)]
    pub background: &'static str,
    #[schema(value_type = String)]
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
pub struct Typography {
    #[schema(value_type = String)]
    pub heading: &'static str,
    #[schema(value_type = String)]
    pub body: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
pub struct Template {
    #[schema(value_type = String)]
    pub id: &'static str,
    #[schema(value_type = String)]
    pub name: &'static str,
    #[schema(value_type = String)]
    pub description: &'static str,
    #[schema(value_type = String)]
    pub category: &'static str,
    pub colors: ColorScheme,
    pub typography: Typography,
    #[schema(value_type = Vec<String>)]
    pub pages: &'static [&'static str],
    #[schema(value_type = Vec<String>)]
    pub features: &'static [&'static str],
    /// Widget types placed on the home page of a freshly initialised store.
    #[schema(value_type = Vec<String>)]
    pub home_layout: &'static [&'static str],
}

impl Template {
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f.eq_ignore_ascii_case(feature))
    }
}

const STANDARD_PAGES: &[&str] = &["home", "products", "product", "cart", "checkout", "about", "contact"];

static TEMPLATES: &[Template] = &[
    Template {
        id: "modern",
        name: "Modern",
        description: "Clean grid layout with bold hero imagery.",
        category: "general",
        colors: ColorScheme {
            primary: "#2563eb",
            secondary: "#1e293b",
            accent: "#f59e0b",
            background: "#ffffff",
            text: "#0f172a",
        },
        typography: Typography { heading: "Inter", body: "Inter" },
        pages: STANDARD_PAGES,
        features: &["responsive", "quick-view", "search"],
        home_layout: &["header", "hero", "featured_products", "product_grid", "newsletter", "footer"],
    },
    Template {
        id: "minimal",
        name: "Minimal",
        description: "Whitespace-first layout that lets products speak.",
        category: "general",
        colors: ColorScheme {
            primary: "#111827",
            secondary: "#6b7280",
            accent: "#10b981",
            background: "#fafafa",
            text: "#111827",
        },
        typography: Typography { heading: "Helvetica Neue", body: "Helvetica Neue" },
        pages: STANDARD_PAGES,
        features: &["responsive", "search"],
        home_layout: &["header", "product_grid", "footer"],
    },
    Template {
        id: "classic",
        name: "Classic",
        description: "Traditional storefront with category navigation.",
        category: "general",
        colors: ColorScheme {
            primary: "#7c2d12",
            secondary: "#a16207",
            accent: "#15803d",
            background: "#fffbeb",
            text: "#292524",
        },
        typography: Typography { heading: "Georgia", body: "Georgia" },
        pages: STANDARD_PAGES,
        features: &["responsive", "categories", "reviews"],
        home_layout: &["header", "banner", "category_list", "product_grid", "testimonials", "footer"],
    },
    Template {
        id: "boutique",
        name: "Boutique",
        description: "Editorial fashion layout with lookbook sections.",
        category: "fashion",
        colors: ColorScheme {
            primary: "#be185d",
            secondary: "#831843",
            accent: "#fbcfe8",
            background: "#fff1f2",
            text: "#3f3f46",
        },
        typography: Typography { heading: "Playfair Display", body: "Lato" },
        pages: STANDARD_PAGES,
        features: &["lookbook", "size-guide", "wishlist"],
        home_layout: &["header", "hero", "featured_products", "image", "newsletter", "footer"],
    },
    Template {
        id: "streetwear",
        name: "Streetwear",
        description: "High-contrast drops layout with countdowns.",
        category: "fashion",
        colors: ColorScheme {
            primary: "#000000",
            secondary: "#ef4444",
            accent: "#facc15",
            background: "#f4f4f5",
            text: "#09090b",
        },
        typography: Typography { heading: "Bebas Neue", body: "Roboto" },
        pages: STANDARD_PAGES,
        features: &["drops", "countdown", "wishlist"],
        home_layout: &["header", "hero", "countdown", "product_grid", "footer"],
    },
    Template {
        id: "techhub",
        name: "Tech Hub",
        description: "Spec-focused electronics catalog.",
        category: "electronics",
        colors: ColorScheme {
            primary: "#0ea5e9",
            secondary: "#0f172a",
            accent: "#22d3ee",
            background: "#f8fafc",
            text: "#0f172a",
        },
        typography: Typography { heading: "Space Grotesk", body: "Inter" },
        pages: STANDARD_PAGES,
        features: &["compare", "specs", "search", "reviews"],
        home_layout: &["header", "banner", "category_list", "product_grid", "footer"],
    },
    Template {
        id: "gadget-pro",
        name: "Gadget Pro",
        description: "Dark theme for gadgets and accessories.",
        category: "electronics",
        colors: ColorScheme {
            primary: "#8b5cf6",
            secondary: "#1f2937",
            accent: "#a3e635",
            background: "#111827",
            text: "#f9fafb",
        },
        typography: Typography { heading: "Orbitron", body: "Inter" },
        pages: STANDARD_PAGES,
        features: &["dark-mode", "compare", "quick-view"],
        home_layout: &["header", "hero", "featured_products", "product_grid", "footer"],
    },
    Template {
        id: "fresh-market",
        name: "Fresh Market",
        description: "Grocery layout with category aisles.",
        category: "food",
        colors: ColorScheme {
            primary: "#16a34a",
            secondary: "#65a30d",
            accent: "#f97316",
            background: "#f7fee7",
            text: "#14532d",
        },
        typography: Typography { heading: "Nunito", body: "Nunito" },
        pages: STANDARD_PAGES,
        features: &["categories", "delivery-slots", "search"],
        home_layout: &["header", "banner", "category_list", "product_grid", "cart_summary", "footer"],
    },
    Template {
        id: "bakery",
        name: "Bakery",
        description: "Warm, cosy layout for bakeries and cafes.",
        category: "food",
        colors: ColorScheme {
            primary: "#b45309",
            secondary: "#78350f",
            accent: "#fde68a",
            background: "#fffbeb",
            text: "#451a03",
        },
        typography: Typography { heading: "Pacifico", body: "Quicksand" },
        pages: STANDARD_PAGES,
        features: &["menu", "pickup"],
        home_layout: &["header", "hero", "featured_products", "text_block", "contact_form", "footer"],
    },
    Template {
        id: "glow",
        name: "Glow",
        description: "Soft palette for beauty and skincare brands.",
        category: "beauty",
        colors: ColorScheme {
            primary: "#db2777",
            secondary: "#f472b6",
            accent: "#fcd34d",
            background: "#fdf2f8",
            text: "#500724",
        },
        typography: Typography { heading: "Cormorant Garamond", body: "Montserrat" },
        pages: STANDARD_PAGES,
        features: &["reviews", "subscriptions", "wishlist"],
        home_layout: &["header", "hero", "featured_products", "testimonials", "newsletter", "footer"],
    },
    Template {
        id: "nest",
        name: "Nest",
        description: "Home and furniture layout with room inspiration.",
        category: "home",
        colors: ColorScheme {
            primary: "#57534e",
            secondary: "#a8a29e",
            accent: "#0d9488",
            background: "#fafaf9",
            text: "#1c1917",
        },
        typography: Typography { heading: "DM Serif Display", body: "DM Sans" },
        pages: STANDARD_PAGES,
        features: &["lookbook", "categories", "quick-view"],
        home_layout: &["header", "hero", "category_list", "product_grid", "footer"],
    },
    Template {
        id: "active",
        name: "Active",
        description: "Energetic sports and outdoor layout.",
        category: "sports",
        colors: ColorScheme {
            primary: "#ea580c",
            secondary: "#1d4ed8",
            accent: "#84cc16",
            background: "#ffffff",
            text: "#0c0a09",
        },
        typography: Typography { heading: "Oswald", body: "Open Sans" },
        pages: STANDARD_PAGES,
        features: &["size-guide", "reviews", "search"],
        home_layout: &["header", "hero", "banner", "product_grid", "newsletter", "footer"],
    },
    Template {
        id: "bookshelf",
        name: "Bookshelf",
        description: "Reading-room layout for books and stationery.",
        category: "books",
        colors: ColorScheme {
            primary: "#1e3a8a",
            secondary: "#92400e",
            accent: "#fbbf24",
            background: "#fefce8",
            text: "#1c1917",
        },
        typography: Typography { heading: "Merriweather", body: "Source Serif Pro" },
        pages: STANDARD_PAGES,
        features: &["categories", "reviews", "search"],
        home_layout: &["header", "featured_products", "category_list", "product_grid", "footer"],
    },
    Template {
        id: "web3-shop",
        name: "Web3 Shop",
        description: "Neon storefront with crypto wallet checkout.",
        category: "crypto",
        colors: ColorScheme {
            primary: "#06b6d4",
            secondary: "#a855f7",
            accent: "#f0abfc",
            background: "#0b1020",
            text: "#e2e8f0",
        },
        typography: Typography { heading: "Syne", body: "Inter" },
        pages: STANDARD_PAGES,
        features: &["wallet-connect", "dark-mode", "drops"],
        home_layout: &["header", "hero", "wallet_connect", "product_grid", "footer"],
    },
    Template {
        id: "luxe",
        name: "Luxe",
        description: "Gold-accented layout for jewelry and watches.",
        category: "jewelry",
        colors: ColorScheme {
            primary: "#a16207",
            secondary: "#171717",
            accent: "#fde047",
            background: "#0a0a0a",
            text: "#fafafa",
        },
        typography: Typography { heading: "Cinzel", body: "Raleway" },
        pages: STANDARD_PAGES,
        features: &["dark-mode", "lookbook", "wishlist"],
        home_layout: &["header", "hero", "featured_products", "testimonials", "footer"],
    },
];

pub fn all() -> &'static [Template] {
    TEMPLATES
}

pub fn find(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == id)
}

pub fn default_template() -> &'static Template {
    &TEMPLATES[0]
}

/// Resolve a stored template id, falling back to the default skin.
pub fn resolve(id: &str) -> &'static Template {
    find(id).unwrap_or_else(default_template)
}

/// Templates matching optional category and feature filters (case-insensitive).
pub fn filter(category: Option<&str>, feature: Option<&str>) -> Vec<&'static Template> {
    TEMPLATES
        .iter()
        .filter(|t| category.is_none_or(|c| t.category.eq_ignore_ascii_case(c)))
        .filter(|t| feature.is_none_or(|f| t.has_feature(f)))
        .collect()
}
