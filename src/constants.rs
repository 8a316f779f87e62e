/// Dataset kind names used on the CLI, in config and in serialized datasets
pub const PARTICIPATION: &str = "participation";
pub const CONTROVERSY: &str = "controversy";
pub const POPULARITY: &str = "popularity";

// Names the upload pages were published under
pub const PARTICIPATION_ALIAS: &str = "participacao";
pub const CONTROVERSY_ALIAS: &str = "polemica";
pub const POPULARITY_ALIAS: &str = "popularidade";

/// Hard cap on a single uploaded file (100 MiB)
pub const MAX_INPUT_BYTES: u64 = 100 * 1024 * 1024;

/// Separator between entries of a flattened `texts` cell
pub const TEXT_SEPARATOR: &str = " | ";

// Stance tags, as written in data files
pub const STANCE_SUPPORT: &str = "apoio";
pub const STANCE_NEUTRAL: &str = "neutralidade";
pub const STANCE_OPPOSITION: &str = "oposicao";

// Fixed stance colors for pie slices
pub const SUPPORT_COLOR: &str = "#00FF66";
pub const NEUTRAL_COLOR: &str = "#FFD43B";
pub const OPPOSITION_COLOR: &str = "#FF3B30";

/// Edge color when the dataset leaves it blank
pub const DEFAULT_EDGE_COLOR: &str = "#999";

/// Half-width of the square that unpositioned nodes are scattered over
pub const SCATTER_EXTENT: f64 = 400.0;

/// Label prefix for nodes without one
pub const UNNAMED_NODE_PREFIX: &str = "autor_";

// Required fields per dataset kind
pub const PARTICIPATION_REQUIRED: &[&str] = &["author_id", "texts"];
pub const POPULARITY_REQUIRED: &[&str] = &["author_id", "texts", "name"];
pub const CONTROVERSY_JSON_REQUIRED: &[&str] = &["nodes", "edges"];

/// Per-endpoint columns of a controversy CSV row, after the `source_`/`target_` prefix
pub const CONTROVERSY_NODE_COLUMNS: &[&str] = &[
    "id",
    "label",
    "text",
    "apoio",
    "oposicao",
    "neutralidade",
    "total",
];

/// Edge columns of a controversy CSV row
pub const CONTROVERSY_EDGE_COLUMNS: &[&str] = &["relation", "color", "text"];

pub const PARTICIPATION_COLUMNS: &[&str] = &["author_id", "interactions", "texts", "x", "y"];

pub const POPULARITY_COLUMNS: &[&str] = &[
    "author_id",
    "name",
    "interactions",
    "apoio",
    "neutralidade",
    "oposicao",
    "texts",
    "x",
    "y",
];
