pub mod formatter;

pub use formatter::{
    format_breakdown, format_json, format_result, format_roster_table, format_score,
    format_weights, should_use_colors,
};
