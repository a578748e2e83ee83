//! Terminal rendering helpers shared by commands.

use colored::Colorize;
use serde_json::Value;
use tiermem_core::{LayerId, MemoryStats};

use crate::config::OutputConfig;

/// Apply the color setting for this process
pub fn apply(output: &OutputConfig) {
    if !output.color {
        colored::control::set_override(false);
    }
}

/// Human-friendly layer name
pub fn layer_display(layer: LayerId) -> &'static str {
    match layer {
        LayerId::Working => "working",
        LayerId::ShortTerm => "short-term",
        LayerId::LongTerm => "long-term",
    }
}

/// Short single-line rendering of a JSON payload
pub fn preview(content: &Value, max_chars: usize) -> String {
    let text = match content {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    if text.chars().count() <= max_chars {
        text
    } else {
        let truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

/// Print a per-layer statistics table
pub fn print_stats(stats: &MemoryStats) {
    println!("{}", "Memory layers".bold());
    for layer in LayerId::ALL {
        let s = stats.layer(layer);
        let fill = format!("{}/{}", s.size, s.capacity);
        println!(
            "  {:<11} {:>11}  evictions: {}",
            layer_display(layer).cyan(),
            fill,
            s.evictions
        );
    }
    println!(
        "  {:<11} {:>11}  evictions: {}",
        "total".bold(),
        stats.total,
        stats.total_evictions()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_layer_display() {
        assert_eq!(layer_display(LayerId::ShortTerm), "short-term");
        assert_eq!(layer_display(LayerId::LongTerm), "long-term");
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview(&json!("git status"), 20), "git status");
        assert_eq!(preview(&json!({"cmd": "ls"}), 20), r#"{"cmd":"ls"}"#);
        assert_eq!(preview(&json!("abcdefghij"), 5), "abcd…");
    }
}
