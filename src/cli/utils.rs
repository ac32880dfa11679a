use serde_json::{json, Map, Value};

use crate::cli::OutputFormat;

/// Output a result in the appropriate format.
///
/// JSON merges `data` into the `{success, message}` object; text prints the
/// message followed by one `key: value` line per field.
pub fn output_success(output_format: &OutputFormat, message: &str, data: Map<String, Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(object) = response.as_object_mut() {
                object.extend(data);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
            for (key, value) in &data {
                println!("  {}: {}", key, text_value(value));
            }
        }
    }
    Ok(())
}

fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// Build the field map for [`output_success`] from a `json!` object
pub fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_values_are_unquoted() {
        assert_eq!(text_value(&json!("/dashboard")), "/dashboard");
        assert_eq!(text_value(&Value::Null), "-");
        assert_eq!(text_value(&json!(true)), "true");
    }

    #[test]
    fn non_objects_have_no_fields() {
        assert!(fields(json!([1, 2])).is_empty());
        assert_eq!(fields(json!({"a": 1})).len(), 1);
    }
}
