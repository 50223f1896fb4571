#![allow(dead_code)]

use std::collections::HashMap;

use iref::IriBuf;
use json_syntax::{Parse, Value};
use lodestar::RemoteContext;

/// Parses an inline JSON fixture.
pub fn json(source: &str) -> Value {
	Value::parse_str(source).expect("invalid JSON fixture").0
}

/// Normalizes a value for order-insensitive object comparison. Array order
/// is significant in JSON-LD and is preserved.
pub fn normalize(value: &Value) -> Value {
	match value {
		Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
		Value::Object(object) => {
			let mut entries: Vec<(String, Value)> = object
				.entries()
				.iter()
				.map(|e| (e.key.as_str().to_string(), normalize(&e.value)))
				.collect();
			entries.sort_by(|a, b| a.0.cmp(&b.0));

			let mut result = json_syntax::Object::default();
			for (key, value) in entries {
				result.insert(key.into(), value);
			}
			Value::Object(result)
		}
		other => other.clone(),
	}
}

#[track_caller]
pub fn assert_json_eq(actual: &Value, expected: &Value) {
	assert_eq!(normalize(actual), normalize(expected));
}

/// Builds an in-memory loader serving the given `(url, context value)`
/// pairs.
pub fn static_loader(entries: &[(&str, &str)]) -> HashMap<IriBuf, RemoteContext> {
	entries
		.iter()
		.map(|(url, context)| {
			let url = IriBuf::new(url.to_string()).unwrap();
			(
				url.clone(),
				RemoteContext {
					url,
					context: json(context),
				},
			)
		})
		.collect()
}
