//! Small JSON helpers shared by the algorithms.

use json_syntax::Value;

/// Returns the value of the last entry with the given key, mirroring the
/// last-wins semantics of decoding JSON objects into maps.
pub(crate) fn get_entry<'a>(object: &'a json_syntax::Object, key: &str) -> Option<&'a Value> {
	object
		.entries()
		.iter()
		.filter(|entry| entry.key.as_str() == key)
		.next_back()
		.map(|entry| &entry.value)
}

/// The entries of an object, deduplicated last-wins, in observation order
/// or sorted by key.
///
/// Every map iteration of the algorithms goes through this helper so the
/// `ordered` option yields ascending code-point order everywhere.
pub(crate) fn object_entries<'a>(
	object: &'a json_syntax::Object,
	ordered: bool,
) -> Vec<(&'a str, &'a Value)> {
	let mut entries: Vec<(&str, &Value)> = Vec::with_capacity(object.len());

	for entry in object.entries() {
		let key = entry.key.as_str();
		match entries.iter_mut().find(|(k, _)| *k == key) {
			Some(slot) => slot.1 = &entry.value,
			None => entries.push((key, &entry.value)),
		}
	}

	if ordered {
		entries.sort_by_key(|(k, _)| *k);
	}

	entries
}

/// Checks if the value is a scalar: not null, not an array, not a map.
pub(crate) fn is_scalar(value: &Value) -> bool {
	!matches!(value, Value::Null | Value::Array(_) | Value::Object(_))
}

/// Removes and returns the value stored under `key`.
pub(crate) fn take_entry(object: &mut json_syntax::Object, key: &str) -> Option<Value> {
	object
		.remove_unique(key)
		.ok()
		.flatten()
		.map(|entry| entry.value)
}

/// Replaces the value stored under `key`.
pub(crate) fn set_entry(object: &mut json_syntax::Object, key: &str, value: Value) {
	take_entry(object, key);
	object.insert(key.into(), value);
}
