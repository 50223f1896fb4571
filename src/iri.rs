//! IRI utilities.

use iref::{Iri, IriBuf, IriRef};

/// Checks if the given string is an absolute IRI.
pub fn is_absolute(s: &str) -> bool {
	Iri::new(s).is_ok()
}

/// Checks if the given string is a relative IRI reference.
pub fn is_relative(s: &str) -> bool {
	!is_absolute(s) && IriRef::new(s).is_ok()
}

/// Resolves `reference` against `base` per RFC 3986.
///
/// Returns `None` when `reference` is not a valid IRI reference.
pub fn resolve(base: &Iri, reference: &str) -> Option<IriBuf> {
	let r = IriRef::new(reference).ok()?;
	Some(r.resolved(base))
}

/// Checks if the last character of `s` is a gen-delim (`: / ? # [ ] @`).
pub fn ends_in_gen_delim(s: &str) -> bool {
	matches!(s.chars().last(), Some(':' | '/' | '?' | '#' | '[' | ']' | '@'))
}

/// Constructs a relative IRI reference from `base` to `target`.
///
/// Requires matching scheme and authority; strips the shared path prefix at
/// directory granularity, emits `..` for each remaining base directory
/// segment and appends the target tail plus query and fragment. Returns
/// `None` when scheme or authority differ.
pub fn relative(base: &Iri, target: &Iri) -> Option<String> {
	if !base
		.scheme()
		.as_str()
		.eq_ignore_ascii_case(target.scheme().as_str())
	{
		return None;
	}

	let base_authority = base.authority().map(|a| a.as_str()).unwrap_or("");
	let target_authority = target.authority().map(|a| a.as_str()).unwrap_or("");
	if base_authority != target_authority {
		return None;
	}

	let base_path = base.path().as_str();
	let target_path = target.path().as_str();
	let query = target.query().map(|q| q.as_str()).filter(|q| !q.is_empty());
	let fragment = target
		.fragment()
		.map(|f| f.as_str())
		.filter(|f| !f.is_empty());

	if base_path == target_path && (query.is_some() || fragment.is_some()) {
		let mut out = String::new();
		if let Some(q) = query {
			out.push('?');
			out.push_str(q);
		}
		if let Some(f) = fragment {
			out.push('#');
			out.push_str(f);
		}
		return Some(out);
	}

	// Directory of the base path, including the trailing slash.
	let dir_end = base_path.rfind('/').map(|i| i + 1).unwrap_or(0);
	let base_parts: Vec<&str> = base_path[..dir_end].split('/').collect();
	let target_parts: Vec<&str> = target_path.split('/').collect();

	let mut shared = 0;
	let count = base_parts.len().min(target_parts.len());
	for i in 0..count {
		if base_parts[i] == target_parts[i] {
			shared += 1;
		} else {
			break;
		}
	}

	let mut parts: Vec<&str> = Vec::new();
	for _ in base_parts.iter().skip(shared + 1) {
		parts.push("..");
	}
	parts.extend(target_parts[shared.min(target_parts.len())..].iter().copied());

	let mut out = parts
		.into_iter()
		.filter(|s| !s.is_empty())
		.collect::<Vec<_>>()
		.join("/");

	if out.ends_with("..") {
		out.push('/');
	}

	if let Some(q) = query {
		out.push('?');
		out.push_str(q);
	}
	if let Some(f) = fragment {
		out.push('#');
		out.push_str(f);
	}

	Some(out)
}

#[cfg(test)]
mod tests {
	use super::*;
	use static_iref::iri;

	#[test]
	fn absolute_and_relative() {
		assert!(is_absolute("https://example.com/a"));
		assert!(is_absolute("urn:isbn:0451450523"));
		assert!(!is_absolute("/a/b"));
		assert!(!is_absolute("not a n iri"));
		assert!(is_relative("/a/b"));
		assert!(is_relative("../x"));
		assert!(!is_relative("https://example.com/a"));
	}

	#[test]
	fn gen_delims() {
		assert!(ends_in_gen_delim("https://example.com/"));
		assert!(ends_in_gen_delim("https://example.com#"));
		assert!(ends_in_gen_delim("urn:"));
		assert!(!ends_in_gen_delim("https://example.com/a"));
	}

	#[test]
	fn resolution() {
		let base = iri!("https://example.com/a/b/c");
		assert_eq!(
			resolve(base, "../d").unwrap().as_str(),
			"https://example.com/a/d"
		);
		assert_eq!(
			resolve(base, "#frag").unwrap().as_str(),
			"https://example.com/a/b/c#frag"
		);
	}

	#[test]
	fn relative_sibling() {
		let base = iri!("https://example.com/a/b/c");
		let target = iri!("https://example.com/a/b/d");
		assert_eq!(relative(base, target).unwrap(), "d");
	}

	#[test]
	fn relative_parent() {
		let base = iri!("https://example.com/a/b/");
		let target = iri!("https://example.com/a/x");
		assert_eq!(relative(base, target).unwrap(), "../x");
	}

	#[test]
	fn relative_fragment_only() {
		let base = iri!("https://example.com/a/b");
		let target = iri!("https://example.com/a/b#frag");
		assert_eq!(relative(base, target).unwrap(), "#frag");
	}

	#[test]
	fn relative_dangling_parent() {
		let base = iri!("https://example.com/a/b/c/");
		let target = iri!("https://example.com/a/");
		assert_eq!(relative(base, target).unwrap(), "../../");
	}

	#[test]
	fn relative_mismatch() {
		let base = iri!("https://example.com/a");
		let target = iri!("http://example.com/a");
		assert!(relative(base, target).is_none());
		let other_host = iri!("https://example.org/a");
		assert!(relative(base, other_host).is_none());
	}
}
