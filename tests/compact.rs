//! Compaction tests.

mod common;

use common::{assert_json_eq, json, normalize};
use json_syntax::Value;
use lodestar::{Error, Node, ProcessingMode, Processor};
use static_iref::iri;

#[async_std::test]
async fn compaction_round_trip() {
	let document = json(
		r#"{
			"@context": {"ex": "https://example.org#", "name": "ex:name"},
			"name": "Alice"
		}"#,
	);
	let context = json(r#"{"ex": "https://example.org#", "name": "ex:name"}"#);

	let processor = Processor::new();
	let expanded = processor.expand(&document, None).await.unwrap();
	let compacted = processor.compact(&context, &expanded, None).await.unwrap();

	assert_json_eq(&compacted, &document);
}

#[async_std::test]
async fn empty_document_compacts_to_an_empty_map() {
	let compacted = Processor::new()
		.compact(&json(r#"{"ex": "https://example.org#"}"#), &[], None)
		.await
		.unwrap();

	assert_eq!(compacted, json("{}"));
}

#[async_std::test]
async fn context_is_re_emitted_verbatim() {
	let context = json(r#"{"name": "https://example.org/name", "ex": "https://example.org#"}"#);
	let document = json(r#"{"https://example.org/name": "Alice"}"#);

	let processor = Processor::new();
	let expanded = processor.expand(&document, None).await.unwrap();
	let compacted = processor.compact(&context, &expanded, None).await.unwrap();

	let emitted = compacted
		.as_object()
		.unwrap()
		.get_unique("@context")
		.ok()
		.unwrap()
		.unwrap();
	// Byte-for-byte: entry order of the caller's context survives.
	assert_eq!(emitted, &context);
}

#[async_std::test]
async fn type_coercion_drops_the_envelope() {
	let context = json(
		r#"{
			"born": {"@id": "https://example.org/born", "@type": "http://www.w3.org/2001/XMLSchema#dateTime"}
		}"#,
	);
	let document = json(
		r#"{
			"https://example.org/born": {
				"@type": "http://www.w3.org/2001/XMLSchema#dateTime",
				"@value": "1970-01-01T00:00:00Z"
			}
		}"#,
	);

	let processor = Processor::new();
	let expanded = processor.expand(&document, None).await.unwrap();
	let compacted = processor.compact(&context, &expanded, None).await.unwrap();

	assert_json_eq(
		&compacted,
		&json(
			r#"{
				"@context": {
					"born": {"@id": "https://example.org/born", "@type": "http://www.w3.org/2001/XMLSchema#dateTime"}
				},
				"born": "1970-01-01T00:00:00Z"
			}"#,
		),
	);
}

#[async_std::test]
async fn language_map_round_trip() {
	let context = json(r#"{"@vocab": "ex:", "label": {"@container": "@language"}}"#);
	let document = json(
		r#"{
			"@context": {"@vocab": "ex:", "label": {"@container": "@language"}},
			"label": {"en": "Hi", "de": "Hallo"}
		}"#,
	);

	let processor = Processor::new().with_ordered(true);
	let expanded = processor.expand(&document, None).await.unwrap();
	let compacted = processor.compact(&context, &expanded, None).await.unwrap();

	assert_json_eq(&compacted, &document);
}

#[async_std::test]
async fn list_round_trip() {
	let context = json(
		r#"{"list": {"@id": "https://example.org/list", "@container": "@list"}}"#,
	);
	let document = json(
		r#"{
			"@context": {"list": {"@id": "https://example.org/list", "@container": "@list"}},
			"list": ["a", "b"]
		}"#,
	);

	let processor = Processor::new();
	let expanded = processor.expand(&document, None).await.unwrap();
	let compacted = processor.compact(&context, &expanded, None).await.unwrap();

	assert_json_eq(&compacted, &document);
}

#[async_std::test]
async fn iri_confused_with_prefix() {
	let context = json(r#"{"foo": "http://example.org/"}"#);
	let document = json(
		r#"{
			"@id": "foo:bar",
			"http://example.org/p": "v"
		}"#,
	);

	let processor = Processor::new();
	let expanded = processor.expand(&document, None).await.unwrap();
	let err = processor
		.compact(&context, &expanded, None)
		.await
		.unwrap_err();

	assert!(matches!(err, Error::IriConfusedWithPrefix));
}

#[async_std::test]
async fn compact_arrays_off_keeps_arrays() {
	let context = json(r#"{"name": "https://example.org/name"}"#);
	let document = json(r#"{"https://example.org/name": "Alice"}"#);

	let processor = Processor::new().with_compact_arrays(false);
	let expanded = processor.expand(&document, None).await.unwrap();
	let compacted = processor.compact(&context, &expanded, None).await.unwrap();

	// With compact arrays off the top level stays an array under the
	// graph alias.
	assert_json_eq(
		&compacted,
		&json(
			r#"{
				"@context": {"name": "https://example.org/name"},
				"@graph": [{"name": ["Alice"]}]
			}"#,
		),
	);
}

#[async_std::test]
async fn multiple_top_level_nodes_sit_under_the_graph_alias() {
	let context = json(r#"{"name": "https://example.org/name"}"#);
	let document = json(
		r#"[
			{"@id": "https://example.org/a", "https://example.org/name": "a"},
			{"@id": "https://example.org/b", "https://example.org/name": "b"}
		]"#,
	);

	let processor = Processor::new();
	let expanded = processor.expand(&document, None).await.unwrap();
	let compacted = processor.compact(&context, &expanded, None).await.unwrap();

	let object = compacted.as_object().unwrap();
	let graph = object.get_unique("@graph").ok().unwrap();
	assert!(graph.is_some());
}

#[async_std::test]
async fn compacts_to_relative_iri() {
	let context = json(r#"{}"#);
	let document = json(r#"{"@id": "https://example.org/a/b", "https://example.org/p": "v"}"#);

	let processor = Processor::new();
	let expanded = processor.expand(&document, None).await.unwrap();
	let compacted = processor
		.compact(&context, &expanded, Some(iri!("https://example.org/a/")))
		.await
		.unwrap();

	assert_eq!(
		compacted
			.as_object()
			.unwrap()
			.get_unique("@id")
			.ok()
			.unwrap()
			.unwrap(),
		&Value::String("b".into())
	);
}

#[async_std::test]
async fn compact_to_relative_can_be_disabled() {
	let context = json(r#"{}"#);
	let document = json(r#"{"@id": "https://example.org/a/b", "https://example.org/p": "v"}"#);

	let processor = Processor::new().with_compact_to_relative(false);
	let expanded = processor.expand(&document, None).await.unwrap();
	let compacted = processor
		.compact(&context, &expanded, Some(iri!("https://example.org/a/")))
		.await
		.unwrap();

	assert_eq!(
		compacted
			.as_object()
			.unwrap()
			.get_unique("@id")
			.ok()
			.unwrap()
			.unwrap(),
		&Value::String("https://example.org/a/b".into())
	);
}

#[async_std::test]
async fn excluded_iris_stay_absolute() {
	let context = json(r#"{"name": "https://example.org/name"}"#);
	let document = json(r#"{"https://example.org/name": "Alice"}"#);

	let processor = Processor::new()
		.with_compaction_excluded_iri("https://example.org/name");
	let expanded = processor.expand(&document, None).await.unwrap();
	let compacted = processor.compact(&context, &expanded, None).await.unwrap();

	assert!(compacted
		.as_object()
		.unwrap()
		.get_unique("https://example.org/name")
		.ok()
		.unwrap()
		.is_some());
}

#[async_std::test]
async fn id_map_round_trip() {
	let context = json(
		r#"{
			"@vocab": "https://example.org/",
			"post": {"@id": "https://example.org/post", "@container": "@id"}
		}"#,
	);
	let document = json(
		r#"{
			"@context": {
				"@vocab": "https://example.org/",
				"post": {"@id": "https://example.org/post", "@container": "@id"}
			},
			"post": {
				"https://example.org/p1": {"title": "a"},
				"https://example.org/p2": {"title": "b"}
			}
		}"#,
	);

	let processor = Processor::new().with_ordered(true);
	let expanded = processor.expand(&document, None).await.unwrap();
	let compacted = processor.compact(&context, &expanded, None).await.unwrap();

	assert_json_eq(&compacted, &document);
}

#[async_std::test]
async fn reverse_property_round_trip() {
	let context = json(r#"{"children": {"@reverse": "https://example.org/parent"}}"#);
	let document = json(
		r#"{
			"@context": {"children": {"@reverse": "https://example.org/parent"}},
			"@id": "https://example.org/a",
			"children": {"@id": "https://example.org/b"}
		}"#,
	);

	let processor = Processor::new();
	let expanded = processor.expand(&document, None).await.unwrap();
	let compacted = processor.compact(&context, &expanded, None).await.unwrap();

	assert_json_eq(&compacted, &document);
}

#[async_std::test]
async fn nest_round_trip() {
	let context = json(
		r#"{
			"@vocab": "https://example.org/",
			"info": "@nest",
			"name": {"@nest": "info"}
		}"#,
	);
	let document = json(
		r#"{
			"@context": {
				"@vocab": "https://example.org/",
				"info": "@nest",
				"name": {"@nest": "info"}
			},
			"@id": "https://example.org/a",
			"info": {"name": "Alice"}
		}"#,
	);

	let processor = Processor::new();
	let expanded = processor.expand(&document, None).await.unwrap();

	// The nesting is erased by expansion...
	assert!(expanded[0]
		.properties
		.contains_key("https://example.org/name"));

	// ...and reintroduced by compaction.
	let compacted = processor.compact(&context, &expanded, None).await.unwrap();
	assert_json_eq(&compacted, &document);
}

#[async_std::test]
async fn compaction_to_list_of_lists_in_1_0() {
	let context = json(
		r#"{"list": {"@id": "https://example.org/list", "@container": "@list"}}"#,
	);

	let list_a = Node {
		list: Some(vec![Node {
			value: Some(Value::String("a".into())),
			..Default::default()
		}]),
		..Default::default()
	};
	let list_b = Node {
		list: Some(vec![Node {
			value: Some(Value::String("b".into())),
			..Default::default()
		}]),
		..Default::default()
	};

	let mut node = Node {
		id: Some("https://example.org/x".to_string()),
		..Default::default()
	};
	node.set("https://example.org/list", vec![list_a, list_b]);

	let err = Processor::new()
		.with_processing_mode(ProcessingMode::JsonLd1_0)
		.compact(&context, &[node], None)
		.await
		.unwrap_err();

	assert!(matches!(err, Error::CompactionToListOfLists));
}

#[async_std::test]
async fn graph_container_round_trip() {
	let context = json(
		r#"{
			"@vocab": "https://example.org/",
			"claims": {"@id": "https://example.org/claims", "@container": "@graph"}
		}"#,
	);
	let document = json(
		r#"{
			"@context": {
				"@vocab": "https://example.org/",
				"claims": {"@id": "https://example.org/claims", "@container": "@graph"}
			},
			"claims": {"title": "a"}
		}"#,
	);

	let processor = Processor::new();
	let expanded = processor.expand(&document, None).await.unwrap();
	let compacted = processor.compact(&context, &expanded, None).await.unwrap();

	assert_json_eq(&compacted, &document);
}

#[async_std::test]
async fn json_literal_round_trip() {
	let context = json(
		r#"{"data": {"@id": "https://example.org/data", "@type": "@json"}}"#,
	);
	let document = json(
		r#"{
			"@context": {"data": {"@id": "https://example.org/data", "@type": "@json"}},
			"@id": "https://example.org/a",
			"data": {"b": [1, 2.5], "a": true}
		}"#,
	);

	let processor = Processor::new();
	let expanded = processor.expand(&document, None).await.unwrap();
	let compacted = processor.compact(&context, &expanded, None).await.unwrap();

	// The literal survives byte-for-byte, including entry order.
	let data = compacted
		.as_object()
		.unwrap()
		.get_unique("data")
		.ok()
		.unwrap()
		.unwrap();
	assert_eq!(data, &json(r#"{"b": [1, 2.5], "a": true}"#));
}

#[async_std::test]
async fn semantic_round_trip_is_stable() {
	let document = json(
		r#"{
			"@context": {
				"@vocab": "https://example.org/",
				"knows": {"@type": "@id"},
				"label": {"@container": "@language"}
			},
			"@id": "https://example.org/alice",
			"@type": "Person",
			"knows": "https://example.org/bob",
			"label": {"en": "Alice", "fr": "Alicia"}
		}"#,
	);
	let context = json(
		r#"{
			"@vocab": "https://example.org/",
			"knows": {"@type": "@id"},
			"label": {"@container": "@language"}
		}"#,
	);

	let processor = Processor::new().with_ordered(true);
	let expanded = processor.expand(&document, None).await.unwrap();
	let compacted = processor.compact(&context, &expanded, None).await.unwrap();
	assert_json_eq(&compacted, &document);

	// Expanding the compacted document reaches the same expanded form.
	let reexpanded = processor.expand(&compacted, None).await.unwrap();
	assert_eq!(
		normalize(&lodestar::nodes_to_json(&reexpanded)),
		normalize(&lodestar::nodes_to_json(&expanded))
	);
}
